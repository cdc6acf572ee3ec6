/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A decoder and encoder for the two plain-text netpbm formats.
//!
//! The plain formats store a short textual header followed by
//! whitespace-separated decimal samples, with `#` line comments
//! allowed between any two tokens:
//! ```text
//! ╔═══════╤══════════════════════════════════════════════════════╗
//! ║ P2    │ plain grayscale, one intensity per pixel             ║
//! ╟───────┼──────────────────────────────────────────────────────╢
//! ║ P3    │ plain RGB, three intensities per pixel               ║
//! ╠═══════╪══════════════════════════════════════════════════════╣
//! ║ line 1│ magic literal (`P2`/`P3`)                            ║
//! ║ line 2│ width and height, decimal                            ║
//! ║ line 3│ max sample value, decimal, at most 255               ║
//! ║ rest  │ `width * height` pixels worth of decimal samples     ║
//! ╚═══════╧══════════════════════════════════════════════════════╝
//! ```
//!
//! Decoded images land in a [`Raster`], an owned grid with
//! bounds-checked pixel access. Encoding writes a raster back in
//! the same textual form, `P2` wrapped at 16 values per line and
//! `P3` one pixel per line.
//!
//! # Example
//! ```
//! use lume_pnm::PnmDecoder;
//!
//! let data = b"P2\n2 2\n255\n255 0 128 64\n";
//! let raster = PnmDecoder::new(data).decode().unwrap();
//!
//! assert_eq!(raster.pixel_at(0, 0).unwrap(), &[255]);
//! ```

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lume_core::colorspace::ColorSpace;
use lume_core::options::DecoderOptions;

pub use crate::decoder::*;
pub use crate::encoder::*;
pub use crate::raster::*;

mod decoder;
mod encoder;
mod raster;

/// The two plain netpbm variants
///
/// Each variant fixes the magic literal at the head of the file,
/// the channel count of the decoded raster and the sample layout
/// the encoder writes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PnmVersions {
    /// Plain grayscale
    P2,
    /// Plain RGB
    P3
}

impl PnmVersions {
    /// Return the colorspace rasters of this variant decode to
    pub const fn colorspace(self) -> ColorSpace {
        match self {
            Self::P2 => ColorSpace::Luma,
            Self::P3 => ColorSpace::RGB
        }
    }

    /// The magic literal identifying this variant
    pub(crate) const fn magic(self) -> &'static [u8] {
        match self {
            Self::P2 => b"P2",
            Self::P3 => b"P3"
        }
    }
}

impl Display for PnmVersions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P2 => write!(f, "P2"),
            Self::P3 => write!(f, "P3")
        }
    }
}

/// Pick the variant a path's extension implies
///
/// `ppm`, compared case insensitively, selects [`P3`](PnmVersions::P3);
/// every other extension, or none at all, selects
/// [`P2`](PnmVersions::P2). The file's magic token is still checked
/// against the selection during decoding, a mis-suffixed file fails
/// there instead of being silently misread.
pub fn version_for_path<P: AsRef<Path>>(path: P) -> PnmVersions {
    match path.as_ref().extension() {
        Some(ext) if ext.eq_ignore_ascii_case("ppm") => PnmVersions::P3,
        _ => PnmVersions::P2
    }
}

/// Decode the plain PNM file at `path` with default options
///
/// The variant is inferred from the path extension, see
/// [`version_for_path`].
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Raster, PnmDecodeErrors> {
    decode_file_with_options(path, DecoderOptions::default())
}

/// Decode the plain PNM file at `path` with the given options
pub fn decode_file_with_options<P: AsRef<Path>>(
    path: P, options: DecoderOptions
) -> Result<Raster, PnmDecodeErrors> {
    let path = path.as_ref();
    let version = version_for_path(path);
    let contents = std::fs::read(path)?;

    let mut decoder = PnmDecoder::new_with_options(&contents, options);
    decoder.set_version(version);
    decoder.decode()
}

/// Encode `raster` into a file at `path`
///
/// The variant follows the raster's colorspace, not the path
/// extension. The file handle lives only for the duration of the
/// call and is released on every exit path.
pub fn encode_file<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<(), PnmErrors> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    PnmEncoder::new(&mut writer).encode(raster)?;

    // dropping a BufWriter swallows write errors, flush surfaces them
    writer.flush()?;

    Ok(())
}

#[test]
fn version_follows_extension() {
    assert_eq!(version_for_path("image.ppm"), PnmVersions::P3);
    assert_eq!(version_for_path("image.PPM"), PnmVersions::P3);
    assert_eq!(version_for_path("image.PpM"), PnmVersions::P3);
    assert_eq!(version_for_path("image.pgm"), PnmVersions::P2);
    assert_eq!(version_for_path("image.txt"), PnmVersions::P2);
    assert_eq!(version_for_path("image"), PnmVersions::P2);
    assert_eq!(version_for_path("dir.ppm/image"), PnmVersions::P2);
}
