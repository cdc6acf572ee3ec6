/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Plain PGM/PPM encoding.
//!
//! The two variants write the same three header lines but lay their
//! samples out differently: `P2` wraps after every 16th value while
//! `P3` writes one pixel per line. Both sample blocks always end
//! with a line terminator.

use std::fmt::{Debug, Formatter};
use std::io;
use std::io::Write;

use log::trace;
use lume_core::colorspace::ColorSpace;

use crate::raster::Raster;
use crate::PnmVersions;

/// Number of gray samples written per line before wrapping
const VALUES_PER_LINE: usize = 16;

/// Errors occurring during encoding
pub enum PnmErrors {
    Static(&'static str),
    IoErrors(io::Error)
}

impl From<io::Error> for PnmErrors {
    fn from(err: io::Error) -> Self {
        PnmErrors::IoErrors(err)
    }
}

impl Debug for PnmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PnmErrors::Static(err) => {
                writeln!(f, "{err}")
            }
            PnmErrors::IoErrors(err) => {
                writeln!(f, "{err}")
            }
        }
    }
}

/// A plain PGM/PPM encoder
///
/// The variant is chosen from the raster's colorspace, grayscale
/// rasters become `P2` files and RGB rasters become `P3` files.
/// Samples are emitted verbatim, the encoder does not re-validate
/// them against the raster's declared maximum.
pub struct PnmEncoder<'a, W: Write> {
    writer: &'a mut W
}

impl<'a, W: Write> PnmEncoder<'a, W> {
    /// Create a new encoder that writes to `writer`
    pub fn new(writer: &'a mut W) -> PnmEncoder<'a, W> {
        Self { writer }
    }

    /// Write the three header lines shared by both variants
    fn write_headers(
        &mut self, version: PnmVersions, width: usize, height: usize, max_value: u8
    ) -> Result<(), PnmErrors> {
        let header = format!("{version}\n{width} {height}\n{max_value}\n");

        self.writer.write_all(header.as_bytes())?;

        Ok(())
    }

    /// Encode `raster` in the variant matching its colorspace
    ///
    /// Returns an error for colorspaces the plain formats cannot
    /// express and propagates sink I/O failures, nothing else can
    /// fail.
    pub fn encode(&mut self, raster: &Raster) -> Result<(), PnmErrors> {
        let version = match version_for_colorspace(raster.colorspace()) {
            Some(version) => version,
            None => {
                return Err(PnmErrors::Static(
                    "only grayscale and RGB rasters can be written as plain PNM"
                ))
            }
        };
        trace!(
            "Encoding a {}x{} raster as {}",
            raster.width(),
            raster.height(),
            version
        );

        self.write_headers(version, raster.width(), raster.height(), raster.max_value())?;

        match version {
            PnmVersions::P2 => self.write_gray_samples(raster.samples()),
            PnmVersions::P3 => self.write_rgb_samples(raster.samples())
        }
    }

    /// Write gray samples space separated, breaking the line after
    /// every 16th value and unconditionally after the last one
    fn write_gray_samples(&mut self, samples: &[u8]) -> Result<(), PnmErrors> {
        for (i, value) in samples.iter().enumerate() {
            write!(self.writer, "{value} ")?;

            if (i + 1) % VALUES_PER_LINE == 0 || i == samples.len() - 1 {
                self.writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    /// Write one pixel per line, three values space separated
    fn write_rgb_samples(&mut self, samples: &[u8]) -> Result<(), PnmErrors> {
        for pixel in samples.chunks_exact(3) {
            writeln!(self.writer, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
        }
        Ok(())
    }
}

/// Return the plain variant able to carry `colorspace`, if any
pub const fn version_for_colorspace(colorspace: ColorSpace) -> Option<PnmVersions> {
    match colorspace {
        ColorSpace::Luma => Some(PnmVersions::P2),
        ColorSpace::RGB => Some(PnmVersions::P3),
        _ => None
    }
}

#[test]
fn gray_2x2_golden_output() {
    let mut raster = Raster::filled(2, 2, ColorSpace::Luma, 0);
    raster.samples_mut().copy_from_slice(&[255, 0, 128, 64]);

    let mut out = Vec::new();
    PnmEncoder::new(&mut out).encode(&raster).unwrap();

    // four values fit on one line, the value separator stays before
    // the terminator
    assert_eq!(out, b"P2\n2 2\n255\n255 0 128 64 \n");
}

#[test]
fn gray_17_values_wrap_once() {
    let mut raster = Raster::filled(17, 1, ColorSpace::Luma, 0);
    for (i, sample) in raster.samples_mut().iter_mut().enumerate() {
        *sample = i as u8;
    }

    let mut out = Vec::new();
    PnmEncoder::new(&mut out).encode(&raster).unwrap();

    let text = std::str::from_utf8(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    // three header lines, then 16 values and the straggler
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3].split_whitespace().count(), 16);
    assert_eq!(lines[4], "16 ");
    assert!(text.ends_with('\n'));
}

#[test]
fn rgb_writes_one_pixel_per_line() {
    let mut raster = Raster::filled(2, 2, ColorSpace::RGB, 0);
    raster
        .samples_mut()
        .copy_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0]);

    let mut out = Vec::new();
    PnmEncoder::new(&mut out).encode(&raster).unwrap();

    assert_eq!(out, b"P3\n2 2\n255\n255 0 0\n0 255 0\n0 0 255\n255 255 0\n");
}

#[test]
fn unknown_colorspace_is_refused() {
    let raster = Raster::filled(1, 1, ColorSpace::Unknown, 0);

    let mut out = Vec::new();
    let err = PnmEncoder::new(&mut out).encode(&raster).unwrap_err();

    assert!(matches!(err, PnmErrors::Static(_)));
    assert!(out.is_empty());
}

#[test]
fn declared_max_value_is_written() {
    let mut raster = Raster::filled(1, 1, ColorSpace::Luma, 3);
    raster.set_max_value(31);

    let mut out = Vec::new();
    PnmEncoder::new(&mut out).encode(&raster).unwrap();

    assert_eq!(out, b"P2\n1 1\n31\n3 \n");
}
