/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Plain PGM/PPM decoding.
//!
//! Both formats share one token discipline: decimal fields separated
//! by whitespace, with `#` line comments allowed between any two
//! tokens. The only differences between the two are the magic
//! literal and the number of sample components per pixel, so a
//! single decoder handles both and is told which variant to expect.

use std::fmt::{Debug, Formatter};
use std::io;

use log::info;
use lume_core::bytestream::ByteReader;
use lume_core::colorspace::ColorSpace;
use lume_core::options::DecoderOptions;

use crate::raster::Raster;
use crate::PnmVersions;

/// Errors occurring during decoding
pub enum PnmDecodeErrors {
    /// The source could not be opened or read
    IoErrors(io::Error),
    /// The magic token did not match the expected variant.
    ///
    /// Recoverable, the caller may retry with the other variant.
    // expected, found
    BadMagic(PnmVersions, String),
    /// An expected integer field failed to parse or the input
    /// ended prematurely
    MalformedToken(&'static str),
    /// The declared maximum sample value is above 255
    MaxValueOverflow(usize),
    /// A sample value fell outside `0..=max_value`
    // value, declared max
    SampleOutOfRange(i64, u8),
    /// A declared dimension is above the configured limit
    // limit, found
    LargeDimensions(usize, usize)
}

impl Debug for PnmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoErrors(err) => {
                writeln!(f, "I/O error: {err}")
            }
            Self::BadMagic(expected, found) => {
                writeln!(f, "Expected `{expected}` as the magic token but found `{found}`")
            }
            Self::MalformedToken(reason) => {
                writeln!(f, "Malformed token: {reason}")
            }
            Self::MaxValueOverflow(found) => {
                writeln!(f, "Declared max value {found} greater than 255")
            }
            Self::SampleOutOfRange(value, max_value) => {
                writeln!(f, "Sample value {value} outside the declared range 0..={max_value}")
            }
            Self::LargeDimensions(limit, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {limit} but found {found}"
                )
            }
        }
    }
}

impl From<io::Error> for PnmDecodeErrors {
    fn from(err: io::Error) -> Self {
        PnmDecodeErrors::IoErrors(err)
    }
}

/// An instance of a plain PGM/PPM decoder
///
/// The decoder expects one of the two plain variants, `P2` by
/// default, and reports a mismatching magic token as
/// [`BadMagic`](PnmDecodeErrors::BadMagic) rather than switching
/// variants behind the caller's back.
pub struct PnmDecoder<'a> {
    width:           usize,
    height:          usize,
    max_value:       u8,
    decoded_headers: bool,
    reader:          ByteReader<'a>,
    colorspace:      ColorSpace,
    version:         PnmVersions,
    options:         DecoderOptions
}

impl<'a> PnmDecoder<'a> {
    /// Create a new decoder with default options, expecting the
    /// plain grayscale (`P2`) variant
    ///
    /// # Arguments
    /// - data: Plain PNM encoded bytes
    ///
    /// # Example
    /// ```
    /// use lume_pnm::PnmDecoder;
    /// let mut decoder = PnmDecoder::new(b"NOT VALID PNM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PnmDecoder<'a> {
        PnmDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder with the specified options
    ///
    /// # Arguments
    /// - data: Plain PNM encoded bytes
    /// - options: Modified options for the decoder
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PnmDecoder<'a> {
        PnmDecoder {
            width: 0,
            height: 0,
            max_value: 255,
            decoded_headers: false,
            reader: ByteReader::new(data),
            colorspace: ColorSpace::Unknown,
            version: PnmVersions::P2,
            options
        }
    }

    /// Set the variant the decoder expects to find
    ///
    /// Must be called before [`decode`](PnmDecoder::decode) or
    /// [`read_headers`](PnmDecoder::read_headers) to take effect.
    pub fn set_version(&mut self, version: PnmVersions) {
        self.version = version;
    }

    /// Return the variant the decoder expects
    pub const fn version(&self) -> PnmVersions {
        self.version
    }

    /// Read the header fields and store them in internal state
    ///
    /// Parses the magic token, width, height and max value,
    /// skipping `#` comments between fields. Idempotent once the
    /// headers have been decoded.
    pub fn read_headers(&mut self) -> Result<(), PnmDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        skip_spaces(&mut self.reader);

        let magic = get_token(&mut self.reader);

        if magic != self.version.magic() {
            return Err(PnmDecodeErrors::BadMagic(
                self.version,
                String::from_utf8_lossy(magic).into_owned()
            ));
        }
        skip_spaces(&mut self.reader);

        self.width = get_ascii_unsigned(&mut self.reader)?;

        if self.width > self.options.get_max_width() {
            return Err(PnmDecodeErrors::LargeDimensions(
                self.options.get_max_width(),
                self.width
            ));
        }
        skip_spaces(&mut self.reader);

        self.height = get_ascii_unsigned(&mut self.reader)?;

        if self.height > self.options.get_max_height() {
            return Err(PnmDecodeErrors::LargeDimensions(
                self.options.get_max_height(),
                self.height
            ));
        }

        info!("Width: {}, height: {}", self.width, self.height);

        skip_spaces(&mut self.reader);

        let max_value = get_ascii_unsigned(&mut self.reader)?;

        if max_value > 255 {
            return Err(PnmDecodeErrors::MaxValueOverflow(max_value));
        }
        self.max_value = max_value as u8;
        self.colorspace = self.version.colorspace();

        info!("Colorspace: {:?}", self.colorspace);
        info!("Max value: {}", self.max_value);

        self.decoded_headers = true;

        Ok(())
    }

    /// Decode the whole image and return the populated raster
    ///
    /// Reads the headers if they have not been read yet, then
    /// exactly `width * height * channels` sample tokens, each
    /// validated against the declared maximum. Nothing is returned
    /// unless every sample validates.
    pub fn decode(&mut self) -> Result<Raster, PnmDecodeErrors> {
        self.read_headers()?;

        let channels = self.colorspace.num_components();
        let size = self
            .width
            .saturating_mul(self.height)
            .saturating_mul(channels);

        let max_value = i64::from(self.max_value);
        let mut samples = vec![0_u8; size];

        for sample in samples.iter_mut() {
            skip_spaces(&mut self.reader);

            let value = get_ascii_integer(&mut self.reader)?;

            if value < 0 || value > max_value {
                return Err(PnmDecodeErrors::SampleOutOfRange(value, self.max_value));
            }
            *sample = value as u8;
        }

        Ok(Raster::from_parts(
            self.width,
            self.height,
            self.max_value,
            self.colorspace,
            samples
        ))
    }

    /// Decode the whole image, replacing `raster` with the result
    ///
    /// On success the target raster's dimensions, max value and
    /// samples are all swapped at once. On any failure the target
    /// is left exactly as it was.
    pub fn decode_into(&mut self, raster: &mut Raster) -> Result<(), PnmDecodeErrors> {
        let decoded = self.decode()?;

        *raster = decoded;

        Ok(())
    }

    /// Return image dimensions or none if headers aren't decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            return Some((self.width, self.height));
        }
        None
    }

    /// Return the image colorspace or none if headers aren't decoded
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        if self.decoded_headers {
            return Some(self.colorspace);
        }
        None
    }

    /// Return the declared maximum sample value or none if headers
    /// aren't decoded
    pub const fn max_value(&self) -> Option<u8> {
        if self.decoded_headers {
            return Some(self.max_value);
        }
        None
    }
}

/// Skip whitespace and `#` line comments until the cursor rests on
/// a byte that is neither, or the stream ends
///
/// A comment runs from its `#` to the next line terminator and may
/// be followed by further whitespace and comments, the loop keeps
/// going until something else comes up.
fn skip_spaces(byte_stream: &mut ByteReader) {
    while !byte_stream.eof() {
        let mut byte = byte_stream.get_u8();

        if byte == b'#' {
            // comment, skip the whole line
            while byte != b'\n' && !byte_stream.eof() {
                byte = byte_stream.get_u8();
            }
        } else if !byte.is_ascii_whitespace() {
            // go back one step, we hit something that is not a space
            byte_stream.rewind(1);
            break;
        }
    }
}

/// Return a reference to the bytes up to the next whitespace,
/// advancing past them
///
/// Returns an empty slice at end of stream.
fn get_token<'a>(reader: &mut ByteReader<'a>) -> &'a [u8] {
    let rest = reader.remaining_bytes();
    let end = rest
        .iter()
        .position(|x| x.is_ascii_whitespace())
        .unwrap_or(rest.len());

    reader.skip(end);

    &rest[..end]
}

/// Read a decimal integer token, honoring an optional leading minus
///
/// Digits accumulate with saturating arithmetic so absurdly long
/// tokens stay representable and fail later range checks instead of
/// wrapping.
fn get_ascii_integer(reader: &mut ByteReader) -> Result<i64, PnmDecodeErrors> {
    if reader.eof() {
        return Err(PnmDecodeErrors::MalformedToken(
            "unexpected end of input while reading an integer"
        ));
    }
    let negative = {
        let byte = reader.get_u8();

        if byte != b'-' {
            reader.rewind(1);
        }
        byte == b'-'
    };

    let mut value = 0_i64;
    let mut digits = 0_usize;

    while !reader.eof() {
        let byte = reader.get_u8();

        if byte.is_ascii_digit() {
            digits += 1;
            value = value
                .saturating_mul(10)
                .saturating_add(i64::from(byte - b'0'));
        } else {
            // rewind to the previous byte
            reader.rewind(1);
            break;
        }
    }
    if digits == 0 {
        return Err(PnmDecodeErrors::MalformedToken("expected a decimal digit"));
    }
    Ok(if negative { -value } else { value })
}

/// Read a decimal integer that must be non-negative
///
/// Header fields are unsigned, a leading minus makes the token
/// malformed rather than out of range.
fn get_ascii_unsigned(reader: &mut ByteReader) -> Result<usize, PnmDecodeErrors> {
    let value = get_ascii_integer(reader)?;

    if value < 0 {
        return Err(PnmDecodeErrors::MalformedToken(
            "negative value for an unsigned header field"
        ));
    }
    Ok(value as usize)
}

#[test]
fn decode_plain_gray() {
    let data = b"P2\n3 2\n255\n0 50 100\n150 200 255\n";
    let mut decoder = PnmDecoder::new(data);

    let raster = decoder.decode().unwrap();

    assert_eq!(raster.width(), 3);
    assert_eq!(raster.height(), 2);
    assert_eq!(raster.max_value(), 255);
    assert_eq!(raster.samples(), &[0, 50, 100, 150, 200, 255]);
    assert_eq!(decoder.dimensions(), Some((3, 2)));
}

#[test]
fn decode_plain_rgb() {
    let data = b"P3\n2 1\n255\n255 0 0\n0 255 0\n";
    let mut decoder = PnmDecoder::new(data);
    decoder.set_version(PnmVersions::P3);

    let raster = decoder.decode().unwrap();

    assert_eq!(raster.width(), 2);
    assert_eq!(raster.height(), 1);
    assert_eq!(raster.channels(), 3);
    assert_eq!(raster.samples(), &[255, 0, 0, 0, 255, 0]);
}

#[test]
fn comments_are_transparent() {
    let plain = b"P2\n2 2\n255\n1 2 3 4\n";
    let commented =
        b"# leading\nP2 # after magic\n# before width\n2 # width done\n2\n255 # max\n1 2 # samples\n# mid stream\n3 4\n";

    let a = PnmDecoder::new(plain).decode().unwrap();
    let b = PnmDecoder::new(commented).decode().unwrap();

    assert!(a == b);
}

#[test]
fn wrong_magic_is_recoverable() {
    let data = b"P3\n1 1\n255\n1 2 3\n";
    let mut decoder = PnmDecoder::new(data);

    let err = decoder.decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::BadMagic(..)));

    // retry with the other variant
    let mut decoder = PnmDecoder::new(data);
    decoder.set_version(PnmVersions::P3);
    assert!(decoder.decode().is_ok());
}

#[test]
fn max_value_above_255_is_rejected() {
    let data = b"P2\n1 1\n65535\n1000\n";

    let err = PnmDecoder::new(data).decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::MaxValueOverflow(65535)));
}

#[test]
fn sample_above_declared_max_is_rejected() {
    // 100 is below 255 but above the declared max of 64
    let data = b"P2\n2 1\n64\n10 100\n";

    let err = PnmDecoder::new(data).decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::SampleOutOfRange(100, 64)));
}

#[test]
fn negative_sample_is_rejected() {
    let data = b"P2\n2 1\n255\n-1 5\n";

    let err = PnmDecoder::new(data).decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::SampleOutOfRange(-1, 255)));
}

#[test]
fn truncated_sample_stream_is_malformed() {
    let data = b"P2\n2 2\n255\n1 2 3";

    let err = PnmDecoder::new(data).decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::MalformedToken(_)));
}

#[test]
fn non_numeric_sample_is_malformed() {
    let data = b"P2\n1 1\n255\nabc\n";

    let err = PnmDecoder::new(data).decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::MalformedToken(_)));
}

#[test]
fn negative_width_is_malformed() {
    let data = b"P2\n-2 2\n255\n1 2 3 4\n";

    let err = PnmDecoder::new(data).decode().unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::MalformedToken(_)));
}

#[test]
fn dimensions_above_limits_are_rejected() {
    let data = b"P2\n4 4\n255\n";
    let options = DecoderOptions::default().set_max_width(3);

    let err = PnmDecoder::new_with_options(data, options)
        .decode()
        .unwrap_err();
    assert!(matches!(err, PnmDecodeErrors::LargeDimensions(3, 4)));
}

#[test]
fn failed_decode_leaves_target_untouched() {
    let mut target = Raster::filled(1, 1, ColorSpace::Luma, 42);

    let err = PnmDecoder::new(b"P2\n1 1\n9999\n0\n").decode_into(&mut target);

    assert!(err.is_err());
    assert_eq!(target.width(), 1);
    assert_eq!(target.samples(), &[42]);
}

#[test]
fn headers_alone_can_be_read() {
    let data = b"P2\n# size\n7 9\n31\n";
    let mut decoder = PnmDecoder::new(data);

    assert_eq!(decoder.dimensions(), None);
    decoder.read_headers().unwrap();
    assert_eq!(decoder.dimensions(), Some((7, 9)));
    assert_eq!(decoder.max_value(), Some(31));
    assert_eq!(decoder.colorspace(), Some(ColorSpace::Luma));
}
