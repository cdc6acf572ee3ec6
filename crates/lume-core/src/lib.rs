/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the lume crates
//!
//! This crate provides a set of small utilities shared by the
//! decoders and encoders under the `lume` umbrella
//!
//! It currently contains
//!
//! - A positioned bytestream reader used by token-level parsers
//! - Colorspace information shared by rasters
//! - Decoder options
//!
pub mod bytestream;
pub mod colorspace;
pub mod options;
