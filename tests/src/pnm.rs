/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;

use lume_core::colorspace::ColorSpace;
use lume_pnm::{
    decode_file, encode_file, version_for_path, PnmDecodeErrors, PnmDecoder, PnmEncoder,
    PnmVersions, Raster
};

use crate::temp_path;

fn gray_raster(width: usize, height: usize, samples: &[u8]) -> Raster {
    let mut raster = Raster::filled(width, height, ColorSpace::Luma, 0);
    raster.samples_mut().copy_from_slice(samples);
    raster
}

fn rgb_raster(width: usize, height: usize, samples: &[u8]) -> Raster {
    let mut raster = Raster::filled(width, height, ColorSpace::RGB, 0);
    raster.samples_mut().copy_from_slice(samples);
    raster
}

fn encode_to_vec(raster: &Raster) -> Vec<u8> {
    let mut out = Vec::new();
    PnmEncoder::new(&mut out).encode(raster).unwrap();
    out
}

#[test]
fn gray_round_trip_preserves_everything() {
    let mut raster = gray_raster(5, 4, &[17; 20]);
    for (i, sample) in raster.samples_mut().iter_mut().enumerate() {
        *sample = (i * 12) as u8;
    }
    raster.set_max_value(250);
    // keep every sample within the declared maximum
    raster.samples_mut().iter_mut().for_each(|x| *x %= 251);

    let encoded = encode_to_vec(&raster);
    let decoded = PnmDecoder::new(&encoded).decode().unwrap();

    assert!(decoded == raster);
}

#[test]
fn rgb_round_trip_preserves_everything() {
    let samples: Vec<u8> = (0..3 * 6 * 2).map(|x| (x * 7 % 256) as u8).collect();
    let raster = rgb_raster(6, 2, &samples);

    let encoded = encode_to_vec(&raster);

    let mut decoder = PnmDecoder::new(&encoded);
    decoder.set_version(PnmVersions::P3);
    let decoded = decoder.decode().unwrap();

    assert!(decoded == raster);
}

#[test]
fn comments_between_sample_tokens_are_ignored() {
    let plain = b"P3\n1 2\n255\n1 2 3\n4 5 6\n";
    let commented = b"P3\n1 2\n255\n1 # red\n2 # green\n3\n# next pixel\n4 5 6\n";

    let mut a = PnmDecoder::new(plain);
    a.set_version(PnmVersions::P3);
    let mut b = PnmDecoder::new(commented);
    b.set_version(PnmVersions::P3);

    assert!(a.decode().unwrap() == b.decode().unwrap());
}

#[test]
fn golden_gray_scenario_decodes() {
    let raster = PnmDecoder::new(b"P2\n2 2\n255\n255 0 128 64 \n")
        .decode()
        .unwrap();

    assert_eq!(raster.samples(), &[255, 0, 128, 64]);
    assert_eq!(raster.pixel_at(1, 0).unwrap(), &[128]);
    // re-encoding reproduces the input byte for byte
    assert_eq!(encode_to_vec(&raster), b"P2\n2 2\n255\n255 0 128 64 \n");
}

#[test]
fn file_round_trip_gray() {
    let path = temp_path("round-trip.pgm");
    let raster = gray_raster(3, 3, &[0, 10, 20, 30, 40, 50, 60, 70, 80]);

    encode_file(&raster, &path).unwrap();
    let decoded = decode_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(decoded == raster);
}

#[test]
fn file_round_trip_rgb() {
    let path = temp_path("round-trip.ppm");
    let raster = rgb_raster(2, 2, &[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0]);

    encode_file(&raster, &path).unwrap();
    let decoded = decode_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    // the .ppm suffix selected the RGB variant
    assert_eq!(decoded.colorspace(), ColorSpace::RGB);
    assert!(decoded == raster);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = decode_file(temp_path("does-not-exist.pgm")).unwrap_err();

    assert!(matches!(err, PnmDecodeErrors::IoErrors(_)));
}

#[test]
fn mis_suffixed_file_fails_at_the_magic_token() {
    // grayscale content behind an RGB suffix
    let path = temp_path("mis-suffixed.ppm");
    fs::write(&path, b"P2\n1 1\n255\n0\n").unwrap();

    let err = decode_file(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, PnmDecodeErrors::BadMagic(PnmVersions::P3, _)));
}

#[test]
fn extension_inference_matches_decode_file() {
    assert_eq!(version_for_path("a/b/c.ppm"), PnmVersions::P3);
    assert_eq!(version_for_path("a/b/c.pgm"), PnmVersions::P2);
    assert_eq!(version_for_path("a/b/c"), PnmVersions::P2);
}

#[test]
fn low_max_value_survives_the_round_trip() {
    let mut raster = gray_raster(2, 1, &[3, 14]);
    raster.set_max_value(15);

    let encoded = encode_to_vec(&raster);
    let decoded = PnmDecoder::new(&encoded).decode().unwrap();

    assert_eq!(decoded.max_value(), 15);
    assert!(decoded == raster);
}

#[test]
fn decode_failure_never_replaces_the_target() {
    let mut target = gray_raster(1, 2, &[1, 2]);
    let pristine = target.clone();

    // every failure class in turn
    for bad in [
        &b"P3\n1 1\n255\n0\n"[..],          // wrong magic
        &b"P2\n1 1\n500\n0\n"[..],          // max value too large
        &b"P2\n2 1\n255\n1 -2\n"[..],       // negative sample
        &b"P2\n2 1\n255\n1\n"[..],          // truncated
        &b"P2\nx 1\n255\n0\n"[..]           // malformed width
    ] {
        assert!(PnmDecoder::new(bad).decode_into(&mut target).is_err());
        assert!(target == pristine);
    }
}
