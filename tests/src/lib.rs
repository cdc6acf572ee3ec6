/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::path::PathBuf;

mod pnm;

/// A scratch path under the system temp directory, unique per test
/// process so parallel runs don't trample each other
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lume-{}-{name}", std::process::id()))
}
