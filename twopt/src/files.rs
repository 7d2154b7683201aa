// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Naming of per-bin table files.
//!
//! Each bin of a two point table lives in its own file named from a prefix
//! and the zero padded bin number, e.g. `twopt_00012.dat`.

use std::path::PathBuf;

/// Default number of digits of the bin number.
pub const DEFAULT_DIGITS: usize = 5;
/// Default file name suffix.
pub const DEFAULT_SUFFIX: &str = ".dat";

/// Builds the name of file `number`.
///
/// Nothing is inserted between the parts, so a separator belongs at the end
/// of `prefix` and the dot at the start of `suffix`.
///
/// # Examples
///
/// ```
/// # use twopt::files::make_filename;
/// assert_eq!(make_filename("twopt_", 12, 5, ".dat"), "twopt_00012.dat");
/// ```
pub fn make_filename(prefix: &str, number: usize, digits: usize, suffix: &str) -> String {
    format!("{prefix}{number:0digits$}{suffix}")
}

/// Lists the existing files numbered `start`, `start + increment`, ...
///
/// The list stops at the first number without a readable file.
///
/// # Panics
///
/// Panics if `increment` is zero.
pub fn sequential_file_list(
    prefix: &str,
    start: usize,
    increment: usize,
    digits: usize,
    suffix: &str,
) -> Vec<PathBuf> {
    assert!(increment > 0, "increment must be positive");
    let mut files = Vec::new();
    let mut number = start;
    loop {
        let path = PathBuf::from(make_filename(prefix, number, digits, suffix));
        if std::fs::File::open(&path).is_err() {
            break;
        }
        files.push(path);
        number += increment;
    }
    files
}

/// Lists the existing bin files `prefix00000.dat`, `prefix00001.dat`, ...
pub fn bin_file_list(prefix: &str) -> Vec<PathBuf> {
    sequential_file_list(prefix, 0, 1, DEFAULT_DIGITS, DEFAULT_SUFFIX)
}
