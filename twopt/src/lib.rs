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

//! Compressed two point tables for pixel based n-point correlation functions.
//!
//! Higher order correlation functions of a pixelized sky map are computed by
//! walking, for every pixel, the pixels at a given angular separation. This
//! crate stores those neighbor lists, one angular bin at a time, in a compact
//! binary format and converts them between the HEALPix NEST and RING
//! numbering schemes.
//!
//! - [`table`]: the [`TwoPointTable`](table::TwoPointTable), its builder and
//!   its binary format.
//! - [`healpix`]: NEST <-> RING pixel number conversion.
//! - [`files`]: naming of per-bin table files.
//! - [`error`]: the error type shared by all operations.

mod codec;

pub mod error;
pub mod files;
pub mod healpix;
pub mod table;
