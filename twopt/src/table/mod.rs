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

//! Two point tables: for one angular bin, the neighbors of every pixel.
//!
//! A two point table stores, for each pixel of a (possibly masked) HEALPix
//! map, the pixels whose separation falls into the bin. Rows have a fixed
//! width and are padded with [`SENTINEL`], so the table is a flat row-major
//! array of `pixel_count() * max_neighbors()` entries. Entries are local
//! indices into the pixel list, except after
//! [`swap_scheme`](TwoPointTable::swap_scheme) (see [`EntryKind`]).
//!
//! Tables are stored one bin per file. The header carries the bin value,
//! resolution, pixel list and row width; the body is the zlib-compressed
//! table. The header can be read on its own to inspect large archives
//! without inflating the body.
//!
//! # Usage
//!
//! ```rust
//! # use twopt::table::{TwoPointTable, TwoPointTableBuilder, WriteOptions};
//! let mut builder = TwoPointTableBuilder::new(2, vec![0, 1, 2, 3], 0.9);
//! builder.add_pair(0, 1);
//! builder.add_pair(0, 3);
//! let table = builder.build();
//!
//! let bytes = table.serialize(&WriteOptions::default()).unwrap();
//! let decoded = TwoPointTable::deserialize(&bytes).unwrap();
//! assert_eq!(decoded, table);
//! assert_eq!(decoded.neighbors(0), &[1, 3]);
//! ```

mod builder;
mod serialization;
mod swap;
mod twopt_table;

pub use self::builder::TwoPointTableBuilder;
pub use self::serialization::DEFAULT_COMPRESSION_LEVEL;
pub use self::serialization::MAX_COMPRESSION_LEVEL;
pub use self::serialization::SERIAL_VERSION_2;
pub use self::serialization::SERIAL_VERSION_3;
pub use self::serialization::TableHeader;
pub use self::serialization::WriteOptions;
pub use self::serialization::read_body;
pub use self::serialization::read_header;
pub use self::twopt_table::EntryKind;
pub use self::twopt_table::TwoPointTable;

/// Marker for an unused slot at the end of a row.
pub const SENTINEL: i32 = -1;
