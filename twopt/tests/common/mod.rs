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

use twopt::healpix::Scheme;
use twopt::table::TwoPointTable;

pub const SCENARIO_NSIDE: u64 = 4;
pub const SCENARIO_PIXELS: [i32; 3] = [3, 5, 9];
pub const SCENARIO_BIN_VALUE: f64 = 0.87;

/// Three NEST pixels at nside 4 with 3 -> {5}, 5 -> {3, 9} stored as pixel numbers.
pub fn scenario_table() -> TwoPointTable {
    TwoPointTable::from_parts(
        SCENARIO_NSIDE,
        SCENARIO_PIXELS.to_vec(),
        SCENARIO_BIN_VALUE,
        Scheme::Nest,
        2,
        vec![5, -1, 3, 9, -1, -1],
    )
    .unwrap()
}

/// The same adjacency as [`scenario_table`] stored as local indices.
pub fn scenario_table_local() -> TwoPointTable {
    TwoPointTable::from_parts(
        SCENARIO_NSIDE,
        SCENARIO_PIXELS.to_vec(),
        SCENARIO_BIN_VALUE,
        Scheme::Nest,
        2,
        vec![1, -1, 0, 2, -1, -1],
    )
    .unwrap()
}
