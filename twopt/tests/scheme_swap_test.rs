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

mod common;

use std::collections::BTreeSet;

use common::SCENARIO_NSIDE;
use common::SCENARIO_PIXELS;
use common::scenario_table;
use common::scenario_table_local;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use twopt::error::ErrorKind;
use twopt::healpix;
use twopt::healpix::Scheme;
use twopt::table::EntryKind;
use twopt::table::SENTINEL;
use twopt::table::TwoPointTable;
use twopt::table::TwoPointTableBuilder;

/// Every third pixel at nside 8, in shuffled order, paired with nearby list positions.
fn build_masked_table(scheme: Scheme) -> TwoPointTable {
    let nside = 8;
    let mut pixels: Vec<i32> = (0..healpix::npix(nside) as i32).step_by(3).collect();
    pixels.reverse();
    pixels.swap(0, 17);
    let mut builder = TwoPointTableBuilder::new(nside, pixels, 0.3).with_scheme(scheme);
    let npix = builder.pixel_count();
    for i in 0..npix {
        for j in i + 1..npix.min(i + 9) {
            if (i * j) % 4 != 1 {
                builder.add_pair(i, j);
            }
        }
    }
    builder.build()
}

/// Pairs of pixel numbers encoded in a table holding local indices.
fn local_pairs(table: &TwoPointTable) -> BTreeSet<(i32, i32)> {
    assert_eq!(table.entry_kind(), EntryKind::LocalIndex);
    let pixels = table.pixel_list();
    (0..table.pixel_count())
        .flat_map(|i| {
            table
                .neighbors(i)
                .iter()
                .map(move |&k| (pixels[i], pixels[k as usize]))
        })
        .collect()
}

/// Pairs of pixel numbers encoded in a table holding pixel numbers.
fn pixel_pairs(table: &TwoPointTable) -> BTreeSet<(i32, i32)> {
    assert_eq!(table.entry_kind(), EntryKind::PixelNumber);
    let pixels = table.pixel_list();
    (0..table.pixel_count())
        .flat_map(|i| table.neighbors(i).iter().map(move |&p| (pixels[i], p)))
        .collect()
}

fn assert_rows_sorted_with_trailing_sentinels(table: &TwoPointTable) {
    for i in 0..table.pixel_count() {
        let row = table.row(i);
        let len = table.neighbors(i).len();
        assert!(
            row[..len].windows(2).all(|w| w[0] <= w[1]),
            "row {i} is not sorted: {row:?}"
        );
        assert!(row[..len].iter().all(|&v| v != SENTINEL));
        assert!(
            row[len..].iter().all(|&v| v == SENTINEL),
            "row {i} has entries after a sentinel: {row:?}"
        );
    }
}

#[test]
fn test_scenario_swap_to_ring() {
    let mut table = scenario_table_local();
    table.swap_scheme().unwrap();

    // NEST 3, 5, 9 are RING 42, 27, 25 at nside 4
    assert!(table.is_ring());
    assert_eq!(table.pixel_list(), &[25, 27, 42]);
    assert_eq!(table.max_neighbors(), 2);
    assert_eq!(table.table(), &[-1, -1, 25, 42, 27, -1]);
    assert_eq!(table.bin_value(), 0.87);
    assert_eq!(table.resolution(), SCENARIO_NSIDE);
    assert_eq!(table.entry_kind(), EntryKind::PixelNumber);
}

#[test]
fn test_scenario_swap_of_pixel_numbers_to_ring() {
    let mut table = scenario_table().with_entry_kind(EntryKind::PixelNumber);
    table.swap_scheme().unwrap();

    assert!(table.is_ring());
    assert_eq!(table.pixel_list(), &[25, 27, 42]);
    assert_eq!(table.max_neighbors(), 2);
    assert_eq!(table.table(), &[-1, -1, 25, 42, 27, -1]);
    assert_eq!(table.entry_kind(), EntryKind::PixelNumber);

    // both encodings of the scenario describe the same adjacency
    let mut local = scenario_table_local();
    local.swap_scheme().unwrap();
    assert_eq!(table, local);
}

#[test]
fn test_scenario_swap_rejects_pixel_numbers_as_local_indices() {
    // Entry 5 is not a position in a three element pixel list.
    let mut table = scenario_table();
    let before = table.clone();

    let err = table.swap_scheme().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_that!(err.message(), contains_substring("entry 5"));
    assert_eq!(table, before);
}

#[test]
fn test_swap_preserves_pairs() {
    for scheme in [Scheme::Nest, Scheme::Ring] {
        let mut table = build_masked_table(scheme);
        let expected: BTreeSet<(i32, i32)> = local_pairs(&table)
            .into_iter()
            .map(|(a, b)| {
                let convert = |p: i32| scheme.convert_to_other(8, p as u64) as i32;
                (convert(a), convert(b))
            })
            .collect();
        let nmax = table.max_neighbors();

        table.swap_scheme().unwrap();
        assert_eq!(table.scheme(), scheme.other());
        assert_eq!(table.max_neighbors(), nmax);
        assert!(table.pixel_list().windows(2).all(|w| w[0] < w[1]));
        assert_rows_sorted_with_trailing_sentinels(&table);
        assert_eq!(pixel_pairs(&table), expected);
    }
}

#[test]
fn test_double_swap_restores_pixel_list() {
    let original = build_masked_table(Scheme::Nest);
    let mut sorted_pixels = original.pixel_list().to_vec();
    sorted_pixels.sort_unstable();
    let pairs = local_pairs(&original);

    let mut table = original.clone();
    table.swap_scheme().unwrap();
    table.swap_scheme().unwrap();

    assert!(table.is_nest());
    assert_eq!(table.pixel_list(), sorted_pixels.as_slice());
    assert_eq!(table.bin_value(), original.bin_value());
    assert_eq!(table.max_neighbors(), original.max_neighbors());
    assert_rows_sorted_with_trailing_sentinels(&table);
    assert_eq!(pixel_pairs(&table), pairs);
}

#[test]
fn test_swap_full_sky_keeps_row_width() {
    let nside = 2;
    let pixels: Vec<i32> = (0..healpix::npix(nside) as i32).collect();
    let mut builder = TwoPointTableBuilder::new(nside, pixels, 1.0);
    builder.add_pair(0, 47);
    builder.add_pair(0, 1);
    builder.add_pair(0, 2);
    let mut table = builder.build();
    assert_eq!(table.max_neighbors(), 3);

    table.swap_scheme().unwrap();
    assert_eq!(table.pixel_list(), (0..48).collect::<Vec<i32>>().as_slice());
    assert_eq!(table.max_neighbors(), 3);
    assert_eq!(table.table().len(), 48 * 3);
    // NEST 0, 1, 2, 47 are RING 13, 5, 4, 35 at nside 2
    let ring = |p: u64| healpix::nest_to_ring(nside, p) as usize;
    assert_eq!(table.row(ring(0)), &[4, 5, 35]);
    assert_eq!(table.row(ring(47)), &[13, -1, -1]);
    assert_eq!(table.row(ring(3)), &[-1, -1, -1]);
}

#[test]
fn test_swap_unpopulated_table() {
    let mut table = TwoPointTable::new();
    let err = table.swap_scheme().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(table, TwoPointTable::new());

    let mut no_pairs = TwoPointTableBuilder::new(4, SCENARIO_PIXELS.to_vec(), 0.5).build();
    let err = no_pairs.swap_scheme().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(no_pairs.is_nest());
}

#[test]
fn test_swap_rejects_invalid_contents() {
    // nside must be a power of two
    let mut table =
        TwoPointTable::from_parts(3, vec![0, 1], 0.0, Scheme::Nest, 1, vec![1, 0]).unwrap();
    assert_eq!(table.swap_scheme().unwrap_err().kind(), ErrorKind::InvalidData);

    // pixel out of range for nside 1
    let mut table =
        TwoPointTable::from_parts(1, vec![0, 12], 0.0, Scheme::Nest, 1, vec![1, 0]).unwrap();
    let err = table.swap_scheme().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_that!(err.message(), contains_substring("out of range"));
    assert_eq!(table.pixel_list(), &[0, 12]);

    // duplicated pixel
    let mut table =
        TwoPointTable::from_parts(1, vec![4, 4], 0.0, Scheme::Nest, 1, vec![1, 0]).unwrap();
    let err = table.swap_scheme().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_that!(err.message(), contains_substring("more than once"));
    assert_eq!(table.entry_kind(), EntryKind::LocalIndex);
}

#[test]
fn test_swap_rejects_oversized_nside() {
    let mut table =
        TwoPointTable::from_parts(1u64 << 40, vec![0, 1], 0.5, Scheme::Nest, 1, vec![1, 0])
            .unwrap();
    let err = table.swap_scheme().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_that!(err.message(), contains_substring("power of two"));
    assert_eq!(table.pixel_list(), &[0, 1]);
    assert_eq!(table.table(), &[1, 0]);
    assert!(table.is_nest());
}

#[test]
fn test_from_parts_checks_table_length() {
    let table = vec![SENTINEL; 5];
    let err = TwoPointTable::from_parts(4, SCENARIO_PIXELS.to_vec(), 0.5, Scheme::Nest, 2, table)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
