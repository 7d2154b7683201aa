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

use super::EntryKind;
use super::SENTINEL;
use super::TwoPointTable;
use crate::healpix::Scheme;

/// Accumulates the pairs of one bin and packs them into a [`TwoPointTable`].
///
/// Pairs are added by local index into the pixel list. A builder can be
/// reused for several bins over the same pixels: [`reset`](Self::reset) the
/// rows, update the bin value, add the pairs of the next bin and build again.
///
/// # Examples
///
/// ```
/// # use twopt::table::TwoPointTableBuilder;
/// let mut builder = TwoPointTableBuilder::new(1, vec![0, 4, 8], 0.75);
/// builder.add_pair(0, 2);
/// builder.add_pair(0, 1);
///
/// let table = builder.build();
/// assert_eq!(table.max_neighbors(), 2);
/// assert_eq!(table.table(), &[1, 2, 0, -1, 0, -1]);
/// ```
#[derive(Debug, Clone)]
pub struct TwoPointTableBuilder {
    nside: u64,
    pixel_list: Vec<i32>,
    bin_value: f64,
    scheme: Scheme,
    rows: Vec<Vec<i32>>,
}

impl TwoPointTableBuilder {
    /// Creates a builder for NEST pixels.
    ///
    /// # Panics
    ///
    /// Panics if the pixel list is longer than `i32::MAX`.
    pub fn new(nside: u64, pixel_list: Vec<i32>, bin_value: f64) -> Self {
        assert!(
            pixel_list.len() <= i32::MAX as usize,
            "pixel list must hold at most {} pixels, got {}",
            i32::MAX,
            pixel_list.len()
        );
        let rows = vec![Vec::new(); pixel_list.len()];
        Self {
            nside,
            pixel_list,
            bin_value,
            scheme: Scheme::Nest,
            rows,
        }
    }

    /// Sets the numbering scheme of the pixel list.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the value of the bin being built.
    pub fn set_bin_value(&mut self, bin_value: f64) {
        self.bin_value = bin_value;
    }

    /// Returns the value of the bin being built.
    pub fn bin_value(&self) -> f64 {
        self.bin_value
    }

    /// Returns the number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.pixel_list.len()
    }

    /// Records `j` as a neighbor of `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`pixel_count`](Self::pixel_count).
    pub fn add(&mut self, i: usize, j: usize) {
        let npix = self.pixel_list.len();
        assert!(
            i < npix && j < npix,
            "local indices must be in [0, {npix}), got ({i}, {j})"
        );
        self.rows[i].push(j as i32);
    }

    /// Records `i` and `j` as neighbors of each other.
    pub fn add_pair(&mut self, i: usize, j: usize) {
        self.add(i, j);
        self.add(j, i);
    }

    /// Clears all rows, keeping the pixel list and the bin value.
    pub fn reset(&mut self) {
        for row in self.rows.iter_mut() {
            row.clear();
        }
    }

    /// Packs the rows into a table.
    ///
    /// The row width is the length of the longest row; rows are sorted and
    /// padded with [`SENTINEL`].
    pub fn build(&self) -> TwoPointTable {
        let nmax = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut table = vec![SENTINEL; self.rows.len() * nmax];
        for (target, row) in table.chunks_exact_mut(nmax.max(1)).zip(&self.rows) {
            target[..row.len()].copy_from_slice(row);
            target[..row.len()].sort_unstable();
        }
        TwoPointTable {
            cos_bin: self.bin_value,
            nside: self.nside,
            pixel_list: self.pixel_list.clone(),
            nmax,
            scheme: self.scheme,
            entries: EntryKind::LocalIndex,
            table,
        }
    }
}
