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

use crate::error::Error;
use crate::healpix::Scheme;

use super::SENTINEL;

/// Meaning of the values stored in a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryKind {
    /// Entries are positions in the table's own pixel list.
    ///
    /// Every table read from a file or produced by the builder is in this state.
    #[default]
    LocalIndex,
    /// Entries are global pixel numbers in the table's current scheme.
    ///
    /// This is the state left by [`TwoPointTable::swap_scheme`]. The file format
    /// has no field for it, so a table written in this state reads back as
    /// [`EntryKind::LocalIndex`].
    PixelNumber,
}

/// A single angular bin of a two point table.
///
/// The table holds, for every pixel of [`pixel_list`](Self::pixel_list), the
/// pixels separated from it by an angle falling into this bin. Rows have a
/// fixed width of [`max_neighbors`](Self::max_neighbors) slots, are sorted
/// ascending and padded with [`SENTINEL`] once the real entries run out.
///
/// See the [table module level documentation](crate::table) for more.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TwoPointTable {
    pub(super) cos_bin: f64,
    pub(super) nside: u64,
    pub(super) pixel_list: Vec<i32>,
    pub(super) nmax: usize,
    pub(super) scheme: Scheme,
    pub(super) entries: EntryKind,
    pub(super) table: Vec<i32>,
}

impl TwoPointTable {
    /// Creates an empty table.
    ///
    /// An empty table can be written, but [`swap_scheme`](Self::swap_scheme)
    /// rejects it until it has been populated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from its parts.
    ///
    /// `table` is row-major with `pixel_list.len() * nmax` entries, each one a
    /// local index into `pixel_list` or [`SENTINEL`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use twopt::healpix::Scheme;
    /// # use twopt::table::TwoPointTable;
    /// let table =
    ///     TwoPointTable::from_parts(1, vec![0, 1], 0.5, Scheme::Nest, 1, vec![1, 0]).unwrap();
    /// assert_eq!(table.pixel_count(), 2);
    /// assert_eq!(table.get(0, 0), 1);
    /// ```
    pub fn from_parts(
        nside: u64,
        pixel_list: Vec<i32>,
        bin_value: f64,
        scheme: Scheme,
        nmax: usize,
        table: Vec<i32>,
    ) -> Result<Self, Error> {
        let expected = pixel_list.len().checked_mul(nmax);
        if expected != Some(table.len()) {
            return Err(Error::invalid_argument(format!(
                "table must hold npix * nmax = {} * {nmax} entries, got {}",
                pixel_list.len(),
                table.len()
            )));
        }
        Ok(Self {
            cos_bin: bin_value,
            nside,
            pixel_list,
            nmax,
            scheme,
            entries: EntryKind::LocalIndex,
            table,
        })
    }

    /// Declares what the table entries refer to.
    ///
    /// Tables start out holding [`EntryKind::LocalIndex`] entries. Use
    /// [`EntryKind::PixelNumber`] for a table whose entries are pixel numbers
    /// in the current scheme, such as one produced by another tool or read
    /// back from a file written after a scheme swap.
    ///
    /// # Examples
    ///
    /// ```
    /// # use twopt::healpix::Scheme;
    /// # use twopt::table::EntryKind;
    /// # use twopt::table::TwoPointTable;
    /// let mut table = TwoPointTable::from_parts(1, vec![4, 5], 0.5, Scheme::Nest, 1, vec![5, 4])
    ///     .unwrap()
    ///     .with_entry_kind(EntryKind::PixelNumber);
    /// table.swap_scheme().unwrap();
    /// assert!(table.is_ring());
    /// ```
    pub fn with_entry_kind(mut self, kind: EntryKind) -> Self {
        self.entries = kind;
        self
    }

    /// Returns the value of the bin, the cosine of its representative angle.
    pub fn bin_value(&self) -> f64 {
        self.cos_bin
    }

    /// Returns the resolution parameter `nside`.
    pub fn resolution(&self) -> u64 {
        self.nside
    }

    /// Returns the pixels present in this bin.
    pub fn pixel_list(&self) -> &[i32] {
        &self.pixel_list
    }

    /// Returns the number of pixels in this bin.
    pub fn pixel_count(&self) -> usize {
        self.pixel_list.len()
    }

    /// Returns the width of every row.
    pub fn max_neighbors(&self) -> usize {
        self.nmax
    }

    /// Returns the numbering scheme of the pixel list.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns true if pixels are numbered in the NEST scheme.
    pub fn is_nest(&self) -> bool {
        self.scheme == Scheme::Nest
    }

    /// Returns true if pixels are numbered in the RING scheme.
    pub fn is_ring(&self) -> bool {
        self.scheme == Scheme::Ring
    }

    /// Returns what the values stored in the rows refer to.
    pub fn entry_kind(&self) -> EntryKind {
        self.entries
    }

    /// Returns the entry in slot `j` of row `i`.
    ///
    /// For a table in [`EntryKind::LocalIndex`] state the value is an index into
    /// [`pixel_list`](Self::pixel_list); after [`swap_scheme`](Self::swap_scheme)
    /// it is a pixel number. Unused slots hold [`SENTINEL`].
    ///
    /// # Panics
    ///
    /// Panics if `i >= pixel_count()` or `j >= max_neighbors()`.
    pub fn get(&self, i: usize, j: usize) -> i32 {
        assert!(
            j < self.nmax,
            "column must be in [0, {}), got {j}",
            self.nmax
        );
        self.row(i)[j]
    }

    /// Returns row `i` including its trailing sentinels.
    ///
    /// # Panics
    ///
    /// Panics if `i >= pixel_count()`.
    pub fn row(&self, i: usize) -> &[i32] {
        assert!(
            i < self.pixel_list.len(),
            "row must be in [0, {}), got {i}",
            self.pixel_list.len()
        );
        &self.table[i * self.nmax..(i + 1) * self.nmax]
    }

    /// Returns the entries of row `i` without the trailing sentinels.
    ///
    /// # Panics
    ///
    /// Panics if `i >= pixel_count()`.
    pub fn neighbors(&self, i: usize) -> &[i32] {
        let row = self.row(i);
        let len = row.iter().position(|&v| v == SENTINEL).unwrap_or(row.len());
        &row[..len]
    }

    /// Returns the whole table in row-major order.
    pub fn table(&self) -> &[i32] {
        &self.table
    }
}
