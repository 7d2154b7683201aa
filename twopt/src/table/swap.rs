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

use tracing::debug;

use super::EntryKind;
use super::SENTINEL;
use super::TwoPointTable;
use crate::error::Error;
use crate::healpix;

struct Swapped {
    pixel_list: Vec<i32>,
    table: Vec<i32>,
}

impl TwoPointTable {
    /// Renumbers the table into the other pixel scheme.
    ///
    /// The pixel list is converted and sorted ascending, and every row is
    /// rebuilt, re-sorted and re-padded to the same width. Entries of the
    /// resulting rows are **pixel numbers** in the new scheme, not local
    /// indices, and [`entry_kind`](Self::entry_kind) becomes
    /// [`EntryKind::PixelNumber`]. Swapping such a table again reads its entries
    /// as pixel numbers, so a double swap restores the sorted pixel list and
    /// the original scheme.
    ///
    /// On error the table is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidState`](crate::error::ErrorKind::InvalidState)
    /// if the pixel list, the row width or the table is not populated, and
    /// [`ErrorKind::InvalidData`](crate::error::ErrorKind::InvalidData) if `nside`
    /// is unusable or a pixel or entry is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use twopt::healpix::Scheme;
    /// # use twopt::table::{EntryKind, TwoPointTable};
    /// let mut table =
    ///     TwoPointTable::from_parts(2, vec![0, 1], 0.5, Scheme::Nest, 1, vec![1, 0]).unwrap();
    /// table.swap_scheme().unwrap();
    /// assert!(table.is_ring());
    /// assert_eq!(table.pixel_list(), &[5, 13]);
    /// assert_eq!(table.table(), &[13, 5]);
    /// assert_eq!(table.entry_kind(), EntryKind::PixelNumber);
    /// ```
    pub fn swap_scheme(&mut self) -> Result<(), Error> {
        let swapped = self.swapped()?;
        let from = self.scheme;
        self.pixel_list = swapped.pixel_list;
        self.table = swapped.table;
        self.scheme = from.other();
        self.entries = EntryKind::PixelNumber;
        debug!(
            from = ?from,
            to = ?self.scheme,
            npix = self.pixel_list.len(),
            nmax = self.nmax,
            "swapped two point table scheme"
        );
        Ok(())
    }

    fn swapped(&self) -> Result<Swapped, Error> {
        let npix = self.pixel_list.len();
        let nmax = self.nmax;
        if npix == 0 || nmax == 0 || self.table.is_empty() {
            return Err(Error::invalid_state(
                "cannot swap the scheme of a table that is not populated",
            )
            .with_context("npix", npix)
            .with_context("nmax", nmax)
            .with_context("entries", self.table.len()));
        }
        if self.table.len() != npix * nmax {
            return Err(Error::invalid_state(format!(
                "table holds {} entries, expected npix * nmax = {npix} * {nmax}",
                self.table.len()
            )));
        }

        let nside = self.nside;
        let invalid_nside = || {
            Error::invalid_data(format!(
                "nside must be a power of two with 12 * nside^2 < 2^31, got {nside}"
            ))
        };
        if !healpix::is_valid_nside(nside) {
            return Err(invalid_nside());
        }
        let total = healpix::npix(nside);
        // The out of range marker below must still fit into an i32.
        if total >= i32::MAX as u64 {
            return Err(invalid_nside());
        }
        let bad_value = (total + 1) as i32;
        let from = self.scheme;
        let convert = |pixel: i32| -> Result<i32, Error> {
            if pixel < 0 || pixel as u64 >= total {
                return Err(Error::invalid_data(format!(
                    "pixel {pixel} is out of range for nside {nside}"
                )));
            }
            Ok(from.convert_to_other(nside, pixel as u64) as i32)
        };

        let converted = self
            .pixel_list
            .iter()
            .map(|&pixel| convert(pixel))
            .collect::<Result<Vec<_>, _>>()?;

        let mut order: Vec<usize> = (0..npix).collect();
        order.sort_unstable_by_key(|&i| converted[i]);
        let pixel_list: Vec<i32> = order.iter().map(|&i| converted[i]).collect();
        if let Some(pair) = pixel_list.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::invalid_data(format!(
                "pixel {} appears more than once in the pixel list",
                pair[0]
            )));
        }
        // rank[i] is the row of old row i in the new table
        let mut rank = vec![0usize; npix];
        for (new_row, &old_row) in order.iter().enumerate() {
            rank[old_row] = new_row;
        }

        let mut table = vec![bad_value; npix * nmax];
        for (i, row) in self.table.chunks_exact(nmax).enumerate() {
            let start = rank[i] * nmax;
            let target = &mut table[start..start + nmax];
            for (slot, &entry) in target.iter_mut().zip(row) {
                if entry == SENTINEL {
                    break;
                }
                *slot = convert(self.neighbor_pixel(entry)?)?;
            }
        }

        for row in table.chunks_exact_mut(nmax) {
            row.sort_unstable();
            for value in row.iter_mut().filter(|v| **v == bad_value) {
                *value = SENTINEL;
            }
        }

        Ok(Swapped { pixel_list, table })
    }

    /// Resolves a row entry to a pixel number in the current scheme.
    fn neighbor_pixel(&self, entry: i32) -> Result<i32, Error> {
        match self.entries {
            EntryKind::PixelNumber => Ok(entry),
            EntryKind::LocalIndex => usize::try_from(entry)
                .ok()
                .and_then(|k| self.pixel_list.get(k))
                .copied()
                .ok_or_else(|| {
                    Error::invalid_data(format!(
                        "entry {entry} is not an index into a pixel list of length {}",
                        self.pixel_list.len()
                    ))
                }),
        }
    }
}
