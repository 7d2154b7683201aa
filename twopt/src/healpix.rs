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

//! HEALPix pixel numbering schemes and the conversion between them.
//!
//! The sphere is split into 12 base faces, each subdivided into `nside^2`
//! pixels, for `12 * nside^2` pixels in total. NEST numbers pixels along a
//! Z-order curve inside each face; RING numbers them along iso-latitude rings
//! from north to south. Both conventions describe the same pixels, so a pixel
//! number can be mapped between them given `nside`.
//!
//! NEST numbering requires `nside` to be a power of two.
//!
//! # Usage
//!
//! ```rust
//! # use twopt::healpix::{nest_to_ring, ring_to_nest};
//! assert_eq!(nest_to_ring(2, 0), 13);
//! assert_eq!(ring_to_nest(2, 13), 0);
//! ```

/// Largest supported resolution parameter.
pub const MAX_NSIDE: u64 = 1 << MAX_ORDER;

const MAX_ORDER: u32 = 29;

// Ring index (in units of nside) and longitude index of the corner of each base face.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// Pixel numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// Nested (Z-order within each base face).
    #[default]
    Nest = 0,
    /// Ring (iso-latitude rings).
    Ring = 1,
}

impl Scheme {
    /// Returns the byte identifying this scheme in serialized tables.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns the scheme identified by `id`, if any.
    pub fn from_id(id: u8) -> Option<Scheme> {
        match id {
            0 => Some(Scheme::Nest),
            1 => Some(Scheme::Ring),
            _ => None,
        }
    }

    /// Returns the other scheme.
    pub fn other(self) -> Scheme {
        match self {
            Scheme::Nest => Scheme::Ring,
            Scheme::Ring => Scheme::Nest,
        }
    }

    /// Converts `pixel`, numbered in this scheme, to the other scheme.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`nest_to_ring`].
    pub fn convert_to_other(self, nside: u64, pixel: u64) -> u64 {
        match self {
            Scheme::Nest => nest_to_ring(nside, pixel),
            Scheme::Ring => ring_to_nest(nside, pixel),
        }
    }
}

/// Returns the total number of pixels on the sphere for `nside`.
///
/// # Panics
///
/// Panics if `nside` is greater than [`MAX_NSIDE`].
pub fn npix(nside: u64) -> u64 {
    assert!(
        nside <= MAX_NSIDE,
        "nside must be at most {MAX_NSIDE}, got {nside}"
    );
    12 * nside * nside
}

/// Returns true if `nside` can be used with both numbering schemes.
pub fn is_valid_nside(nside: u64) -> bool {
    nside.is_power_of_two() && nside <= MAX_NSIDE
}

/// Converts a NEST pixel number to the RING pixel number of the same pixel.
///
/// # Panics
///
/// Panics if `nside` is not a power of two in `[1, MAX_NSIDE]` or if `pixel`
/// is not below `12 * nside^2`.
///
/// # Examples
///
/// ```
/// # use twopt::healpix::nest_to_ring;
/// // With nside = 1 both schemes number the 12 base faces identically.
/// assert_eq!(nest_to_ring(1, 7), 7);
/// assert_eq!(nest_to_ring(4, 3), 42);
/// ```
pub fn nest_to_ring(nside: u64, pixel: u64) -> u64 {
    check_args(nside, pixel);
    let (ix, iy, face) = nest_to_xyf(nside, pixel);
    xyf_to_ring(nside as i64, ix, iy, face) as u64
}

/// Converts a RING pixel number to the NEST pixel number of the same pixel.
///
/// # Panics
///
/// Panics if `nside` is not a power of two in `[1, MAX_NSIDE]` or if `pixel`
/// is not below `12 * nside^2`.
pub fn ring_to_nest(nside: u64, pixel: u64) -> u64 {
    check_args(nside, pixel);
    let (ix, iy, face) = ring_to_xyf(nside as i64, pixel as i64);
    xyf_to_nest(nside, ix, iy, face)
}

fn check_args(nside: u64, pixel: u64) {
    assert!(
        is_valid_nside(nside),
        "nside must be a power of two in [1, {MAX_NSIDE}], got {nside}"
    );
    assert!(
        pixel < npix(nside),
        "pixel must be in [0, {}), got {pixel}",
        npix(nside)
    );
}

fn order(nside: u64) -> u32 {
    nside.trailing_zeros()
}

fn nest_to_xyf(nside: u64, pixel: u64) -> (i64, i64, usize) {
    let order = order(nside);
    let face = (pixel >> (2 * order)) as usize;
    let within = pixel & (nside * nside - 1);
    let ix = compress_bits(within) as i64;
    let iy = compress_bits(within >> 1) as i64;
    (ix, iy, face)
}

fn xyf_to_nest(nside: u64, ix: i64, iy: i64, face: usize) -> u64 {
    let order = order(nside);
    ((face as u64) << (2 * order)) + spread_bits(ix as u64) + (spread_bits(iy as u64) << 1)
}

fn xyf_to_ring(nside: i64, ix: i64, iy: i64, face: usize) -> i64 {
    let nl4 = 4 * nside;
    let npix = 12 * nside * nside;
    let ncap = 2 * nside * (nside - 1);
    let jr = JRLL[face] * nside - ix - iy - 1;

    let (nr, n_before, kshift) = if jr < nside {
        // north polar cap
        (jr, 2 * jr * (jr - 1), 0)
    } else if jr > 3 * nside {
        // south polar cap
        let nr = nl4 - jr;
        (nr, npix - 2 * (nr + 1) * nr, 0)
    } else {
        (nside, ncap + (jr - nside) * nl4, (jr - nside) & 1)
    };

    let mut jp = (JPLL[face] * nr + ix - iy + 1 + kshift) / 2;
    if jp > nl4 {
        jp -= nl4;
    } else if jp < 1 {
        jp += nl4;
    }
    n_before + jp - 1
}

fn ring_to_xyf(nside: i64, pixel: i64) -> (i64, i64, usize) {
    let order = order(nside as u64);
    let nl2 = 2 * nside;
    let npix = 12 * nside * nside;
    let ncap = 2 * nside * (nside - 1);

    let (iring, iphi, kshift, nr, face) = if pixel < ncap {
        let iring = (1 + isqrt(1 + 2 * pixel)) >> 1;
        let iphi = (pixel + 1) - 2 * iring * (iring - 1);
        (iring, iphi, 0, iring, ((iphi - 1) / iring) as usize)
    } else if pixel < npix - ncap {
        let ip = pixel - ncap;
        let tmp = ip >> (order + 2);
        let iring = tmp + nside;
        let iphi = ip - tmp * 4 * nside + 1;
        let kshift = (iring + nside) & 1;
        let ire = iring - nside + 1;
        let irm = nl2 + 2 - ire;
        let ifm = (iphi - ire / 2 + nside - 1) >> order;
        let ifp = (iphi - irm / 2 + nside - 1) >> order;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        (iring, iphi, kshift, nside, face as usize)
    } else {
        let ip = npix - pixel;
        let nr = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * nr + 1 - (ip - 2 * nr * (nr - 1));
        (2 * nl2 - nr, iphi, 0, nr, ((iphi - 1) / nr + 8) as usize)
    };

    let irt = iring - JRLL[face] * nside + 1;
    let mut ipt = 2 * iphi - JPLL[face] * nr - kshift - 1;
    if ipt >= nl2 {
        ipt -= 8 * nside;
    }
    ((ipt - irt) >> 1, (-ipt - irt) >> 1, face)
}

fn isqrt(v: i64) -> i64 {
    (v as u64).isqrt() as i64
}

/// Spreads the low 32 bits of `v` onto the even bit positions.
fn spread_bits(v: u64) -> u64 {
    let mut x = v & 0x0000_0000_ffff_ffff;
    x = (x | (x << 16)) & 0x0000_ffff_0000_ffff;
    x = (x | (x << 8)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    (x | (x << 1)) & 0x5555_5555_5555_5555
}

/// Inverse of [`spread_bits`]: gathers the even bit positions of `v`.
fn compress_bits(v: u64) -> u64 {
    let mut x = v & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x | (x >> 4)) & 0x00ff_00ff_00ff_00ff;
    x = (x | (x >> 8)) & 0x0000_ffff_0000_ffff;
    (x | (x >> 16)) & 0x0000_0000_ffff_ffff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_and_compress_bits() {
        assert_eq!(spread_bits(0b1011), 0b1000101);
        assert_eq!(compress_bits(0b1000101), 0b1011);
        for v in [0u64, 1, 2, 3, 0xff, 0x1234_5678, 0xffff_ffff] {
            assert_eq!(compress_bits(spread_bits(v)), v);
        }
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
    }
}
