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

use twopt::healpix::MAX_NSIDE;
use twopt::healpix::Scheme;
use twopt::healpix::is_valid_nside;
use twopt::healpix::nest_to_ring;
use twopt::healpix::npix;
use twopt::healpix::ring_to_nest;

#[test]
fn test_known_values() {
    let ring: Vec<u64> = (0..4).map(|p| nest_to_ring(2, p)).collect();
    assert_eq!(ring, vec![13, 5, 4, 0]);
    assert_eq!(nest_to_ring(2, 47), 35);

    assert_eq!(nest_to_ring(4, 3), 42);
    assert_eq!(nest_to_ring(4, 5), 27);
    assert_eq!(nest_to_ring(4, 9), 25);
    let nest: Vec<u64> = (0..4).map(|p| ring_to_nest(4, p)).collect();
    assert_eq!(nest, vec![15, 31, 47, 63]);
    assert_eq!(ring_to_nest(4, 47), 20);

    assert_eq!(nest_to_ring(8, 100), 155);
    assert_eq!(ring_to_nest(8, 767), 704);
}

#[test]
fn test_nside_one_is_identity() {
    for p in 0..12 {
        assert_eq!(nest_to_ring(1, p), p);
        assert_eq!(ring_to_nest(1, p), p);
    }
}

#[test]
fn test_conversion_is_a_bijection() {
    for nside in [1u64, 2, 4, 8, 16, 32] {
        let total = npix(nside);
        let mut seen = vec![false; total as usize];
        for p in 0..total {
            let r = nest_to_ring(nside, p);
            assert!(r < total);
            assert!(!seen[r as usize], "nside {nside}: ring pixel {r} hit twice");
            seen[r as usize] = true;
            assert_eq!(ring_to_nest(nside, r), p, "nside {nside}, nest pixel {p}");
        }
    }
}

#[test]
fn test_large_nside_round_trip() {
    let nside = 1 << 20;
    let total = npix(nside);
    for p in [0, 1, total / 3, total / 2 + 7, total - 1] {
        assert_eq!(ring_to_nest(nside, nest_to_ring(nside, p)), p);
        assert_eq!(nest_to_ring(nside, ring_to_nest(nside, p)), p);
    }
}

#[test]
fn test_scheme_conversion() {
    assert_eq!(Scheme::default(), Scheme::Nest);
    assert_eq!(Scheme::Nest.other(), Scheme::Ring);
    assert_eq!(Scheme::Ring.other(), Scheme::Nest);
    assert_eq!(Scheme::from_id(Scheme::Ring.id()), Some(Scheme::Ring));
    assert_eq!(Scheme::from_id(2), None);
    assert_eq!(Scheme::Nest.convert_to_other(4, 3), 42);
    assert_eq!(Scheme::Ring.convert_to_other(4, 42), 3);
}

#[test]
fn test_valid_nside() {
    assert!(is_valid_nside(1));
    assert!(is_valid_nside(1024));
    assert!(is_valid_nside(MAX_NSIDE));
    assert!(!is_valid_nside(0));
    assert!(!is_valid_nside(6));
    assert!(!is_valid_nside(MAX_NSIDE * 2));
}

#[test]
#[should_panic(expected = "nside must be a power of two")]
fn test_non_power_of_two_nside_panics() {
    nest_to_ring(3, 0);
}

#[test]
#[should_panic(expected = "pixel must be in")]
fn test_pixel_out_of_range_panics() {
    ring_to_nest(2, 48);
}

#[test]
#[should_panic(expected = "nside must be at most")]
fn test_npix_rejects_oversized_nside() {
    npix(MAX_NSIDE * 2);
}
