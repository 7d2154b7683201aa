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

//! Byte-level helpers shared by the table readers and writers.
//!
//! The table body is a flat run of little-endian `i32` values compressed as a
//! single zlib stream.

use std::io;
use std::io::Read;
use std::io::Write;

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::Error;
use crate::error::ErrorKind;

/// Size in bytes of one table entry on disk.
pub(crate) const ENTRY_SIZE_BYTES: usize = 4;

/// Packs table entries into little-endian bytes.
pub(crate) fn encode_entries(entries: &[i32]) -> Vec<u8> {
    let mut bytes = vec![0u8; entries.len() * ENTRY_SIZE_BYTES];
    LittleEndian::write_i32_into(entries, &mut bytes);
    bytes
}

/// Unpacks little-endian bytes into table entries.
///
/// The caller guarantees `bytes.len()` is a multiple of [`ENTRY_SIZE_BYTES`].
pub(crate) fn decode_entries(bytes: &[u8]) -> Vec<i32> {
    debug_assert_eq!(bytes.len() % ENTRY_SIZE_BYTES, 0);
    let mut entries = vec![0i32; bytes.len() / ENTRY_SIZE_BYTES];
    LittleEndian::read_i32_into(bytes, &mut entries);
    entries
}

/// Compresses `bytes` into a zlib stream at the given level.
///
/// An empty input produces an empty output; tables without entries have no
/// body bytes at all.
pub(crate) fn compress(bytes: &[u8], level: u32) -> io::Result<Vec<u8>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(bytes.len() / 4),
        Compression::new(level),
    );
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Decompresses a zlib stream that must inflate to exactly `expected_len` bytes.
pub(crate) fn decompress(blob: &[u8], expected_len: usize) -> Result<Vec<u8>, Error> {
    if blob.is_empty() {
        if expected_len == 0 {
            return Ok(Vec::new());
        }
        return Err(Error::new(
            ErrorKind::Decompression,
            "table body is empty but the header declares entries",
        )
        .with_context("expected_bytes", expected_len));
    }

    // Read at most one byte past the expected size so oversized payloads are
    // detected without inflating them completely. The capacity hint is capped
    // by the compressed size because `expected_len` comes from the header.
    let mut bytes = Vec::with_capacity(expected_len.min(blob.len().saturating_mul(4)));
    let limit = (expected_len as u64).saturating_add(1);
    ZlibDecoder::new(blob)
        .take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| {
            Error::new(ErrorKind::Decompression, "table body is not a valid zlib stream")
                .with_context("compressed_bytes", blob.len())
                .set_source(err)
        })?;

    if bytes.len() != expected_len {
        let actual = if bytes.len() > expected_len {
            format!("more than {expected_len}")
        } else {
            bytes.len().to_string()
        };
        return Err(Error::new(
            ErrorKind::SizeMismatch,
            format!("decompressed table body holds {actual} bytes, expected {expected_len}"),
        ));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_little_endian() {
        let bytes = encode_entries(&[1, -1]);
        assert_eq!(bytes, vec![1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(decode_entries(&bytes), vec![1, -1]);
    }

    #[test]
    fn test_compress_empty_is_empty() {
        assert!(compress(&[], 6).unwrap().is_empty());
        assert!(decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_decompress_rejects_wrong_size() {
        let blob = compress(&encode_entries(&[1, 2, 3]), 6).unwrap();
        assert_eq!(decompress(&blob, 12).unwrap().len(), 12);

        let err = decompress(&blob, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        let err = decompress(&blob, 16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        let err = decompress(b"definitely not zlib", 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decompression);
    }
}
