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

//! Binary serialization of two point tables.
//!
//! ## Layout (Little Endian)
//!
//! | Field | Type | Version 2 | Version 3 |
//! |-------|------|-----------|-----------|
//! | version | `u8` | yes | yes |
//! | bin value | `f64` | yes | yes |
//! | nside | `u64` | yes | yes |
//! | npix | `u64` | yes | yes |
//! | pixel list | `npix` x `i32` | yes | yes |
//! | scheme | `u8`, 0 = NEST, 1 = RING | no | yes |
//! | nmax | `u64` | yes | yes |
//! | body | zlib stream of `npix * nmax` x `i32` | yes | yes |
//!
//! Version 2 tables are always NEST. Only version 3 is written. The body runs
//! to the end of the stream and is empty when `npix * nmax == 0`.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use byteorder::LittleEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use tracing::debug;
use tracing::warn;

use super::EntryKind;
use super::TwoPointTable;
use crate::codec;
use crate::codec::ENTRY_SIZE_BYTES;
use crate::error::Error;
use crate::healpix::Scheme;

/// Format version without a scheme byte; implicitly NEST.
pub const SERIAL_VERSION_2: u8 = 2;
/// Format version with an explicit scheme byte. Always used for writing.
pub const SERIAL_VERSION_3: u8 = 3;

/// Default zlib compression level of the table body.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
/// Largest zlib compression level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Options used when writing a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    compression_level: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl WriteOptions {
    /// Sets the zlib compression level of the table body.
    ///
    /// # Panics
    ///
    /// Panics if `level` is greater than [`MAX_COMPRESSION_LEVEL`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use twopt::table::WriteOptions;
    /// let options = WriteOptions::default().with_compression_level(9);
    /// assert_eq!(options.compression_level(), 9);
    /// ```
    pub fn with_compression_level(mut self, level: u32) -> Self {
        assert!(
            level <= MAX_COMPRESSION_LEVEL,
            "compression level must be in [0, {MAX_COMPRESSION_LEVEL}], got {level}"
        );
        self.compression_level = level;
        self
    }

    /// Returns the zlib compression level of the table body.
    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }
}

/// Everything stored in front of the compressed table body.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    version: u8,
    cos_bin: f64,
    nside: u64,
    pixel_list: Vec<i32>,
    scheme: Scheme,
    nmax: usize,
}

impl TableHeader {
    /// Returns the format version the header was read from.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the value of the bin.
    pub fn bin_value(&self) -> f64 {
        self.cos_bin
    }

    /// Returns the resolution parameter `nside`.
    pub fn resolution(&self) -> u64 {
        self.nside
    }

    /// Returns the pixels present in the bin.
    pub fn pixel_list(&self) -> &[i32] {
        &self.pixel_list
    }

    /// Returns the number of pixels in the bin.
    pub fn pixel_count(&self) -> usize {
        self.pixel_list.len()
    }

    /// Returns the width of every row of the table body.
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

    fn into_table(self, table: Vec<i32>) -> TwoPointTable {
        TwoPointTable {
            cos_bin: self.cos_bin,
            nside: self.nside,
            pixel_list: self.pixel_list,
            nmax: self.nmax,
            scheme: self.scheme,
            entries: EntryKind::LocalIndex,
            table,
        }
    }
}

/// Reads a table header starting at the current position of `reader`.
///
/// On success the reader is left on the first byte of the table body. An
/// unsupported version byte is reported before anything else is consumed.
pub fn read_header<R: Read>(reader: &mut R) -> Result<TableHeader, Error> {
    fn make_error(tag: &'static str) -> impl FnOnce(io::Error) -> Error {
        move |err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                Error::truncated_header(tag)
            } else {
                Error::io(format!("failed to read header field {tag}"), err)
            }
        }
    }

    let version = reader.read_u8().map_err(make_error("version"))?;
    if version != SERIAL_VERSION_2 && version != SERIAL_VERSION_3 {
        return Err(Error::unsupported_version(version));
    }

    let cos_bin = reader
        .read_f64::<LittleEndian>()
        .map_err(make_error("bin_value"))?;
    let nside = reader
        .read_u64::<LittleEndian>()
        .map_err(make_error("nside"))?;
    let npix = reader
        .read_u64::<LittleEndian>()
        .map_err(make_error("npix"))?;

    let pixel_bytes = usize::try_from(npix)
        .ok()
        .and_then(|n| n.checked_mul(ENTRY_SIZE_BYTES))
        .ok_or_else(|| Error::invalid_data(format!("pixel count {npix} is too large")))?;
    // Grow with the data actually present instead of trusting npix up front.
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(pixel_bytes as u64)
        .read_to_end(&mut bytes)
        .map_err(make_error("pixel_list"))?;
    if bytes.len() != pixel_bytes {
        return Err(Error::truncated_header("pixel_list")
            .with_context("expected_bytes", pixel_bytes)
            .with_context("actual_bytes", bytes.len()));
    }
    let pixel_list = codec::decode_entries(&bytes);

    let scheme = if version == SERIAL_VERSION_3 {
        let id = reader.read_u8().map_err(make_error("scheme"))?;
        Scheme::from_id(id)
            .ok_or_else(|| Error::invalid_data(format!("unknown pixel scheme id: {id}")))?
    } else {
        Scheme::Nest
    };

    let nmax = reader
        .read_u64::<LittleEndian>()
        .map_err(make_error("nmax"))?;
    let nmax = usize::try_from(nmax)
        .map_err(|_| Error::invalid_data(format!("row width {nmax} is too large")))?;

    Ok(TableHeader {
        version,
        cos_bin,
        nside,
        pixel_list,
        scheme,
        nmax,
    })
}

/// Reads the compressed table body, everything remaining in `reader`.
///
/// The body must inflate to exactly `npix * nmax` little-endian `i32` values.
pub fn read_body<R: Read>(reader: &mut R, npix: usize, nmax: usize) -> Result<Vec<i32>, Error> {
    let expected_len = npix
        .checked_mul(nmax)
        .and_then(|n| n.checked_mul(ENTRY_SIZE_BYTES))
        .ok_or_else(|| {
            Error::invalid_data(format!("table of {npix} x {nmax} entries is too large"))
        })?;

    let mut blob = Vec::new();
    reader
        .read_to_end(&mut blob)
        .map_err(|err| Error::io("failed to read table body", err))?;
    let bytes = codec::decompress(&blob, expected_len)?;
    Ok(codec::decode_entries(&bytes))
}

impl TwoPointTable {
    /// Reads a table, header then body, from `reader`.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<TwoPointTable, Error> {
        let header = read_header(reader)?;
        let table = read_body(reader, header.pixel_count(), header.max_neighbors())?;
        Ok(header.into_table(table))
    }

    /// Deserializes a table from bytes.
    pub fn deserialize(mut bytes: &[u8]) -> Result<TwoPointTable, Error> {
        Self::read_from(&mut bytes)
    }

    /// Reads a table from the file at `path`.
    pub fn read_file(path: impl AsRef<Path>) -> Result<TwoPointTable, Error> {
        let path = path.as_ref();
        let mut reader = open(path)?;
        let table =
            Self::read_from(&mut reader).map_err(|err| err.with_context("path", path.display()))?;
        debug!(
            path = %path.display(),
            npix = table.pixel_count(),
            nmax = table.max_neighbors(),
            scheme = ?table.scheme(),
            "read two point table"
        );
        Ok(table)
    }

    /// Reads only the header of the file at `path`.
    ///
    /// The compressed body is never touched, so this is cheap even for large
    /// tables and succeeds when the body is damaged.
    pub fn read_file_header(path: impl AsRef<Path>) -> Result<TableHeader, Error> {
        let path = path.as_ref();
        let mut reader = open(path)?;
        let header =
            read_header(&mut reader).map_err(|err| err.with_context("path", path.display()))?;
        debug!(
            path = %path.display(),
            version = header.version(),
            npix = header.pixel_count(),
            nmax = header.max_neighbors(),
            "read two point table header"
        );
        Ok(header)
    }

    /// Writes the table in the current format version to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W, options: &WriteOptions) -> Result<(), Error> {
        if self.entries == EntryKind::PixelNumber {
            warn!(
                "writing a two point table holding pixel numbers; it will read back as local indices"
            );
        }
        let body = codec::compress(&codec::encode_entries(&self.table), options.compression_level)
            .map_err(|err| Error::io("failed to compress table body", err))?;
        self.write_header(writer)
            .and_then(|_| writer.write_all(&body))
            .map_err(|err| Error::io("failed to write two point table", err))
    }

    /// Serializes the table into bytes.
    pub fn serialize(&self, options: &WriteOptions) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::with_capacity(self.header_size_bytes());
        self.write_to(&mut bytes, options)?;
        Ok(bytes)
    }

    /// Writes the table to the file at `path` with default options.
    ///
    /// The file is created or truncated. After a failure the file may be left
    /// incomplete.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.write_file_with(path, &WriteOptions::default())
    }

    /// Writes the table to the file at `path`.
    pub fn write_file_with(
        &self,
        path: impl AsRef<Path>,
        options: &WriteOptions,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| {
            Error::io("failed to create two point table file", err)
                .with_context("path", path.display())
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, options)
            .and_then(|_| {
                writer
                    .flush()
                    .map_err(|err| Error::io("failed to flush two point table", err))
            })
            .map_err(|err| err.with_context("path", path.display()))?;
        debug!(
            path = %path.display(),
            npix = self.pixel_count(),
            nmax = self.max_neighbors(),
            level = options.compression_level(),
            "wrote two point table"
        );
        Ok(())
    }

    fn header_size_bytes(&self) -> usize {
        1 + 8 + 8 + 8 + self.pixel_list.len() * ENTRY_SIZE_BYTES + 1 + 8
    }

    fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(SERIAL_VERSION_3)?;
        writer.write_f64::<LittleEndian>(self.cos_bin)?;
        writer.write_u64::<LittleEndian>(self.nside)?;
        writer.write_u64::<LittleEndian>(self.pixel_list.len() as u64)?;
        writer.write_all(&codec::encode_entries(&self.pixel_list))?;
        writer.write_u8(self.scheme.id())?;
        writer.write_u64::<LittleEndian>(self.nmax as u64)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, Error> {
    let file = File::open(path).map_err(|err| {
        Error::io("failed to open two point table file", err).with_context("path", path.display())
    })?;
    Ok(BufReader::new(file))
}
