// sav - a library for writing SPSS system files.
// Copyright (C) 2025 Free Software Foundation, Inc.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Raw records.
//!
//! The fixed-layout structures written to disk, separated into their own
//! module just to reduce clutter.  Everything is written little-endian.

use std::io::{Seek, Write};

use binrw::{BinRead, BinResult, BinWrite, Endian};
use encoding_rs::Encoding;

use crate::format::Format;

/// Offset of [RawHeader::n_cases] from the start of the file, patched by
/// the finalizer once the case count is known.
pub const N_CASES_OFFSET: u64 = 80;

/// Raw file header, 176 bytes at the start of the file.
#[derive(BinRead, BinWrite)]
pub struct RawHeader {
    /// Magic number, `$FL2`.
    pub magic: [u8; 4],

    /// Eye-catcher string and product name, padded with spaces.
    pub eye_catcher: [u8; 60],

    /// Layout code, always 2.
    pub layout_code: i32,

    /// Number of 8-byte elements per case.
    pub nominal_case_size: i32,

    /// Compression type; 1 is bytecode compression.
    pub compression: i32,

    /// 1-based element index of the weight variable, or 0 if the file is
    /// unweighted.
    pub weight_index: i32,

    /// Number of cases, or -1 when not yet known.
    pub n_cases: i32,

    /// Compression bias, usually 100.0.
    pub bias: f64,

    /// `dd mmm yy`.
    pub creation_date: [u8; 9],

    /// `HH:MM:SS`.
    pub creation_time: [u8; 8],

    /// File label, padded with spaces.
    pub file_label: [u8; 64],

    /// Zero padding.
    pub padding: [u8; 3],
}

/// [Format] packed the way variable records store it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, BinRead, BinWrite)]
pub struct RawFormat(
    /// The most-significant 16 bits are the type, the next 8 bits are the
    /// width, and the least-significant 8 bits are the number of decimals.
    pub u32,
);

impl RawFormat {
    /// Packs the string format for one segment of `width` bytes.
    pub fn string_segment(width: u16) -> Self {
        Self((u16::from(crate::format::Type::A) as u32) << 16 | (width as u32) << 8)
    }
}

impl From<Format> for RawFormat {
    fn from(format: Format) -> Self {
        Self(
            (u16::from(format.type_()) as u32) << 16
                | (format.w() as u32) << 8
                | format.d() as u32,
        )
    }
}

/// Body of a variable record, written after its `rec_type` word of 2.
#[derive(Clone, BinRead, BinWrite)]
pub struct RawVariableRecord {
    /// Width: 0 for numeric, the segment width for strings, -1 for
    /// continuations.
    pub width: i32,

    /// 1 if a variable label follows the record, 0 otherwise.
    pub has_variable_label: u32,

    /// Count of missing values; this writer declares none.
    pub missing_value_code: i32,

    /// Print format.
    pub print_format: RawFormat,

    /// Write format.
    pub write_format: RawFormat,

    /// Short name, padded with spaces.
    pub name: [u8; 8],
}

impl RawVariableRecord {
    /// A continuation record, one per trailing 8-byte element of a segment
    /// wider than 8 bytes.
    pub fn continuation() -> Self {
        Self {
            width: -1,
            has_variable_label: 0,
            missing_value_code: 0,
            print_format: RawFormat(0),
            write_format: RawFormat(0),
            name: *b"        ",
        }
    }
}

/// Software version stamped into the integer info record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, BinRead, BinWrite)]
pub struct ProductVersion(
    /// Major version.
    pub i32,
    /// Minor version.
    pub i32,
    /// Revision.
    pub i32,
);

/// Machine integer info record (record type 7, subtype 3).
#[derive(Clone, Debug, PartialEq, Eq, BinRead, BinWrite)]
pub struct IntegerInfoRecord {
    /// Version number.
    pub version: ProductVersion,

    /// Identifies the type of machine; -1 means unspecified.
    pub machine_code: i32,

    /// Floating-point representation; 1 is IEEE 754.
    pub floating_point_rep: i32,

    /// Compression code.
    pub compression_code: i32,

    /// Endianness; 2 is little-endian.
    pub endianness: i32,

    /// Character encoding; 65001 is the UTF-8 code page.
    pub character_code: i32,
}

/// Machine floating-point info record (record type 7, subtype 4).
#[derive(Clone, Debug, PartialEq, BinRead, BinWrite)]
pub struct FloatInfoRecord {
    /// The system-missing value.
    pub sysmis: f64,

    /// Largest representable value.
    pub highest: f64,

    /// Smallest representable value.
    pub lowest: f64,
}

/// A run of identical fill bytes.
pub struct Pad {
    n: usize,
    fill: u8,
}

impl Pad {
    /// A run of `n` copies of `fill`.
    pub fn new(n: usize, fill: u8) -> Self {
        Self { n, fill }
    }

    /// A run of `n` zero bytes.
    pub fn zeros(n: usize) -> Self {
        Self::new(n, 0)
    }

    /// A run of `n` spaces.
    pub fn spaces(n: usize) -> Self {
        Self::new(n, b' ')
    }
}

impl BinWrite for Pad {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        for _ in 0..self.n {
            writer.write_all(&[self.fill])?;
        }
        Ok(())
    }
}

/// Encodes `s`, truncated or padded with spaces to exactly `N` bytes.
pub fn fixed_string<const N: usize>(s: &str, encoding: &'static Encoding) -> [u8; N] {
    let mut encoded = encoding.encode(s).0.into_owned();
    encoded.truncate(N);
    encoded.resize(N, b' ');
    encoded.try_into().unwrap()
}
