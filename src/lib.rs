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

//! # Writing SPSS system files
//!
//! This crate writes "system files", the binary `.sav` format for SPSS data
//! files: a little-endian file holding a dictionary of variables followed
//! by a bytecode-compressed stream of cases, readable by modern SPSS and
//! compatible software.
//!
//! Build a [Writer] over any sink that supports writing and absolute
//! seeking, declare variables, then stream cases:
//!
//! ```
//! use std::io::Cursor;
//! use sav::{VarKind, VarSpec, Writer};
//!
//! # fn main() -> Result<(), sav::Error> {
//! let mut writer = Writer::new(Cursor::new(Vec::new()));
//! writer.add_variable(VarSpec::new("age", VarKind::Numeric))?;
//! writer.add_variable(VarSpec::new("code", VarKind::String).with_width(4))?;
//! writer.start("example file")?;
//!
//! writer.clear_case();
//! writer.set_variable("age", "42")?;
//! writer.set_variable("code", "ok")?;
//! writer.write_case()?;
//!
//! let sink = writer.finish()?;
//! # assert!(sink.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! The sink must be seekable because the case count is patched into the
//! header after the data is streamed; a pipe will not do.  The writer
//! holds whole compressed blocks before touching the sink, but a
//! [BufWriter](std::io::BufWriter) around a
//! [File](std::fs::File) (as [Writer::create] sets up) is still
//! recommended for the record-heavy dictionary.

// Warn about missing docs, but not for items declared with `#[cfg(test)]`.
#![cfg_attr(not(test), warn(missing_docs))]

pub mod bytecode;
pub mod calendar;
pub mod dictionary;
pub mod format;
pub mod identifier;
pub mod message;
pub mod records;
pub mod variable;
pub mod write;

pub use dictionary::find_lengths;
pub use message::Warning;
pub use variable::{Measure, ValueLabel, VarKind, VarSpec};
pub use write::{Error, WriteOptions, Writer};
