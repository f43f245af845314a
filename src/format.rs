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

//! Output formats.

use crate::variable::{VarKind, VarWidth};

/// Widest string print width shown in variable display parameters.
pub const MAX_PRINT_STRING_WIDTH: usize = 40;

/// Output format type.
///
/// Only the types the writer emits; the format defines many more.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// String.
    A,

    /// Basic numeric.
    F,

    /// Date in `dd-mmm-yyyy` form.
    Date,

    /// Date and time in `dd-mmm-yyyy hh:mm:ss` form.
    DateTime,
}

impl From<Type> for u16 {
    fn from(type_: Type) -> Self {
        match type_ {
            Type::A => 1,
            Type::F => 5,
            Type::Date => 20,
            Type::DateTime => 22,
        }
    }
}

/// An output format, as a type plus width and decimal counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Format {
    type_: Type,
    w: u8,
    d: u8,
}

impl Format {
    /// Constructs a format from its parts.
    pub fn new(type_: Type, w: u8, d: u8) -> Self {
        Self { type_, w, d }
    }

    /// The format's type.
    pub fn type_(&self) -> Type {
        self.type_
    }

    /// The format's width.
    pub fn w(&self) -> u8 {
        self.w
    }

    /// The format's number of decimal places.
    pub fn d(&self) -> u8 {
        self.d
    }

    /// Returns the default format for a variable of the given `kind` and
    /// `width`: `F8.2` for numbers, `DATE11` and `DATETIME20` for dates,
    /// and `A` with the print width capped at [MAX_PRINT_STRING_WIDTH] for
    /// strings.
    pub fn default_for_kind(kind: VarKind, width: VarWidth) -> Self {
        match kind {
            VarKind::Numeric => Self::new(Type::F, 8, 2),
            VarKind::Date => Self::new(Type::Date, 11, 0),
            VarKind::DateTime => Self::new(Type::DateTime, 20, 0),
            VarKind::String => Self::new(
                Type::A,
                width
                    .as_string_width()
                    .unwrap_or(0)
                    .min(MAX_PRINT_STRING_WIDTH) as u8,
                0,
            ),
        }
    }
}
