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

//! Diagnostics reported while writing.

use thiserror::Error as ThisError;

/// A non-fatal problem encountered while writing.
///
/// Warnings are delivered to the reporter installed with
/// [Writer::set_reporter](crate::write::Writer::set_reporter); the default
/// reporter discards them.  In each case the writer recovers as the variant
/// describes.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum Warning {
    /// Name hygiene changed a variable name; the cleaned name is the one to
    /// use with `set_variable`.
    #[error("Variable name {from:?} changed to {to:?}.")]
    RenamedVariable {
        /// The name as given.
        from: String,
        /// The cleaned name.
        to: String,
    },

    /// A value did not parse as a number; system-missing was written.
    #[error("Value {value:?} for variable {variable} is not a number; writing system-missing.")]
    InvalidNumber {
        /// The variable's name.
        variable: String,
        /// The offending value.
        value: String,
    },

    /// A value did not parse as a date; system-missing was written.
    #[error(
        "Value {value:?} for variable {variable} is not a date in D-Mmm-YYYY form; \
         writing system-missing."
    )]
    InvalidDate {
        /// The variable's name.
        variable: String,
        /// The offending value.
        value: String,
    },

    /// A value did not parse as a date and time; system-missing was
    /// written.
    #[error(
        "Value {value:?} for variable {variable} is not a date and time in \
         D-Mmm-YYYY HH:MM:SS form; writing system-missing."
    )]
    InvalidDateTime {
        /// The variable's name.
        variable: String,
        /// The offending value.
        value: String,
    },

    /// A string value was longer than the variable's declared width and was
    /// truncated.
    #[error("Value for variable {variable} truncated to its declared width of {width} bytes.")]
    TruncatedString {
        /// The variable's name.
        variable: String,
        /// The declared width.
        width: u16,
    },
}
