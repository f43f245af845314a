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

//! Variable names and their 8-byte aliases.
//!
//! System files store two names for every variable: the long name shown to
//! users, up to 64 bytes, and a short name of at most 8 bytes kept for
//! compatibility with old software.  [clean_var_name] normalizes arbitrary
//! input into a valid long name, and [ShortNames] derives unique short
//! names from long ones.

use std::{
    collections::HashMap,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
};

use unicase::UniCase;

/// A variable's long name.
///
/// Names are compared case-insensitively, the way SPSS compares them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(pub UniCase<String>);

impl Identifier {
    /// Maximum length of a long name, in bytes.
    pub const MAX_LEN: usize = 64;

    /// Wraps `s`, which must already be a valid cleaned name, without
    /// further normalization.
    pub fn new(s: impl Into<String>) -> Self {
        Self(UniCase::new(s.into()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == UniCase::new(other)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Debug for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?}", self.0)
    }
}

/// Normalizes `name` into a valid long variable name.
///
/// Characters outside `[A-Za-z0-9#$_.]` are dropped.  An empty result is
/// replaced by `illegal`, a result that does not start with a letter gains
/// an `@` prefix, and the name is truncated to [Identifier::MAX_LEN] bytes.
pub fn clean_var_name(name: &str) -> Identifier {
    let mut n = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '$' | '_' | '.'))
        .collect::<String>();
    if n.is_empty() {
        n = String::from("illegal");
    }
    if !n.starts_with(|c: char| c.is_ascii_alphabetic()) {
        n.insert(0, '@');
    }
    n.truncate(Identifier::MAX_LEN);
    Identifier::new(n)
}

/// Renders `value` in the base-36 digit sequence used for short-name
/// suffixes: digits `0`-`9`, then letters `a`-`z`.
pub fn int_to_column_name(mut value: u32) -> String {
    let mut name = String::new();
    loop {
        let digit = value % 36;
        name.insert(0, char::from_digit(digit, 36).unwrap());
        if value / 36 >= 1 {
            value = (value - digit) / 36;
        } else {
            break;
        }
    }
    name
}

/// Allocator for unique short names.
///
/// Also serves as the short-name lookup: every allocated name maps back to
/// the 0-based position of its variable.
#[derive(Default)]
pub struct ShortNames {
    used: HashMap<String, usize>,
    fallback: u32,
}

impl ShortNames {
    /// Constructs an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a unique short name for segment `segment` of the variable
    /// named `long` at 0-based dictionary position `column`, and registers
    /// it.
    ///
    /// The name is the uppercased first 5 bytes of `long` plus a base-36
    /// suffix, `0` first.  Suffixes that would not fit in 3 characters fall
    /// back to `@` plus a counter, so a name never exceeds 8 bytes.
    pub fn allocate(&mut self, long: &Identifier, segment: usize, column: usize) -> Identifier {
        let base = long
            .as_str()
            .chars()
            .take(5)
            .collect::<String>()
            .to_ascii_uppercase();
        let mut counter = segment as u32;
        let mut short = format!("{base}0");
        while self.used.contains_key(&short) {
            let suffix = int_to_column_name(counter).to_ascii_uppercase();
            counter += 1;
            if suffix.len() > 3 {
                short = format!("@{}", self.fallback % 10_000_000);
                self.fallback += 1;
            } else {
                short = format!("{base}{suffix}");
            }
        }
        self.used.insert(short.clone(), column);
        Identifier::new(short)
    }

    /// Looks up the dictionary position registered for `short`.
    pub fn get(&self, short: &str) -> Option<usize> {
        self.used.get(short).copied()
    }

    /// Iterates over all registered short names and their positions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.used.iter().map(|(name, column)| (name.as_str(), *column))
    }

    /// The number of registered short names.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether no short names have been registered.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
