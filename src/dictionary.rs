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

//! The variable dictionary and its layout bookkeeping.

use std::collections::HashMap;

use indexmap::IndexMap;
use smallvec::SmallVec;
use thiserror::Error as ThisError;
use unicase::UniCase;

use crate::{
    identifier::{clean_var_name, Identifier, ShortNames},
    message::Warning,
    variable::{self, VarSpec, Variable},
};

/// Failure to add a variable.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    /// A variable with the same cleaned long name already exists.
    #[error("Duplicate variable named {0}.")]
    DuplicateVariable(Identifier),

    /// The definition itself is invalid.
    #[error(transparent)]
    Variable(#[from] variable::Error),
}

/// An ordered collection of [Variable]s.
///
/// Insertion order is significant: it dictates on-disk order and index
/// assignment.  Variables are looked up by cleaned long name,
/// case-insensitively, or by short name once those are assigned.
pub struct Dictionary {
    variables: IndexMap<UniCase<String>, Variable>,
    short_names: ShortNames,
    next_index: u32,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Constructs an empty dictionary.
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
            short_names: ShortNames::new(),
            next_index: 1,
        }
    }

    /// Plans and appends the variable described by `spec`.
    ///
    /// The name is cleaned (reported through `warn` when that changes it),
    /// the variable's segment count is derived from its width, and it is
    /// assigned the next free element index and column index.
    pub fn add(&mut self, spec: VarSpec, warn: &mut dyn FnMut(Warning)) -> Result<(), Error> {
        let name = clean_var_name(&spec.name);
        if name.as_str() != spec.name {
            warn(Warning::RenamedVariable {
                from: spec.name.clone(),
                to: name.as_str().into(),
            });
        }
        if self.variables.contains_key(&name.0) {
            return Err(Error::DuplicateVariable(name));
        }

        let mut variable = Variable::from_spec(spec, name)?;
        variable.index = self.next_index;
        self.next_index += variable.width.case_elements() as u32;
        variable.column_index = self.variables.len() as u32 + 1;
        self.variables
            .insert(variable.name.0.clone(), variable);
        Ok(())
    }

    /// Looks up a variable's 0-based position by cleaned long name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variables.get_index_of(&UniCase::new(String::from(name)))
    }

    /// Looks up a variable by cleaned long name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(&UniCase::new(String::from(name)))
    }

    /// Iterates over the variables in insertion order.
    pub fn variables(&self) -> impl ExactSizeIterator<Item = &Variable> {
        self.variables.values()
    }

    /// The number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the dictionary has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Total number of 8-byte elements one case occupies, across all
    /// variables and segments.
    pub fn case_elements(&self) -> usize {
        self.variables
            .values()
            .map(|variable| variable.width.case_elements())
            .sum()
    }

    /// Allocates the per-segment short names for every variable, in
    /// dictionary order.
    pub fn assign_short_names(&mut self) {
        for (column, variable) in self.variables.values_mut().enumerate() {
            let mut names = SmallVec::new();
            for segment in 0..variable.width.segments().len() {
                names.push(self.short_names.allocate(&variable.name, segment, column));
            }
            variable.short_names = names;
        }
    }

    /// The short-name lookup, populated by
    /// [assign_short_names](Self::assign_short_names).
    pub fn short_names(&self) -> &ShortNames {
        &self.short_names
    }
}

/// Records the longest raw value seen for each variable name across
/// `cases`.
///
/// This is the two-pass mode for sizing string variables: run it over the
/// case collection first, then use the returned lengths as the widths in
/// the corresponding [VarSpec]s.
pub fn find_lengths<'a, C, V>(cases: C) -> HashMap<String, usize>
where
    C: IntoIterator<Item = V>,
    V: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut lengths = HashMap::new();
    for case in cases {
        for (name, value) in case {
            let length = lengths.entry(String::from(name)).or_insert(0);
            *length = (*length).max(value.len());
        }
    }
    lengths
}
