// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Position-annotated diagnostics for invalid statement fields.
//!
//! A [`Diagnostic`] is produced for every field that fails validation, and
//! only for those. [`Diagnostics`] gathers them across a whole submission,
//! keeping first-occurrence order and dropping repeats of the same message.

use crate::scanner::Field;
use crate::source::SourceText;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// The four fields of an FXQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    CurrencyPair,
    Buy,
    Sell,
    Cap,
}

impl FieldKind {
    /// All kinds in statement order.
    pub const ALL: [FieldKind; 4] = [Self::CurrencyPair, Self::Buy, Self::Sell, Self::Cap];

    /// The FXQL keyword introducing the field's value.
    ///
    /// The currency pair opens a statement and has no keyword.
    pub const fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::CurrencyPair => None,
            Self::Buy => Some("BUY"),
            Self::Sell => Some("SELL"),
            Self::Cap => Some("CAP"),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("Currency Pair"))
    }
}

/// One invalid field, located in the normalized source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: FieldKind,
    pub raw_value: String,
    /// 1-based line holding the field.
    pub line: usize,
    /// 0-based character column where the field starts.
    pub char_start: usize,
    /// Column one past the field's last character.
    pub char_end: usize,
    pub message: String,
}

impl Diagnostic {
    /// Builds the diagnostic for a field that failed validation.
    pub fn locate(kind: FieldKind, field: Field<'_>, source: &SourceText) -> Self {
        let position = source.position(field.offset);
        let char_start = position.column;
        let char_end = char_start + field.text.chars().count();
        let message = render(kind, field.text, position.line, char_start, char_end);

        Self {
            kind,
            raw_value: field.text.to_string(),
            line: position.line,
            char_start,
            char_end,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn render(kind: FieldKind, raw: &str, line: usize, start: usize, end: usize) -> String {
    match kind {
        FieldKind::CurrencyPair => format!(
            "Currency Pair -{raw} is not Valid at Line {line} Character Position - {start}-{end}"
        ),
        FieldKind::Buy | FieldKind::Sell | FieldKind::Cap => format!(
            "{kind} Value- {raw} is not valid at Line: {line} Character Position - {start}-{end}"
        ),
    }
}

/// Ordered, message-deduplicated diagnostics for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("FXQL submission rejected with {} invalid field(s)", .entries.len())]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    seen: HashSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic unless one with the same message is already held.
    ///
    /// Returns `true` if it was added.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if !self.seen.insert(diagnostic.message.clone()) {
            return false;
        }
        self.entries.push(diagnostic);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// The wire form: one message string per diagnostic, in order.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.message.clone()).collect()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
