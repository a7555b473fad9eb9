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

//! Input normalization and line indexing.
//!
//! Clients that cannot send literal control characters submit the
//! two-character sequence `\n` instead of a line break. [`SourceText`]
//! rewrites those into real line feeds and keeps the byte offset at which
//! every line starts, so any offset into the text can be mapped back to a
//! 1-based line and a character column.

use std::iter;

/// The escaped line break accepted in place of a literal `'\n'`.
const ESCAPED_NEWLINE: &str = "\\n";

/// A line/column location inside a [`SourceText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, counted in characters from the start of the line.
    pub column: usize,
}

/// Normalized FXQL text with a line-start index.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    /// Byte offset of the first character of every line. Always starts with `0`.
    line_starts: Vec<usize>,
}

impl SourceText {
    /// Replaces escaped line breaks and indexes the resulting lines.
    pub fn normalize(raw: &str) -> Self {
        let text = raw.replace(ESCAPED_NEWLINE, "\n");
        let line_starts = iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        Self { text, line_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of lines in the normalized text. Empty text has none.
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.line_starts.len()
        }
    }

    /// Maps a byte offset to its line and character column.
    ///
    /// Offsets past the end of the text resolve to the last line.
    pub fn position(&self, offset: usize) -> Position {
        // line_starts[0] == 0, so at least one entry is <= offset.
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self
            .text
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());

        Position { line, column }
    }
}
