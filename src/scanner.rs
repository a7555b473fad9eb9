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

//! Statement scanning.
//!
//! Finds every block shaped like
//!
//! ```text
//! <pair> { BUY <value> SELL <value> CAP <value> }
//! ```
//!
//! in normalized text. Whitespace between tokens is free-form (line breaks
//! included) and the keywords are case-insensitive. The pair is matched
//! leniently (alphanumerics, a dash, alphanumerics) so that malformed pairs
//! still reach validation and get a located diagnostic. Values are any run
//! of non-whitespace. Text that does not fit the block shape is skipped.
//!
//! The compiled pattern is immutable and shared; every call to [`scan`]
//! gets its own iterator, so no cursor is shared between calls or threads.

use crate::diagnostic::FieldKind;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

const STATEMENT_PATTERN: &str = r"([A-Za-z0-9]*-[A-Za-z0-9]*)\s*\{\s*(?i:BUY)\s+(\S+)\s*(?i:SELL)\s+(\S+)\s*(?i:CAP)\s+(\S+)\s*\}";

static STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STATEMENT_PATTERN).expect("statement pattern compiles"));

/// A raw field value and its byte offset in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// One structurally matched statement block, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatementMatch<'a> {
    /// Byte range of the whole block, `[start, end)`.
    pub span: Range<usize>,
    pub pair: Field<'a>,
    pub buy: Field<'a>,
    pub sell: Field<'a>,
    pub cap: Field<'a>,
}

impl<'a> RawStatementMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let field = |group| {
            caps.get(group).map(|m| Field {
                text: m.as_str(),
                offset: m.start(),
            })
        };
        let whole = caps.get(0)?;

        Some(Self {
            span: whole.range(),
            pair: field(1)?,
            buy: field(2)?,
            sell: field(3)?,
            cap: field(4)?,
        })
    }

    pub fn field(&self, kind: FieldKind) -> Field<'a> {
        match kind {
            FieldKind::CurrencyPair => self.pair,
            FieldKind::Buy => self.buy,
            FieldKind::Sell => self.sell,
            FieldKind::Cap => self.cap,
        }
    }
}

/// Lazily yields every statement block in `text`, in order.
///
/// Matches never overlap; each search resumes at the end of the previous
/// match.
pub fn scan(text: &str) -> impl Iterator<Item = RawStatementMatch<'_>> {
    STATEMENT
        .captures_iter(text)
        .filter_map(|caps| RawStatementMatch::from_captures(&caps))
}
