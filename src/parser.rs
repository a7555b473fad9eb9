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

//! The parse pipeline.
//!
//! ```text
//! raw text ─► SourceText ─► scan ─► validate_statement (every statement)
//!                                        │
//!                     any diagnostics? ──┼── yes ─► Err(Diagnostics)
//!                                        └── no ──► Ok(Vec<TransactionRecord>)
//! ```
//!
//! A submission is accepted or rejected as a whole: when any field of any
//! statement is invalid, statements that did validate are discarded too.
//!
//! # Example
//!
//! ```
//! use fxql_parser::parse;
//! use rust_decimal_macros::dec;
//!
//! let records = parse("USD-GBP { BUY 100 SELL 200 CAP 93800 }").unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].source_currency(), "USD");
//! assert_eq!(records[0].buy_price(), dec!(100));
//!
//! let diagnostics = parse("usd-eur { BUY 100 SELL 90 CAP 5000 }").unwrap_err();
//! assert!(diagnostics.messages()[0].contains("Currency Pair"));
//! ```

use crate::diagnostic::Diagnostics;
use crate::id::{IdGenerator, RandomIdGenerator};
use crate::record::TransactionRecord;
use crate::scanner::{self, RawStatementMatch};
use crate::source::SourceText;
use crate::validation::{ValidStatement, validate_statement};
use tracing::{debug, warn};

/// Records on success, every located field error otherwise. Never both.
pub type ParseOutcome = Result<Vec<TransactionRecord>, Diagnostics>;

/// Parses FXQL submissions, drawing record identifiers from `G`.
///
/// A parser holds no per-call state and can be shared across threads.
#[derive(Debug, Default)]
pub struct Parser<G = RandomIdGenerator> {
    ids: G,
}

impl Parser {
    /// A parser using random v4 UUIDs for identifiers.
    pub fn new() -> Self {
        Self::with_generator(RandomIdGenerator)
    }
}

impl<G: IdGenerator> Parser<G> {
    pub fn with_generator(ids: G) -> Self {
        Self { ids }
    }

    /// Parses and validates a whole submission.
    pub fn parse(&self, raw: &str) -> ParseOutcome {
        let source = SourceText::normalize(raw);
        let statements: Vec<RawStatementMatch<'_>> = scanner::scan(source.as_str()).collect();
        report_skipped_text(&source, &statements);

        let mut diagnostics = Diagnostics::new();
        let mut valid: Vec<ValidStatement> = Vec::with_capacity(statements.len());
        for statement in &statements {
            match validate_statement(&source, statement) {
                Ok(statement) => valid.push(statement),
                Err(errors) => diagnostics.extend(errors),
            }
        }

        if !diagnostics.is_empty() {
            debug!(
                statements = statements.len(),
                diagnostics = diagnostics.len(),
                "rejecting FXQL submission"
            );
            return Err(diagnostics);
        }

        Ok(valid
            .into_iter()
            .map(|statement| TransactionRecord::build(statement, self.ids.generate()))
            .collect())
    }
}

/// Parses with a default [`Parser`].
pub fn parse(raw: &str) -> ParseOutcome {
    Parser::new().parse(raw)
}

/// Logs non-blank text that no statement block covers.
fn report_skipped_text(source: &SourceText, statements: &[RawStatementMatch<'_>]) {
    let text = source.as_str();
    let block_starts = statements.iter().map(|s| s.span.start).chain([text.len()]);
    let gap_starts = [0].into_iter().chain(statements.iter().map(|s| s.span.end));

    for (gap_start, gap_end) in gap_starts.zip(block_starts) {
        let gap = &text[gap_start..gap_end];
        if let Some(skip) = gap.find(|c: char| !c.is_whitespace()) {
            let position = source.position(gap_start + skip);
            warn!(
                line = position.line,
                column = position.column,
                "ignoring text that is not an FXQL statement"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::FieldKind;
    use crate::id::SeededIdGenerator;
    use rust_decimal_macros::dec;

    #[test]
    fn valid_statement_becomes_record() {
        let records = parse("USD-GBP { BUY 100 SELL 200 CAP 93800 }").unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.source_currency(), "USD");
        assert_eq!(record.destination_currency(), "GBP");
        assert_eq!(record.buy_price(), dec!(100));
        assert_eq!(record.sell_price(), dec!(200));
        assert_eq!(record.cap_amount(), 93_800);
        assert!(record.id().to_string().starts_with("FXQL-"));
    }

    #[test]
    fn lowercase_pair_is_rejected_with_location() {
        let diagnostics = parse("usd-eur { BUY 100 SELL 90 CAP 5000 }").unwrap_err();

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, FieldKind::CurrencyPair);
        assert_eq!(diagnostic.line, 1);
        assert!(diagnostic.message.contains("Currency Pair"));
        assert!(diagnostic.message.contains("Line 1"));
    }

    #[test]
    fn one_bad_statement_rejects_the_whole_submission() {
        let input = "USD-GBP { BUY 100 SELL 200 CAP 93800 }\nEUR-USD { BUY 1 SELL 2 CAP -5 }";
        let diagnostics = parse(input).unwrap_err();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.iter().next().unwrap().kind, FieldKind::Cap);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert_eq!(parse(""), Ok(vec![]));
        assert_eq!(parse("  \n\t "), Ok(vec![]));
    }

    #[test]
    fn prose_only_yields_no_records() {
        assert_eq!(parse("nothing to see here"), Ok(vec![]));
    }

    #[test]
    fn seeded_generator_makes_ids_reproducible() {
        let input = "USD-GBP { BUY 1 SELL 2 CAP 3 }\nEUR-USD { BUY 4 SELL 5 CAP 6 }";
        let first = Parser::with_generator(SeededIdGenerator::new(99)).parse(input).unwrap();
        let second = Parser::with_generator(SeededIdGenerator::new(99)).parse(input).unwrap();

        assert_eq!(first, second);
        assert_ne!(first[0].id(), first[1].id());
    }

    #[test]
    fn ids_are_not_drawn_for_rejected_submissions() {
        let generator = SeededIdGenerator::new(5);
        let parser = Parser::with_generator(generator);
        assert!(parser.parse("USD-GBP { BUY x SELL 2 CAP 3 }").is_err());

        // The first accepted record gets the first id in the seeded sequence.
        let record = &parser.parse("USD-GBP { BUY 1 SELL 2 CAP 3 }").unwrap()[0];
        assert_eq!(*record.id().as_uuid(), SeededIdGenerator::new(5).generate());
    }

    #[test]
    fn skipped_text_does_not_affect_outcome() {
        let input = "header\nUSD-GBP { BUY 1 SELL 2 CAP 3 }\ntrailing";
        assert_eq!(parse(input).unwrap().len(), 1);
    }
}
