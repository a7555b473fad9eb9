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

//! Field validators.
//!
//! - Currency pair: exactly `AAA-BBB`, uppercase ASCII letters only.
//! - BUY / SELL: a plain decimal literal strictly greater than zero.
//! - CAP: as BUY/SELL, with a zero fractional part (`5000` or `5000.0`).

use crate::base::{CurrencyCode, CurrencyPair};
use crate::diagnostic::{Diagnostic, FieldKind};
use crate::scanner::RawStatementMatch;
use crate::source::SourceText;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("'{0}' is not two three-letter uppercase codes joined by '-'")]
    MalformedPair(String),
    #[error("'{0}' is not a decimal number")]
    NotANumber(String),
    #[error("'{0}' is not greater than zero")]
    NotPositive(String),
    #[error("'{0}' has a fractional part")]
    Fractional(String),
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// The typed values of a statement whose four fields all passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidStatement {
    pub pair: CurrencyPair,
    pub buy: Decimal,
    pub sell: Decimal,
    pub cap: u64,
}

pub fn currency_pair(raw: &str) -> Result<CurrencyPair, FieldError> {
    let malformed = || FieldError::MalformedPair(raw.to_string());
    let (source, destination) = raw.split_once('-').ok_or_else(malformed)?;

    Ok(CurrencyPair {
        source: CurrencyCode::from_ascii(source.as_bytes()).ok_or_else(malformed)?,
        destination: CurrencyCode::from_ascii(destination.as_bytes()).ok_or_else(malformed)?,
    })
}

/// Validates a BUY or SELL price.
///
/// The value is held as a [`Decimal`]: fractional digits beyond its 28-digit
/// scale are rounded, and a positive literal that rounds to zero or exceeds
/// [`Decimal::MAX`] is rejected as out of range.
pub fn price(raw: &str) -> Result<Decimal, FieldError> {
    let literal = positive_literal(raw)?;
    let value = Decimal::from_str(literal.unsigned)
        .map_err(|_| FieldError::OutOfRange(raw.to_string()))?;
    if value.is_zero() {
        return Err(FieldError::OutOfRange(raw.to_string()));
    }
    Ok(value)
}

/// Validates a CAP amount.
pub fn cap(raw: &str) -> Result<u64, FieldError> {
    let literal = positive_literal(raw)?;
    if literal.has_fraction() {
        return Err(FieldError::Fractional(raw.to_string()));
    }
    literal
        .whole
        .parse::<u64>()
        .map_err(|_| FieldError::OutOfRange(raw.to_string()))
}

/// A syntactically valid numeric literal, split into its parts.
struct Literal<'a> {
    negative: bool,
    /// The literal without its sign.
    unsigned: &'a str,
    whole: &'a str,
    fraction: &'a str,
}

impl Literal<'_> {
    fn is_zero(&self) -> bool {
        self.unsigned.bytes().all(|b| b == b'0' || b == b'.')
    }

    fn has_fraction(&self) -> bool {
        self.fraction.bytes().any(|b| b != b'0')
    }
}

/// `[+-]?digits(.digits)?`, nothing else.
fn literal(raw: &str) -> Option<Literal<'_>> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) if all_digits(fraction) => (whole, fraction),
        Some(_) => return None,
        None => (unsigned, ""),
    };
    if !all_digits(whole) {
        return None;
    }

    Some(Literal {
        negative,
        unsigned,
        whole,
        fraction,
    })
}

/// Positivity is read off the digits, before any conversion can round.
fn positive_literal(raw: &str) -> Result<Literal<'_>, FieldError> {
    let literal = literal(raw).ok_or_else(|| FieldError::NotANumber(raw.to_string()))?;
    if literal.negative || literal.is_zero() {
        return Err(FieldError::NotPositive(raw.to_string()));
    }
    Ok(literal)
}

/// Runs every field validator on a statement.
///
/// All four fields are checked even after a failure, so the error side
/// holds one diagnostic per invalid field, in statement order.
pub fn validate_statement(
    source: &SourceText,
    statement: &RawStatementMatch<'_>,
) -> Result<ValidStatement, Vec<Diagnostic>> {
    let pair = currency_pair(statement.pair.text);
    let buy = price(statement.buy.text);
    let sell = price(statement.sell.text);
    let cap = cap(statement.cap.text);

    match (pair, buy, sell, cap) {
        (Ok(pair), Ok(buy), Ok(sell), Ok(cap)) => Ok(ValidStatement {
            pair,
            buy,
            sell,
            cap,
        }),
        (pair, buy, sell, cap) => {
            let failures = [
                pair.err(),
                buy.err(),
                sell.err(),
                cap.err(),
            ];
            let diagnostics = FieldKind::ALL
                .into_iter()
                .zip(failures)
                .filter_map(|(kind, failure)| {
                    let error = failure?;
                    let diagnostic = Diagnostic::locate(kind, statement.field(kind), source);
                    debug!(
                        line = diagnostic.line,
                        column = diagnostic.char_start,
                        "rejected {kind} field: {error}"
                    );
                    Some(diagnostic)
                })
                .collect();
            Err(diagnostics)
        }
    }
}
