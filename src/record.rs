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

//! Transaction records.
//!
//! A [`TransactionRecord`] only exists for a statement whose four fields all
//! validated, and it cannot be changed afterwards.

use crate::base::CurrencyCode;
use crate::id::EntryId;
use crate::validation::ValidStatement;
use rust_decimal::Decimal;
use uuid::Uuid;

/// One validated exchange-rate entry.
///
/// # Invariants
///
/// - Both currency codes are three uppercase ASCII letters.
/// - `buy_price > 0`, `sell_price > 0`, `cap_amount > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    id: EntryId,
    source_currency: CurrencyCode,
    destination_currency: CurrencyCode,
    buy_price: Decimal,
    sell_price: Decimal,
    cap_amount: u64,
}

impl TransactionRecord {
    /// Assembles a record from a validated statement and a fresh identifier.
    pub(crate) fn build(statement: ValidStatement, id: Uuid) -> Self {
        Self {
            id: EntryId::from(id),
            source_currency: statement.pair.source,
            destination_currency: statement.pair.destination,
            buy_price: statement.buy,
            sell_price: statement.sell,
            cap_amount: statement.cap,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn source_currency(&self) -> CurrencyCode {
        self.source_currency
    }

    pub fn destination_currency(&self) -> CurrencyCode {
        self.destination_currency
    }

    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    pub fn sell_price(&self) -> Decimal {
        self.sell_price
    }

    pub fn cap_amount(&self) -> u64 {
        self.cap_amount
    }
}
