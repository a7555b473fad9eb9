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

//! JSON request and response envelopes.
//!
//! ```json
//! {"FXQL": "USD-GBP { BUY 100 SELL 200 CAP 93800 }"}
//! ```
//!
//! answers with one of
//!
//! ```json
//! {"message": "FXQL Statement Parsed Successfully.", "code": "FXQL-200", "data": [...]}
//! {"message": ["Currency Pair -usd-gbp is not Valid at ..."], "code": "FXQL-400"}
//! {"message": "Edge case error: ...", "code": "FXQL-418"}
//! {"message": "Unexpected error: ...", "code": "FXQL-500"}
//! ```

use crate::base::CurrencyCode;
use crate::error::ServiceError;
use crate::id::EntryId;
use crate::record::TransactionRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const PARSED_MESSAGE: &str = "FXQL Statement Parsed Successfully.";

/// Request body carrying FXQL source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxqlRequest {
    #[serde(rename = "FXQL")]
    pub fxql: String,
}

/// Outcome codes carried in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Parsed,
    Rejected,
    EdgeCase,
    Unexpected,
}

impl ResponseCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Parsed => "FXQL-200",
            Self::Rejected => "FXQL-400",
            Self::EdgeCase => "FXQL-418",
            Self::Unexpected => "FXQL-500",
        }
    }

    /// HTTP status a transport should answer with.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Parsed => 200,
            Self::Rejected => 400,
            Self::EdgeCase => 418,
            Self::Unexpected => 500,
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One accepted record on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntryData {
    pub entry_id: EntryId,
    pub source_currency: CurrencyCode,
    pub destination_currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_price: Decimal,
    pub cap_amount: u64,
}

impl From<&TransactionRecord> for EntryData {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            entry_id: record.id(),
            source_currency: record.source_currency(),
            destination_currency: record.destination_currency(),
            sell_price: record.sell_price(),
            buy_price: record.buy_price(),
            cap_amount: record.cap_amount(),
        }
    }
}

/// Response body for any submission outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FxqlResponse {
    Parsed {
        message: &'static str,
        code: ResponseCode,
        data: Vec<EntryData>,
    },
    Rejected {
        message: Vec<String>,
        code: ResponseCode,
    },
    Failed {
        message: String,
        code: ResponseCode,
    },
}

impl FxqlResponse {
    pub fn parsed(records: &[TransactionRecord]) -> Self {
        Self::Parsed {
            message: PARSED_MESSAGE,
            code: ResponseCode::Parsed,
            data: records.iter().map(EntryData::from).collect(),
        }
    }

    pub fn code(&self) -> ResponseCode {
        match self {
            Self::Parsed { code, .. } | Self::Rejected { code, .. } | Self::Failed { code, .. } => {
                *code
            }
        }
    }

    pub fn status(&self) -> u16 {
        self.code().http_status()
    }

    pub fn is_success(&self) -> bool {
        self.code() == ResponseCode::Parsed
    }
}

impl From<ServiceError> for FxqlResponse {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(diagnostics) => Self::Rejected {
                message: diagnostics.messages(),
                code: ResponseCode::Rejected,
            },
            ServiceError::CountMismatch { .. } => Self::Failed {
                message: format!("Edge case error: {error}"),
                code: ResponseCode::EdgeCase,
            },
            ServiceError::Store(_) => Self::Failed {
                message: format!("Unexpected error: {error}"),
                code: ResponseCode::Unexpected,
            },
        }
    }
}

impl From<Result<Vec<TransactionRecord>, ServiceError>> for FxqlResponse {
    fn from(result: Result<Vec<TransactionRecord>, ServiceError>) -> Self {
        match result {
            Ok(records) => Self::parsed(&records),
            Err(error) => error.into(),
        }
    }
}
