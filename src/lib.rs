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

//! # FXQL Parser
//!
//! This library parses FXQL, a small language for publishing currency
//! exchange rates, into validated transaction records.
//!
//! ```text
//! USD-GBP {
//!   BUY 100
//!   SELL 200
//!   CAP 93800
//! }
//! ```
//!
//! A submission is accepted or rejected as a whole. Every invalid field of
//! every statement is reported with its line and character range.
//!
//! ## Core Components
//!
//! - [`parse`] / [`Parser`]: normalize, scan, validate and build records
//! - [`Diagnostics`]: ordered, located messages for invalid fields
//! - [`TransactionRecord`]: an accepted statement with its [`EntryId`]
//! - [`id`]: the `FXQL-` identifier codec and pluggable [`IdGenerator`]s
//! - [`FxqlService`]: parses, persists through a [`RecordStore`] and checks the stored count
//! - [`FxqlResponse`]: the JSON envelopes a transport sends back
//!
//! ## Example
//!
//! ```
//! use fxql_parser::{FxqlResponse, FxqlService};
//!
//! let service = FxqlService::new();
//!
//! let response = FxqlResponse::from(service.process("USD-GBP { BUY 100 SELL 200 CAP 93800 }"));
//! assert!(response.is_success());
//! assert_eq!(service.store().len(), 1);
//!
//! let response = FxqlResponse::from(service.process("usd-gbp { BUY 100 SELL 200 CAP 93800 }"));
//! assert_eq!(response.status(), 400);
//! ```
//!
//! ## Thread Safety
//!
//! Parsing is a pure function of its input. [`Parser`], [`FxqlService`] and
//! [`MemoryStore`] are `Send + Sync` and can be shared across threads.

mod base;
pub mod diagnostic;
pub mod error;
pub mod id;
mod parser;
mod record;
pub mod response;
pub mod scanner;
pub mod source;
mod service;
pub mod store;
pub mod validation;

pub use base::{CurrencyCode, CurrencyPair};
pub use diagnostic::{Diagnostic, Diagnostics, FieldKind};
pub use error::{CodecError, ServiceError, StoreError};
pub use id::{EntryId, IdGenerator, RandomIdGenerator, SeededIdGenerator};
pub use parser::{ParseOutcome, Parser, parse};
pub use record::TransactionRecord;
pub use response::{EntryData, FxqlRequest, FxqlResponse, ResponseCode};
pub use service::FxqlService;
pub use store::{MemoryStore, RecordStore};
