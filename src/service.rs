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

//! Submission processing.
//!
//! The [`FxqlService`] is the caller sitting between a transport and the
//! record store. It parses a submission, hands the records to the store and
//! checks that every one of them was stored.
//!
//! # Outcomes
//!
//! - **Accepted**: all records parsed and the store acknowledged all of them.
//! - **Rejected**: at least one field is invalid; nothing reaches the store.
//! - **Count mismatch**: the store acknowledged a different number of rows.
//! - **Store failure**: the store returned an error.
//!
//! Nothing is retried.
//!
//! # Thread Safety
//!
//! The service only needs `&self`; share it behind an [`Arc`](std::sync::Arc)
//! to process submissions from many threads or tasks at once.

use crate::error::ServiceError;
use crate::id::{IdGenerator, RandomIdGenerator};
use crate::parser::Parser;
use crate::record::TransactionRecord;
use crate::store::{MemoryStore, RecordStore};
use tracing::{error, info};

/// Parses submissions and persists the resulting records.
#[derive(Debug)]
pub struct FxqlService<S = MemoryStore, G = RandomIdGenerator> {
    parser: Parser<G>,
    store: S,
}

impl FxqlService {
    /// Creates a service backed by a fresh [`MemoryStore`].
    pub fn new() -> Self {
        Self::with_parts(Parser::new(), MemoryStore::new())
    }
}

impl Default for FxqlService {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordStore, G: IdGenerator> FxqlService<S, G> {
    pub fn with_parts(parser: Parser<G>, store: S) -> Self {
        Self { parser, store }
    }

    /// Processes one submission.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] - One or more fields are invalid.
    /// - [`ServiceError::CountMismatch`] - The store did not confirm every record.
    /// - [`ServiceError::Store`] - The store failed outright.
    pub fn process(&self, raw: &str) -> Result<Vec<TransactionRecord>, ServiceError> {
        let records = self.parser.parse(raw)?;

        let stored = self.store.insert_many(&records).inspect_err(|e| {
            error!(records = records.len(), "failed to store FXQL records: {e}");
        })?;

        if stored != records.len() {
            error!(
                submitted = records.len(),
                stored, "record store acknowledged an unexpected row count"
            );
            return Err(ServiceError::CountMismatch {
                submitted: records.len(),
                stored,
            });
        }

        info!(records = stored, "FXQL submission accepted");
        Ok(records)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
