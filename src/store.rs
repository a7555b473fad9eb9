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

//! Record persistence.
//!
//! [`RecordStore`] is the seam to whatever durably keeps accepted records.
//! It reports how many rows it stored so the caller can detect silent loss.
//! [`MemoryStore`] is a thread-safe in-process implementation.

use crate::error::StoreError;
use crate::id::EntryId;
use crate::record::TransactionRecord;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use tracing::warn;

/// Destination for accepted records.
pub trait RecordStore: Send + Sync {
    /// Stores a batch and returns the number of rows actually stored.
    fn insert_many(&self, records: &[TransactionRecord]) -> Result<usize, StoreError>;
}

/// An in-memory record store with duplicate detection.
///
/// Combines a [`DashMap`] for O(1) duplicate checks with an insertion log
/// that preserves arrival order. A record whose id is already present is
/// skipped and not counted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Records by entry id.
    records: DashMap<EntryId, TransactionRecord>,

    /// Entry ids in insertion order. Always locked before touching `records`.
    order: Mutex<Vec<EntryId>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<TransactionRecord> {
        self.records.get(id).map(|record| record.value().clone())
    }

    /// All stored records in insertion order.
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        let order = self.order.lock();
        order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| record.value().clone()))
            .collect()
    }
}

impl RecordStore for MemoryStore {
    fn insert_many(&self, records: &[TransactionRecord]) -> Result<usize, StoreError> {
        // Holding the log lock keeps one batch contiguous in `order`.
        let mut order = self.order.lock();
        let mut stored = 0;

        for record in records {
            match self.records.entry(record.id()) {
                Entry::Occupied(_) => {
                    warn!(entry_id = %record.id(), "skipping record with duplicate entry id");
                }
                Entry::Vacant(entry) => {
                    entry.insert(record.clone());
                    order.push(record.id());
                    stored += 1;
                }
            }
        }

        Ok(stored)
    }
}
