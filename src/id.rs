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

//! Entry identifiers.
//!
//! Every record gets a random 128-bit UUID, written as URL-safe base64
//! without padding (22 characters) behind the `FXQL-` prefix:
//!
//! ```
//! use fxql_parser::id::{self, EntryId};
//! use uuid::Uuid;
//!
//! let uuid = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
//! let encoded = id::encode(uuid);
//! assert_eq!(encoded.len(), 22);
//! assert_eq!(id::decode(&encoded).unwrap(), uuid);
//!
//! let entry = EntryId::from(uuid);
//! assert_eq!(entry.to_string(), format!("FXQL-{encoded}"));
//! ```

use crate::error::CodecError;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::{Builder, Uuid};

/// Tag in front of every encoded entry identifier.
pub const ENTRY_ID_PREFIX: &str = "FXQL-";

/// Encodes a UUID into its compact textual form (no prefix).
pub fn encode(id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

/// Reverses [`encode`].
pub fn decode(text: &str) -> Result<Uuid, CodecError> {
    let bytes = URL_SAFE_NO_PAD.decode(text)?;
    let bytes: [u8; 16] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CodecError::InvalidLength(bytes.len()))?;
    Ok(Uuid::from_bytes(bytes))
}

/// Identifier of a [`TransactionRecord`](crate::TransactionRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for EntryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ENTRY_ID_PREFIX}{}", encode(self.0))
    }
}

impl FromStr for EntryId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(ENTRY_ID_PREFIX)
            .ok_or(CodecError::MissingPrefix)?;
        decode(encoded).map(Self)
    }
}

impl Serialize for EntryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Source of fresh 128-bit identifiers.
///
/// Implementations must be safe to call from many threads at once and must
/// produce statistically independent values across callers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Version 4 UUIDs from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Reproducible version 4 UUIDs from a seeded PRNG.
///
/// Meant for tests and benchmarks; two generators with the same seed
/// yield the same sequence.
#[derive(Debug)]
pub struct SeededIdGenerator {
    rng: Mutex<StdRng>,
}

impl SeededIdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdGenerator for SeededIdGenerator {
    fn generate(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.lock().fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn encoded_form_is_url_safe_and_unpadded() {
        let encoded = encode(Uuid::from_u128(u128::MAX));
        assert_eq!(encoded.len(), 22);
        assert!(
            encoded
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        );
    }

    #[test]
    fn decode_inverts_encode_at_the_edges() {
        for value in [0u128, 1, u128::MAX, u128::MAX / 3] {
            let uuid = Uuid::from_u128(value);
            assert_eq!(decode(&encode(uuid)).unwrap(), uuid);
        }
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(decode("AAAA"), Err(CodecError::InvalidLength(3)));
    }

    #[test]
    fn decode_rejects_non_alphabet_text() {
        assert!(matches!(decode("not base64!"), Err(CodecError::Encoding(_))));
    }

    #[test]
    fn entry_id_round_trips_through_text() {
        let entry = EntryId::from(Uuid::from_u128(42));
        let text = entry.to_string();

        assert!(text.starts_with("FXQL-"));
        assert_eq!(text.parse::<EntryId>().unwrap(), entry);
    }

    #[test]
    fn entry_id_requires_prefix() {
        let encoded = encode(Uuid::from_u128(42));
        assert_eq!(encoded.parse::<EntryId>(), Err(CodecError::MissingPrefix));
    }

    #[test]
    fn random_generator_yields_v4_uuids() {
        let uuid = RandomIdGenerator.generate();
        assert_eq!(uuid.get_version_num(), 4);
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let a = SeededIdGenerator::new(7);
        let b = SeededIdGenerator::new(7);
        let first: Vec<_> = (0..5).map(|_| a.generate()).collect();
        let second: Vec<_> = (0..5).map(|_| b.generate()).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|uuid| uuid.get_version_num() == 4));
    }

    #[test]
    fn seeded_generator_does_not_repeat() {
        let generator = SeededIdGenerator::new(1);
        let ids: HashSet<_> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
