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

//! Error types for identifier decoding, persistence and submission processing.
//!
//! Field-level failures are not errors of their own here: they are collected
//! into [`Diagnostics`] and surface as [`ServiceError::Validation`].

use crate::diagnostic::Diagnostics;
use thiserror::Error;

/// Failures decoding an entry identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Text does not start with `FXQL-`
    #[error("entry id is missing the FXQL- prefix")]
    MissingPrefix,

    /// Text is not URL-safe base64
    #[error("entry id is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Decoded to something other than 16 bytes
    #[error("entry id decodes to {0} bytes, expected 16")]
    InvalidLength(usize),
}

/// Failures reported by a record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not accept the batch at all
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Failures processing one FXQL submission end to end.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// One or more fields are invalid; nothing was stored
    #[error(transparent)]
    Validation(#[from] Diagnostics),

    /// The store acknowledged fewer (or more) rows than were submitted
    #[error("submitted {submitted} records but {stored} were stored")]
    CountMismatch { submitted: usize, stored: usize },

    /// Any other failure while persisting
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// `true` when the input itself was at fault, as opposed to an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
