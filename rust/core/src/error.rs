// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for record parsing and attribute vocabularies.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading records or decoding their attributes.
#[derive(Error, Debug)]
pub enum Error {
    /// A toward-type label did not name one of the six panel orientations.
    #[error("invalid toward type label: {0:?}")]
    InvalidTowardType(String),

    /// A point tag outside the Normal/Arc vocabulary.
    #[error("invalid outline point tag: {0}")]
    InvalidPointTag(u8),

    /// The record payload could not be decoded.
    #[error("record decode error: {0}")]
    Json(#[from] serde_json::Error),
}
