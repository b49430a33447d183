// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the translation pipeline.

use thiserror::Error;

/// Result type alias for translation.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Record error: {0}")]
    Core(#[from] cabinet_lite_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] cabinet_lite_geometry::Error),

    #[error("Tree error: {0}")]
    Tree(#[from] cabinet_lite_tree::Error),

    /// The board catalog could not be fetched or decoded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error stems from invalid input configuration (bad toward
    /// label, bad groove axis, degenerate arc, bad sample count).
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::Core(cabinet_lite_core::Error::InvalidTowardType(_)) => true,
            Error::Geometry(e) => e.is_configuration(),
            Error::Tree(e) => e.is_configuration(),
            Error::Config(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Catalog(err.to_string())
    }
}
