// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for module forest operations.

use crate::keys::ModuleKey;

/// Result type alias for forest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a module forest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced module was not found in the arena.
    #[error("module not found: {0:?}")]
    NotFound(ModuleKey),

    /// Attaching would make a module its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: ModuleKey, child: ModuleKey },

    /// The module has no board-family kind.
    #[error("module {0} is not a panel")]
    NotAPanel(String),

    /// A board has no canonical panel child to place features in.
    #[error("board {0} has no canonical panel")]
    MissingCanonicalPanel(String),

    /// A geometric computation failed.
    #[error("geometry error: {0}")]
    Geometry(#[from] cabinet_lite_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Configuration errors abort the whole translation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Geometry(e) if e.is_configuration())
    }
}
