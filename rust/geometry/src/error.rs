// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate arc: points ({0:?}), ({1:?}), ({2:?}) do not define a circle")]
    DegenerateArc([f64; 2], [f64; 2], [f64; 2]),

    #[error("Invalid arc sample count {0}: at least 2 samples are required")]
    InvalidSampleCount(usize),

    #[error("Groove growth axis {0:?} is not aligned with X, Y or Z")]
    InvalidGrooveAxis([f64; 3]),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Core error: {0}")]
    CoreError(#[from] cabinet_lite_core::Error),
}

impl Error {
    /// Errors caused by bad input configuration rather than numeric failure.
    /// These abort the enclosing translation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::DegenerateArc(..) | Error::InvalidSampleCount(_) | Error::InvalidGrooveAxis(_)
        )
    }
}
