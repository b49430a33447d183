// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation configuration loaded from environment variables or JSON.

use cabinet_lite_core::ROOT_SENTINEL;
use cabinet_lite_geometry::{DEFAULT_ARC_SAMPLES, DEFAULT_HOLE_TOLERANCE};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Translation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Points sampled per outline arc (at least 2).
    pub arc_samples: usize,
    /// Decimals kept when rounding direction vectors.
    pub direction_decimals: u32,
    /// Slack around a panel box when testing holes.
    pub hole_tolerance: f64,
    /// Parent id marking a top-level record.
    pub root_sentinel: String,
    /// Board catalog endpoint; no catalog when unset.
    pub catalog_url: Option<String>,
    /// Catalog request timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            arc_samples: DEFAULT_ARC_SAMPLES,
            direction_decimals: 0,
            hole_tolerance: DEFAULT_HOLE_TOLERANCE,
            root_sentinel: ROOT_SENTINEL.to_owned(),
            catalog_url: None,
            http_timeout_secs: 30,
        }
    }
}

impl TranslateConfig {
    /// Load configuration from `CABINET_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; missing or unparsable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            arc_samples: lookup("CABINET_ARC_SAMPLES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.arc_samples),
            direction_decimals: lookup("CABINET_DIRECTION_DECIMALS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.direction_decimals),
            hole_tolerance: lookup("CABINET_HOLE_TOLERANCE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.hole_tolerance),
            root_sentinel: lookup("CABINET_ROOT_SENTINEL").unwrap_or(defaults.root_sentinel),
            catalog_url: lookup("CABINET_CATALOG_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            http_timeout_secs: lookup("CABINET_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
        }
    }

    /// Parse configuration from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.arc_samples < 2 {
            return Err(Error::Config(format!(
                "arc_samples must be at least 2, got {}",
                self.arc_samples
            )));
        }
        if self.hole_tolerance.is_nan() || self.hole_tolerance < 0.0 {
            return Err(Error::Config(format!(
                "hole_tolerance must be non-negative, got {}",
                self.hole_tolerance
            )));
        }
        Ok(())
    }
}
