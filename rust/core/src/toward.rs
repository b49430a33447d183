// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel orientation ("toward type") vocabulary.
//!
//! A toward type combines how a panel lies (which of its three dimensions is
//! the thickness) with the direction of its wood grain. Exporters write the
//! label in Chinese (`横板竖纹`); the English form
//! (`front-lying+grain-vertical`) is accepted as well.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance used when matching the thickness against a dimension.
pub const THICKNESS_TOLERANCE: f64 = 1e-2;

/// Reference codes whose texture marker is stored inverted.
pub const REVERSED_TEXTURE_CODES: [&str; 5] = ["KuWLBBT", "KuHBT", "KuSBT", "Ku18BBT", "KuCTSB"];

/// Which dimension carries the thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lying {
    /// Thickness along height.
    Front,
    /// Thickness along width.
    Side,
    /// Thickness along depth.
    Back,
}

impl Lying {
    fn label(&self) -> &'static str {
        match self {
            Lying::Front => "横板",
            Lying::Side => "竖板",
            Lying::Back => "背板",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Lying::Front => "front-lying",
            Lying::Side => "side-lying",
            Lying::Back => "back-lying",
        }
    }
}

/// Grain direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grain {
    Vertical,
    Horizontal,
}

impl Grain {
    /// Exporter label, also used alone as the toward label of canonical boards.
    pub fn label(&self) -> &'static str {
        match self {
            Grain::Vertical => "竖纹",
            Grain::Horizontal => "横纹",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Grain::Vertical => "grain-vertical",
            Grain::Horizontal => "grain-horizontal",
        }
    }

    /// Grain named anywhere inside a label.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.contains(Grain::Vertical.label()) || label.contains(Grain::Vertical.english()) {
            Some(Grain::Vertical)
        } else if label.contains(Grain::Horizontal.label())
            || label.contains(Grain::Horizontal.english())
        {
            Some(Grain::Horizontal)
        } else {
            None
        }
    }
}

/// One of the six panel orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowardType {
    pub lying: Lying,
    pub grain: Grain,
}

impl TowardType {
    pub const fn new(lying: Lying, grain: Grain) -> Self {
        Self { lying, grain }
    }

    /// All six orientations.
    pub const ALL: [TowardType; 6] = [
        TowardType::new(Lying::Front, Grain::Horizontal),
        TowardType::new(Lying::Front, Grain::Vertical),
        TowardType::new(Lying::Side, Grain::Vertical),
        TowardType::new(Lying::Side, Grain::Horizontal),
        TowardType::new(Lying::Back, Grain::Vertical),
        TowardType::new(Lying::Back, Grain::Horizontal),
    ];

    /// Exporter label, e.g. `横板竖纹`.
    pub fn label(&self) -> String {
        format!("{}{}", self.lying.label(), self.grain.label())
    }

    /// English label, e.g. `front-lying+grain-vertical`.
    pub fn english_label(&self) -> String {
        format!("{}+{}", self.lying.english(), self.grain.english())
    }

    /// Derives the orientation of a board from its dimensions and texture
    /// marker. The thickness is matched against height, then width, then
    /// depth; the marker (`R` or `N`) picks the grain.
    pub fn derive(
        width: f64,
        depth: f64,
        height: f64,
        thickness: f64,
        texture_code: &str,
    ) -> Option<Self> {
        let has_r = texture_code.contains('R');
        let has_n = texture_code.contains('N');
        let close = |a: f64| (a - thickness).abs() < THICKNESS_TOLERANCE;

        let (lying, grain) = if close(height) {
            if has_r {
                (Lying::Front, Grain::Vertical)
            } else if has_n {
                (Lying::Front, Grain::Horizontal)
            } else {
                return None;
            }
        } else if close(width) {
            if has_n {
                (Lying::Side, Grain::Vertical)
            } else if has_r {
                (Lying::Side, Grain::Horizontal)
            } else {
                return None;
            }
        } else if close(depth) {
            if has_r {
                (Lying::Back, Grain::Vertical)
            } else if has_n {
                (Lying::Back, Grain::Horizontal)
            } else {
                return None;
            }
        } else {
            return None;
        };
        Some(TowardType::new(lying, grain))
    }
}

impl std::fmt::Display for TowardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.english_label())
    }
}

impl FromStr for TowardType {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self> {
        let label = label.trim();
        TowardType::ALL
            .into_iter()
            .find(|t| t.label() == label || t.english_label() == label)
            .ok_or_else(|| Error::InvalidTowardType(label.to_owned()))
    }
}

/// Swaps the first `R` for `N` (or, failing that, the first `N` for `R`).
pub fn swap_texture_marker(code: &str) -> String {
    if code.contains('R') {
        code.replacen('R', "N", 1)
    } else if code.contains('N') {
        code.replacen('N', "R", 1)
    } else {
        code.to_owned()
    }
}

/// Whether boards with this reference code store their marker inverted.
pub fn has_reversed_texture(ref_code: &str) -> bool {
    REVERSED_TEXTURE_CODES.contains(&ref_code)
}
