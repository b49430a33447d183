// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module kind vocabulary.

use serde::{Deserialize, Serialize};

/// What a record or module represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModuleKind {
    /// A panel whose reference code is in the board catalog.
    Board,
    /// Normalized panel synthesized under each board.
    CanonicalBoard,
    Hole,
    Groove,
    DoorBoard,
    #[default]
    Unknown,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Board => "Board",
            ModuleKind::CanonicalBoard => "CanonicalBoard",
            ModuleKind::Hole => "Hole",
            ModuleKind::Groove => "Groove",
            ModuleKind::DoorBoard => "DoorBoard",
            ModuleKind::Unknown => "Unknown",
        }
    }

    /// Lenient label decoding. `JCBoard` is the exporter's name for a
    /// canonical board; anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Board" => ModuleKind::Board,
            "CanonicalBoard" | "JCBoard" => ModuleKind::CanonicalBoard,
            "Hole" => ModuleKind::Hole,
            "Groove" => ModuleKind::Groove,
            "DoorBoard" => ModuleKind::DoorBoard,
            _ => ModuleKind::Unknown,
        }
    }

    /// Board or canonical board.
    pub fn is_board_family(&self) -> bool {
        matches!(self, ModuleKind::Board | ModuleKind::CanonicalBoard)
    }

    /// Hole or groove: features placed into panels by containment.
    pub fn is_feature(&self) -> bool {
        matches!(self, ModuleKind::Hole | ModuleKind::Groove)
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ModuleKind {
    fn from(label: String) -> Self {
        ModuleKind::from_label(&label)
    }
}

impl From<ModuleKind> for String {
    fn from(kind: ModuleKind) -> Self {
        kind.as_str().to_owned()
    }
}
