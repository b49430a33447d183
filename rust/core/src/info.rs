// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-form record attributes with case-insensitive field access.
//!
//! Exports from the CAD side are inconsistent about the casing of attribute
//! names (`kdSceneId`, `KdSceneId`, `KDSCENEID` all occur). Every read and
//! write goes through [`InfoBlock::resolve_key`], which prefers an exact match
//! and falls back to a case-insensitive one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known attribute names.
pub mod keys {
    pub const KU_NAME: &str = "KuName";
    pub const SCENE_ID: &str = "kdSceneId";
    pub const PARENT_SCENE_ID: &str = "kdParentSceneId";
    pub const BRAND_GOOD_CODE: &str = "modelBrandGoodCode";
    pub const IMPORT_MODEL_TYPE: &str = "BDImportModelType";
    pub const SUPPLEMENT_TYPE: &str = "BDType2";

    // Hole attributes
    pub const HOLE_DIAMETER: &str = "ZJ";
    pub const HOLE_DEPTH: &str = "GD";
    pub const HOLE_DIRECTION: &str = "YSFX";

    // Groove attributes
    pub const GROOVE_DEPTH: &str = "Depth";
    pub const GROOVE_LENGTH: &str = "Size_x";
    pub const GROOVE_WIDTH: &str = "Size_y";
    pub const GROOVE_LENGTH_AXIS: &str = "LengthAxis";
}

/// Attribute bag attached to every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoBlock {
    fields: Map<String, Value>,
}

impl InfoBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored spelling of `key`: the exact key when present,
    /// otherwise the first key that matches ignoring case.
    pub fn resolve_key(&self, key: &str) -> Option<&str> {
        if let Some((stored, _)) = self.fields.get_key_value(key) {
            return Some(stored.as_str());
        }
        let wanted = key.to_lowercase();
        self.fields
            .keys()
            .find(|stored| stored.to_lowercase() == wanted)
            .map(String::as_str)
    }

    /// Case-insensitive lookup. A missing field is `None`, never an error.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let stored = self.resolve_key(key)?;
        self.fields.get(stored)
    }

    /// String value of a field. Numbers are not coerced.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Textual form of a string or numeric field; empty strings count as absent.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric value of a field, accepting numbers and numeric prefixes of
    /// strings (`"5.5mm"` reads as `5.5`).
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_leading_f64(s),
            _ => None,
        }
    }

    /// Case-insensitive write: updates the existing field under its stored
    /// spelling, or inserts `key` as given.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let stored = self
            .resolve_key(key)
            .map(str::to_owned)
            .unwrap_or_else(|| key.to_owned());
        self.fields.insert(stored, value.into());
    }

    /// Case-insensitive removal.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let stored = self.resolve_key(key)?.to_owned();
        self.fields.remove(&stored)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.resolve_key(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl From<Map<String, Value>> for InfoBlock {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Parses the longest numeric prefix of `text` after leading whitespace.
pub fn parse_leading_f64(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    match fast_float::parse_partial::<f64, _>(trimmed) {
        Ok((value, consumed)) if consumed > 0 => Some(value),
        _ => None,
    }
}
