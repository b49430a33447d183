// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat input records as written by the CAD exporter.
//!
//! Field names follow the export format (`ObjID`, `ObjPosOX`, `Info.Info`, ...).
//! Exports are loose about types: ids may be numbers or strings, numeric
//! fields are sometimes quoted, and any field may be `null`. Deserialization
//! absorbs all of that so the passes downstream see one shape.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

use crate::error::{Error, Result};
use crate::info::{keys, parse_leading_f64, InfoBlock};
use crate::kind::ModuleKind;

/// Record identifier, numeric or textual in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(Number),
}

impl RecordId {
    /// Canonical string form: integers without a fractional part, text as-is.
    pub fn canonical(&self) -> String {
        match self {
            RecordId::Text(text) => text.clone(),
            RecordId::Number(n) => canonical_number(n),
        }
    }

    /// Rewrites a numeric id into its canonical text form.
    pub fn normalize(&mut self) {
        if let RecordId::Number(n) = self {
            *self = RecordId::Text(canonical_number(n));
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordId::Text(text) => Some(text),
            RecordId::Number(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RecordId::Text(text) if text.is_empty())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

impl From<&str> for RecordId {
    fn from(text: &str) -> Self {
        RecordId::Text(text.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(text: String) -> Self {
        RecordId::Text(text)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Outline point tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PointTag {
    #[default]
    Normal,
    Arc,
}

impl TryFrom<u8> for PointTag {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PointTag::Normal),
            1 => Ok(PointTag::Arc),
            other => Err(Error::InvalidPointTag(other)),
        }
    }
}

impl From<PointTag> for u8 {
    fn from(tag: PointTag) -> Self {
        match tag {
            PointTag::Normal => 0,
            PointTag::Arc => 1,
        }
    }
}

/// Outline point as exported.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlinePointRecord {
    #[serde(rename = "X", default, deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(rename = "Y", default, deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(rename = "Z", default, deserialize_with = "lenient_f64")]
    pub z: f64,
    #[serde(rename = "Type", default)]
    pub tag: PointTag,
}

/// One flat record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ObjID", default, deserialize_with = "nullable")]
    pub id: RecordId,
    #[serde(rename = "ParentId", default, deserialize_with = "nullable")]
    pub parent_id: RecordId,
    #[serde(rename = "ObjName", default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(rename = "ObjWidth", default, deserialize_with = "lenient_f64")]
    pub width: f64,
    #[serde(rename = "ObjDepth", default, deserialize_with = "lenient_f64")]
    pub depth: f64,
    #[serde(rename = "ObjHeight", default, deserialize_with = "lenient_f64")]
    pub height: f64,

    #[serde(rename = "ObjPosX", default, deserialize_with = "lenient_f64")]
    pub pos_x: f64,
    #[serde(rename = "ObjPosY", default, deserialize_with = "lenient_f64")]
    pub pos_y: f64,
    #[serde(rename = "ObjPosZ", default, deserialize_with = "lenient_f64")]
    pub pos_z: f64,

    /// Euler angles in degrees, axis order ZXY.
    #[serde(rename = "ObjPosOX", default, deserialize_with = "lenient_f64")]
    pub rot_x: f64,
    #[serde(rename = "ObjPosOY", default, deserialize_with = "lenient_f64")]
    pub rot_y: f64,
    #[serde(rename = "ObjPosOZ", default, deserialize_with = "lenient_f64")]
    pub rot_z: f64,

    #[serde(rename = "ObjRefCode", default, deserialize_with = "nullable")]
    pub ref_code: String,
    #[serde(rename = "ObjDesc", default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename = "TextureName", default, deserialize_with = "nullable")]
    pub texture_name: String,
    /// Texture-orientation marker (`R` or `N` somewhere in the code).
    #[serde(rename = "TextureCode", default, deserialize_with = "nullable")]
    pub texture_code: String,
    #[serde(rename = "PlankTowardType", default, deserialize_with = "nullable")]
    pub toward_label: String,

    #[serde(rename = "PLOutLinePoints", default, deserialize_with = "nullable")]
    pub outline: Vec<OutlinePointRecord>,

    #[serde(rename = "ObjType", default, deserialize_with = "nullable")]
    pub kind: ModuleKind,

    #[serde(rename = "PanelThickness", default, skip_serializing_if = "Option::is_none")]
    pub panel_thickness: Option<f64>,

    /// Feature direction in world space, set on synthesized records.
    #[serde(rename = "towardVecInWorld", default, skip_serializing_if = "Option::is_none")]
    pub toward_in_world: Option<[f64; 3]>,

    #[serde(rename = "Info", default, with = "info_envelope")]
    pub info: InfoBlock,
}

impl Record {
    pub fn dimensions(&self) -> [f64; 3] {
        [self.width, self.depth, self.height]
    }

    pub fn position(&self) -> [f64; 3] {
        [self.pos_x, self.pos_y, self.pos_z]
    }

    pub fn rotation(&self) -> [f64; 3] {
        [self.rot_x, self.rot_y, self.rot_z]
    }

    pub fn scene_id(&self) -> Option<String> {
        self.info.get_text(keys::SCENE_ID)
    }

    pub fn parent_scene_id(&self) -> Option<String> {
        self.info.get_text(keys::PARENT_SCENE_ID)
    }

    pub fn brand_good_code(&self) -> Option<&str> {
        self.info.get_str(keys::BRAND_GOOD_CODE)
    }

    pub fn import_model_type(&self) -> Option<String> {
        self.info.get_text(keys::IMPORT_MODEL_TYPE)
    }

    /// Library name when present, otherwise the record name.
    pub fn display_name(&self) -> &str {
        match self.info.get_str(keys::KU_NAME) {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }
}

/// Parses a JSON array of records.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(json)?)
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(n)) => n,
        Some(Loose::Text(text)) => parse_leading_f64(&text).unwrap_or(0.0),
        None => 0.0,
    })
}

/// `Info` is nested one level deeper in exports: `{"Info": {"Info": {...}}}`.
mod info_envelope {
    use super::*;

    #[derive(Default, Serialize, Deserialize)]
    struct Envelope {
        #[serde(rename = "Info", default, deserialize_with = "nullable")]
        info: InfoBlock,
    }

    pub fn serialize<S: Serializer>(
        info: &InfoBlock,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct EnvelopeRef<'a> {
            #[serde(rename = "Info")]
            info: &'a InfoBlock,
        }
        EnvelopeRef { info }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<InfoBlock, D::Error> {
        let envelope = Option::<Envelope>::deserialize(deserializer)?.unwrap_or_default();
        Ok(envelope.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_export_record() {
        let record: Record = serde_json::from_value(json!({
            "ObjID": 12,
            "ParentId": "-1",
            "ObjName": "Side",
            "ObjWidth": 18,
            "ObjDepth": "560",
            "ObjHeight": 720.5,
            "ObjPosOZ": 90,
            "ObjRefCode": "KuCB",
            "ObjDesc": null,
            "PLOutLinePoints": [{ "X": 0, "Y": 0, "Z": 0, "Type": 1 }],
            "Info": { "Info": { "KuName": "Left side", "kdSceneId": "s1" } }
        }))
        .unwrap();

        assert_eq!(record.id.canonical(), "12");
        assert_eq!(record.parent_id.as_text(), Some("-1"));
        assert_eq!(record.dimensions(), [18.0, 560.0, 720.5]);
        assert_eq!(record.rotation(), [0.0, 0.0, 90.0]);
        assert_eq!(record.description, "");
        assert_eq!(record.outline[0].tag, PointTag::Arc);
        assert_eq!(record.display_name(), "Left side");
        assert_eq!(record.scene_id().as_deref(), Some("s1"));
        assert_eq!(record.kind, ModuleKind::Unknown);
    }

    #[test]
    fn normalizes_numeric_ids() {
        let mut id = RecordId::Number(Number::from_f64(42.0).unwrap());
        assert_eq!(id.canonical(), "42");
        id.normalize();
        assert_eq!(id, RecordId::from("42"));

        let id = RecordId::Number(Number::from_f64(1.5).unwrap());
        assert_eq!(id.canonical(), "1.5");
    }

    #[test]
    fn missing_info_is_empty() {
        let record: Record = serde_json::from_value(json!({ "ObjID": "a", "Info": null })).unwrap();
        assert!(record.info.is_empty());
        assert!(record.parent_id.is_empty());
    }

    #[test]
    fn rejects_unknown_point_tag() {
        let result: std::result::Result<OutlinePointRecord, _> =
            serde_json::from_value(json!({ "X": 0, "Y": 0, "Z": 0, "Type": 7 }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_with_export_names() {
        let mut record = Record {
            id: "1".into(),
            kind: ModuleKind::CanonicalBoard,
            ..Default::default()
        };
        record.info.set(keys::BRAND_GOOD_CODE, "X");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["ObjID"], "1");
        assert_eq!(value["ObjType"], "CanonicalBoard");
        assert_eq!(value["Info"]["Info"]["modelBrandGoodCode"], "X");

        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn parses_record_arrays() {
        let records = parse_records(r#"[{"ObjID": 1}, {"ObjID": "2", "ParentId": 1}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parent_id.canonical(), "1");
    }
}
