// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rebuilding the module hierarchy from flat records.
//!
//! Records reference their parent in two ways: a structural parent id
//! (`ParentId` → `ObjID`) and a scene-id pair in the info block
//! (`kdParentSceneId` → `kdSceneId`). The scene-id scheme wins whenever it
//! resolves. Parent resolution, in order:
//!
//! 1. parent scene id equals the root sentinel: root;
//! 2. another record's scene id equals the parent scene id: attach there and
//!    rewrite the structural parent id;
//! 3. another record's id equals the structural parent id: attach there;
//! 4. otherwise: root (logged when a parent was named but not found).

use cabinet_lite_core::{
    keys, parse_description, Axis, AxisDirection, ModuleKind, Record, ROOT_SENTINEL,
};
use cabinet_lite_geometry::{Euler, Matrix4, OutlinePoint, Pose, Vector4};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::arena::ModuleForest;
use crate::keys::ModuleKey;
use crate::module::{FeatureParameters, Module, ModuleInfo, TextureType};

/// How a record found its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Root,
    Scene(ModuleKey),
    Structural(ModuleKey),
    Orphan,
}

/// Builds a [`ModuleForest`] from classified records.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root_sentinel: String,
    direction_decimals: u32,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            root_sentinel: ROOT_SENTINEL.to_owned(),
            direction_decimals: 0,
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.root_sentinel = sentinel.into();
        self
    }

    /// Decimals kept when rounding feature directions.
    pub fn with_direction_decimals(mut self, decimals: u32) -> Self {
        self.direction_decimals = decimals;
        self
    }

    /// Converts every record to a module and links the hierarchy. Roots and
    /// children keep record order.
    pub fn build(&self, records: &[Record]) -> ModuleForest {
        let mut forest = ModuleForest::new();
        let keys: Vec<ModuleKey> = records
            .iter()
            .map(|r| forest.insert(module_from_record(r, self.direction_decimals)))
            .collect();

        // Only records carrying both scene ids take part in the scene scheme.
        let mut by_scene: FxHashMap<String, ModuleKey> = FxHashMap::default();
        for &key in &keys {
            if let Some(m) = forest.get(key) {
                if let (Some(scene), Some(_)) = (&m.info.scene_id, &m.info.parent_scene_id) {
                    // A repeated scene id resolves to the later record.
                    by_scene.insert(scene.clone(), key);
                }
            }
        }

        let mut orphans = 0usize;
        for &key in &keys {
            let parent = match self.resolve(&forest, &by_scene, key) {
                Resolution::Scene(p) => {
                    let parent_id = forest.get(p).map(|m| m.id.clone()).unwrap_or_default();
                    if let Some(m) = forest.get_mut(key) {
                        m.parent_id = parent_id;
                    }
                    Some(p)
                }
                Resolution::Structural(p) => Some(p),
                Resolution::Orphan => {
                    orphans += 1;
                    None
                }
                Resolution::Root => None,
            };

            let linked = match parent {
                Some(p) => match forest.attach(p, key) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(
                            module = %module_id(&forest, key),
                            error = %err,
                            "breaking parent cycle; attaching as root"
                        );
                        false
                    }
                },
                None => false,
            };
            if !linked {
                forest.roots.push(key);
            }
        }

        debug!(modules = forest.len(), roots = forest.roots().len(), orphans, "tree assembled");
        forest
    }

    fn resolve(
        &self,
        forest: &ModuleForest,
        by_scene: &FxHashMap<String, ModuleKey>,
        key: ModuleKey,
    ) -> Resolution {
        let Some(module) = forest.get(key) else {
            return Resolution::Orphan;
        };

        if let Some(parent_scene) = &module.info.parent_scene_id {
            if *parent_scene == self.root_sentinel {
                return Resolution::Root;
            }
            if let Some(&p) = by_scene.get(parent_scene) {
                if p != key {
                    return Resolution::Scene(p);
                }
            }
        }

        let parent_id = &module.parent_id;
        match forest.find_by_id(parent_id) {
            Some(p) if p != key => Resolution::Structural(p),
            _ if parent_id.is_empty() || *parent_id == self.root_sentinel => Resolution::Root,
            _ => {
                warn!(
                    module = %module.id,
                    parent = %parent_id,
                    "unresolved parent; attaching as root"
                );
                Resolution::Orphan
            }
        }
    }
}

fn module_id(forest: &ModuleForest, key: ModuleKey) -> String {
    forest.get(key).map(|m| m.id.clone()).unwrap_or_default()
}

/// Drops top-level trees without any board-family module below the root.
/// Returns the number of trees removed.
pub fn retain_board_roots(forest: &mut ModuleForest) -> usize {
    let before = forest.roots().len();
    forest.retain_roots(|f, root| f.any_descendant(root, |m| m.kind.is_board_family()));
    let removed = before - forest.roots().len();
    if removed > 0 {
        info!(removed, kept = forest.roots().len(), "pruned trees without boards");
    }
    removed
}

/// Reads a feature attribute from the info block, falling back to the
/// description string.
fn feature_attr(record: &Record, key: &str) -> Option<String> {
    record
        .info
        .get_text(key)
        .or_else(|| parse_description(&record.description).get(key).map(str::to_owned))
}

fn feature_f64(record: &Record, key: &str) -> Option<f64> {
    record
        .info
        .get_f64(key)
        .or_else(|| {
            feature_attr(record, key).and_then(|v| cabinet_lite_core::parse_leading_f64(&v))
        })
}

/// Features face the opposite way to the exporter's Z rotation.
fn feature_facing(record: &Record) -> Matrix4 {
    Matrix4::rotation_from_euler(&Euler::zxy(0.0, 0.0, record.rot_z - 180.0))
}

fn non_negative(record: &Record, value: f64, axis: &str) -> f64 {
    if value < 0.0 {
        warn!(record = %record.id, axis, value, "negative dimension clamped to zero");
        0.0
    } else {
        value
    }
}

/// Converts one classified record into an unlinked module.
pub fn module_from_record(record: &Record, direction_decimals: u32) -> Module {
    let absolute = Pose::from_arrays(record.position(), record.rotation());
    let dimensions = Vector4::direction(
        non_negative(record, record.width, "width"),
        non_negative(record, record.depth, "depth"),
        non_negative(record, record.height, "height"),
    );
    let info = ModuleInfo {
        library_name: record.info.get_text(keys::KU_NAME),
        scene_id: record.scene_id(),
        parent_scene_id: record.parent_scene_id(),
        brand_good_code: record.info.get_text(keys::BRAND_GOOD_CODE),
        import_model_type: record.import_model_type(),
        supplement_type: record.info.get_text(keys::SUPPLEMENT_TYPE),
    };

    let mut module = Module {
        id: record.id.canonical(),
        parent_id: record.parent_id.canonical(),
        name: record.display_name().to_owned(),
        kind: record.kind,
        ref_code: record.ref_code.clone(),
        dimensions,
        absolute,
        relative: absolute,
        outline: record.outline.iter().copied().map(OutlinePoint::from).collect(),
        texture: record.texture_name.clone(),
        texture_type: TextureType::from_label(&record.toward_label),
        toward_in_world: record
            .toward_in_world
            .map(|v| Vector4::from_array(v, 0.0))
            .unwrap_or_else(Vector4::unit_z),
        toward_in_parent: Vector4::unit_z(),
        parameters: FeatureParameters::None,
        info,
    };

    match record.kind {
        ModuleKind::Hole => {
            module.toward_in_world = feature_direction(record, direction_decimals);
            module.parameters = FeatureParameters::Hole {
                diameter: feature_f64(record, keys::HOLE_DIAMETER),
                depth: feature_f64(record, keys::HOLE_DEPTH),
            };
        }
        ModuleKind::Groove => {
            module.toward_in_world = feature_direction(record, direction_decimals);
            let length_axis = feature_attr(record, keys::GROOVE_LENGTH_AXIS);
            let axis = match length_axis.as_deref().and_then(Axis::parse) {
                Some(axis) => Vector4::from_array(axis.unit(), 0.0),
                None => {
                    warn!(record = %record.id, "groove without a usable length axis");
                    Vector4::zero()
                }
            };
            let axis_in_world = (feature_facing(record) * axis).round(direction_decimals);
            module.parameters = FeatureParameters::Groove {
                depth: feature_f64(record, keys::GROOVE_DEPTH),
                width: feature_f64(record, keys::GROOVE_WIDTH),
                length: feature_f64(record, keys::GROOVE_LENGTH),
                axis_in_world,
                axis_in_parent: axis_in_world,
            };
        }
        _ => {}
    }

    module
}

/// An unusable `YSFX` yields the zero vector, which no panel contains.
fn feature_direction(record: &Record, decimals: u32) -> Vector4 {
    let direction = feature_attr(record, keys::HOLE_DIRECTION);
    let local = match direction.as_deref().and_then(AxisDirection::parse) {
        Some(direction) => Vector4::from_array(direction.unit(), 0.0),
        None => {
            warn!(record = %record.id, "feature without a usable direction");
            Vector4::zero()
        }
    };
    (feature_facing(record) * local).round(decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_lite_core::RecordId;
    use cabinet_lite_geometry::PanelFrame;
    use serde_json::json;

    fn record(id: &str, parent: &str) -> Record {
        Record {
            id: RecordId::from(id),
            parent_id: RecordId::from(parent),
            ..Default::default()
        }
    }

    fn with_scene(mut r: Record, scene: &str, parent_scene: &str) -> Record {
        r.info.set(keys::SCENE_ID, scene);
        r.info.set(keys::PARENT_SCENE_ID, parent_scene);
        r
    }

    fn ids(forest: &ModuleForest, keys: &[ModuleKey]) -> Vec<String> {
        keys.iter().map(|k| forest.get(*k).unwrap().id.clone()).collect()
    }

    #[test]
    fn structural_ids_nest_one_level() {
        let records = vec![record("1", "-1"), record("2", "1"), record("3", "2"), record("4", "1")];
        let forest = TreeBuilder::new().build(&records);
        assert_eq!(ids(&forest, forest.roots()), ["1"]);
        let root = forest.roots()[0];
        assert_eq!(ids(&forest, forest.children(root)), ["2", "4"]);
        let two = forest.find_by_id("2").unwrap();
        assert_eq!(ids(&forest, forest.children(two)), ["3"]);
    }

    #[test]
    fn scene_ids_take_priority() {
        let records = vec![
            with_scene(record("a", "-1"), "s-a", "-1"),
            record("b", "-1"),
            // Structural parent says "b", scene parent says "a".
            with_scene(record("c", "b"), "s-c", "s-a"),
        ];
        let forest = TreeBuilder::new().build(&records);
        let a = forest.find_by_id("a").unwrap();
        let c = forest.find_by_id("c").unwrap();
        assert_eq!(forest.parent(c), Some(a));
        assert_eq!(forest.get(c).unwrap().parent_id, "a");
    }

    #[test]
    fn repeated_scene_id_resolves_to_later_record() {
        let records = vec![
            with_scene(record("first", "-1"), "s-dup", "-1"),
            with_scene(record("second", "-1"), "s-dup", "-1"),
            with_scene(record("c", "first"), "s-c", "s-dup"),
        ];
        let forest = TreeBuilder::new().build(&records);
        let second = forest.find_by_id("second").unwrap();
        let c = forest.find_by_id("c").unwrap();
        assert_eq!(forest.parent(c), Some(second));
        assert_eq!(forest.get(c).unwrap().parent_id, "second");
    }

    #[test]
    fn root_sentinel_in_scene_scheme_wins() {
        let records = vec![record("p", "-1"), with_scene(record("c", "p"), "s-c", "-1")];
        let forest = TreeBuilder::new().build(&records);
        assert_eq!(forest.roots().len(), 2);
    }

    #[test]
    fn scene_index_needs_both_ids() {
        let mut parent = record("p", "-1");
        parent.info.set(keys::SCENE_ID, "s-p");
        let records = vec![parent, record("q", "-1"), with_scene(record("c", "q"), "s-c", "s-p")];
        let forest = TreeBuilder::new().build(&records);
        // "p" lacks a parent scene id, so the structural id decides.
        let q = forest.find_by_id("q").unwrap();
        assert_eq!(forest.parent(forest.find_by_id("c").unwrap()), Some(q));
    }

    #[test]
    fn orphans_become_roots() {
        let records = vec![record("1", "-1"), record("2", "missing")];
        let forest = TreeBuilder::new().build(&records);
        assert_eq!(ids(&forest, forest.roots()), ["1", "2"]);
    }

    #[test]
    fn self_parent_and_cycles_are_broken() {
        let records = vec![record("x", "x"), record("a", "b"), record("b", "a")];
        let forest = TreeBuilder::new().build(&records);
        let total: usize = forest.roots().iter().map(|r| forest.pre_order_from(*r).len()).sum();
        assert_eq!(total, 3);
        assert!(forest.roots().contains(&forest.find_by_id("x").unwrap()));
    }

    #[test]
    fn filter_keeps_only_trees_with_boards() {
        let mut board = record("b", "1");
        board.kind = ModuleKind::Board;
        let records = vec![record("1", "-1"), board, record("2", "-1"), record("3", "2")];
        let mut forest = TreeBuilder::new().build(&records);
        assert_eq!(retain_board_roots(&mut forest), 1);
        assert_eq!(ids(&forest, forest.roots()), ["1"]);
        assert!(forest.find_by_id("3").is_none());
    }

    #[test]
    fn hole_parameters_and_direction() {
        let r: Record = serde_json::from_value(json!({
            "ObjID": "h", "ParentId": "b", "ObjType": "Hole", "ObjPosOZ": 180,
            "ObjDesc": "ZJ:=5!GD:=12!YSFX:=X+",
            "Info": { "Info": { "zj": "5", "GD": 12 } }
        }))
        .unwrap();
        let m = module_from_record(&r, 0);
        assert_eq!(m.toward_in_world, Vector4::direction(1.0, 0.0, 0.0));
        let expected = FeatureParameters::Hole {
            diameter: Some(5.0),
            depth: Some(12.0),
        };
        assert_eq!(m.parameters, expected);
    }

    #[test]
    fn hole_direction_follows_export_rotation() {
        let r: Record = serde_json::from_value(json!({
            "ObjID": "h", "ObjType": "Hole", "ObjPosOZ": 0,
            "Info": { "Info": { "YSFX": "X+" } }
        }))
        .unwrap();
        // Rz(-180) flips +X.
        assert_eq!(module_from_record(&r, 0).toward_in_world, Vector4::direction(-1.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_hole_direction_is_zero() {
        let r: Record = serde_json::from_value(json!({
            "ObjID": "h", "ObjType": "Hole", "ObjPosOZ": 180,
            "ObjDesc": "ZJ:=5!GD:=12!YSFX:=up"
        }))
        .unwrap();
        let m = module_from_record(&r, 0);
        assert_eq!(m.toward_in_world, Vector4::zero());
        let shape = m.feature_shape().unwrap();
        let panel = PanelFrame::new(Pose::identity(), Vector4::direction(600.0, 400.0, 18.0));
        assert!(!shape.within(&panel, 0.5).unwrap());
    }

    #[test]
    fn groove_axis() {
        let r: Record = serde_json::from_value(json!({
            "ObjID": "g", "ObjType": "Groove", "ObjPosOZ": 270,
            "Info": { "Info": {
                "LengthAxis": "X", "Depth": "8", "Size_x": 300, "Size_y": 4, "YSFX": "Z-"
            } }
        }))
        .unwrap();
        let m = module_from_record(&r, 0);
        match m.parameters {
            FeatureParameters::Groove { depth, length, width, axis_in_world, .. } => {
                assert_eq!((depth, length, width), (Some(8.0), Some(300.0), Some(4.0)));
                assert_eq!(axis_in_world, Vector4::direction(0.0, 1.0, 0.0));
            }
            other => panic!("unexpected parameters {:?}", other),
        }
        assert_eq!(m.toward_in_world, Vector4::direction(0.0, 0.0, -1.0));
    }

    #[test]
    fn record_fields_carry_over() {
        let r: Record = serde_json::from_value(json!({
            "ObjID": 7, "ParentId": 3, "ObjName": "raw",
            "ObjWidth": 600, "ObjDepth": 18, "ObjHeight": -5,
            "TextureName": "oak", "PlankTowardType": "竖纹",
            "Info": { "Info": { "KuName": "Door", "BDImportModelType": "2" } }
        }))
        .unwrap();
        let m = module_from_record(&r, 0);
        assert_eq!((m.id.as_str(), m.parent_id.as_str(), m.name.as_str()), ("7", "3", "Door"));
        assert_eq!(m.dimensions, Vector4::direction(600.0, 18.0, 0.0));
        assert_eq!(m.texture_type, TextureType::Vertical);
        assert_eq!(m.info.import_model_type.as_deref(), Some("2"));
        assert_eq!(m.relative, m.absolute);
    }
}
