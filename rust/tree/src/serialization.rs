// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON snapshots of a module forest.
//!
//! Modules are written flat, in pre-order, with the parent given as an index
//! into the same list. Slot-map keys never leave the process.

use cabinet_lite_core::{ModuleKind, OutlinePointRecord};
use cabinet_lite_geometry::{Euler, EulerOrder, OutlinePoint, Pose, Vector4};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::ModuleForest;
use crate::error::{Error, Result};
use crate::module::{FeatureParameters, Module, ModuleInfo, TextureType};

/// Serializable representation of the whole forest.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestSnapshot {
    pub modules: Vec<ModuleSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub order: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParametersSnapshot {
    None,
    Hole {
        #[serde(skip_serializing_if = "Option::is_none")]
        diameter: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        depth: Option<f64>,
    },
    Groove {
        #[serde(skip_serializing_if = "Option::is_none")]
        depth: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        length: Option<f64>,
        axis_in_world: [f64; 3],
        axis_in_parent: [f64; 3],
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub kind: ModuleKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_code: String,
    pub dimensions: [f64; 3],
    pub absolute: PoseSnapshot,
    pub relative: PoseSnapshot,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline: Vec<OutlinePointRecord>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub texture: String,
    pub texture_type: TextureType,
    pub toward_in_world: [f64; 3],
    pub toward_in_parent: [f64; 3],
    pub parameters: ParametersSnapshot,
    #[serde(default)]
    pub info: ModuleInfo,
}

impl From<&Pose> for PoseSnapshot {
    fn from(pose: &Pose) -> Self {
        PoseSnapshot {
            position: pose.position.xyz(),
            rotation: pose.rotation.angles(),
            order: pose.rotation.order.as_str().to_string(),
        }
    }
}

impl PoseSnapshot {
    fn to_pose(&self) -> Result<Pose> {
        let order = EulerOrder::parse(&self.order).ok_or_else(|| {
            Error::Serialization(format!("unknown rotation order {:?}", self.order))
        })?;
        let [x, y, z] = self.rotation;
        Ok(Pose::new(Vector4::from_array(self.position, 1.0), Euler::new(x, y, z, order)))
    }
}

impl From<&FeatureParameters> for ParametersSnapshot {
    fn from(parameters: &FeatureParameters) -> Self {
        match *parameters {
            FeatureParameters::None => ParametersSnapshot::None,
            FeatureParameters::Hole { diameter, depth } => {
                ParametersSnapshot::Hole { diameter, depth }
            }
            FeatureParameters::Groove {
                depth,
                width,
                length,
                axis_in_world,
                axis_in_parent,
            } => ParametersSnapshot::Groove {
                depth,
                width,
                length,
                axis_in_world: axis_in_world.xyz(),
                axis_in_parent: axis_in_parent.xyz(),
            },
        }
    }
}

impl From<ParametersSnapshot> for FeatureParameters {
    fn from(snapshot: ParametersSnapshot) -> Self {
        match snapshot {
            ParametersSnapshot::None => FeatureParameters::None,
            ParametersSnapshot::Hole { diameter, depth } => {
                FeatureParameters::Hole { diameter, depth }
            }
            ParametersSnapshot::Groove {
                depth,
                width,
                length,
                axis_in_world,
                axis_in_parent,
            } => FeatureParameters::Groove {
                depth,
                width,
                length,
                axis_in_world: Vector4::from_array(axis_in_world, 0.0),
                axis_in_parent: Vector4::from_array(axis_in_parent, 0.0),
            },
        }
    }
}

impl ModuleSnapshot {
    fn to_module(&self) -> Result<Module> {
        Ok(Module {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            ref_code: self.ref_code.clone(),
            dimensions: Vector4::from_array(self.dimensions, 0.0),
            absolute: self.absolute.to_pose()?,
            relative: self.relative.to_pose()?,
            outline: self.outline.iter().copied().map(OutlinePoint::from).collect(),
            texture: self.texture.clone(),
            texture_type: self.texture_type,
            toward_in_world: Vector4::from_array(self.toward_in_world, 0.0),
            toward_in_parent: Vector4::from_array(self.toward_in_parent, 0.0),
            parameters: self.parameters.into(),
            info: self.info.clone(),
        })
    }
}

impl ModuleForest {
    /// Serializes the forest to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serializes the forest to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Creates a serializable snapshot; modules are numbered in pre-order.
    pub fn to_snapshot(&self) -> ForestSnapshot {
        let order = self.pre_order();
        let index: FxHashMap<_, usize> = order.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        let modules = order
            .iter()
            .enumerate()
            .filter_map(|(i, key)| {
                let m = self.get(*key)?;
                Some(ModuleSnapshot {
                    index: i,
                    parent: self.parent(*key).and_then(|p| index.get(&p).copied()),
                    id: m.id.clone(),
                    parent_id: m.parent_id.clone(),
                    name: m.name.clone(),
                    kind: m.kind,
                    ref_code: m.ref_code.clone(),
                    dimensions: m.dimensions.xyz(),
                    absolute: (&m.absolute).into(),
                    relative: (&m.relative).into(),
                    outline: m.outline.iter().copied().map(OutlinePointRecord::from).collect(),
                    texture: m.texture.clone(),
                    texture_type: m.texture_type,
                    toward_in_world: m.toward_in_world.xyz(),
                    toward_in_parent: m.toward_in_parent.xyz(),
                    parameters: (&m.parameters).into(),
                    info: m.info.clone(),
                })
            })
            .collect();
        ForestSnapshot { modules }
    }

    /// Rebuilds a forest from a snapshot. Parents must precede children.
    pub fn from_snapshot(snapshot: &ForestSnapshot) -> Result<Self> {
        let mut forest = ModuleForest::new();
        let mut keys = Vec::with_capacity(snapshot.modules.len());
        for (i, m) in snapshot.modules.iter().enumerate() {
            let module = m.to_module()?;
            let key = match m.parent {
                None => forest.add_root(module),
                Some(p) if p < i => forest.add_child(keys[p], module)?,
                Some(p) => {
                    return Err(Error::Serialization(format!(
                        "module {} references parent {} that does not precede it",
                        i, p
                    )))
                }
            };
            keys.push(key);
        }
        Ok(forest)
    }

    /// Parses a forest from JSON produced by [`ModuleForest::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ForestSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }
}
