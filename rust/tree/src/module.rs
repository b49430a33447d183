// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The spatial node type.

use cabinet_lite_core::{Grain, ModuleKind};
use cabinet_lite_geometry::{
    Aabb, FeatureShape, GrooveShape, HoleShape, Matrix4, OutlinePoint, PanelFrame, Pose, Vector4,
};
use serde::{Deserialize, Serialize};

/// Grain direction of the surface texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureType {
    Vertical,
    Horizontal,
    #[default]
    Unknown,
}

impl TextureType {
    /// Reads the grain half of a toward label.
    pub fn from_label(label: &str) -> Self {
        match Grain::from_label(label) {
            Some(Grain::Vertical) => TextureType::Vertical,
            Some(Grain::Horizontal) => TextureType::Horizontal,
            None => TextureType::Unknown,
        }
    }
}

/// Attributes carried over from the record's info block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_scene_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_good_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplement_type: Option<String>,
}

/// Kind-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FeatureParameters {
    #[default]
    None,
    Hole {
        diameter: Option<f64>,
        depth: Option<f64>,
    },
    Groove {
        depth: Option<f64>,
        width: Option<f64>,
        length: Option<f64>,
        /// Growth axis in world space.
        axis_in_world: Vector4,
        /// Growth axis in the parent's frame, set by propagation.
        axis_in_parent: Vector4,
    },
}

/// A node of the spatial model.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub kind: ModuleKind,
    pub ref_code: String,
    /// Width, depth, height (`w = 0`).
    pub dimensions: Vector4,
    /// World pose; authoritative.
    pub absolute: Pose,
    /// Pose in the parent's frame; derived by propagation.
    pub relative: Pose,
    pub outline: Vec<OutlinePoint>,
    pub texture: String,
    pub texture_type: TextureType,
    /// Feature direction in world space.
    pub toward_in_world: Vector4,
    /// Feature direction in the parent's frame; derived by propagation.
    pub toward_in_parent: Vector4,
    pub parameters: FeatureParameters,
    pub info: ModuleInfo,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            id: String::new(),
            parent_id: String::new(),
            name: String::new(),
            kind: ModuleKind::Unknown,
            ref_code: String::new(),
            dimensions: Vector4::zero(),
            absolute: Pose::identity(),
            relative: Pose::identity(),
            outline: Vec::new(),
            texture: String::new(),
            texture_type: TextureType::Unknown,
            toward_in_world: Vector4::unit_z(),
            toward_in_parent: Vector4::unit_z(),
            parameters: FeatureParameters::None,
            info: ModuleInfo::default(),
        }
    }
}

impl Module {
    pub fn new(id: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    pub fn depth(&self) -> f64 {
        self.dimensions.y
    }

    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    pub fn local_to_world(&self) -> Matrix4 {
        self.absolute.local_to_world()
    }

    pub fn world_to_local(&self) -> Matrix4 {
        self.absolute.world_to_local()
    }

    /// World bounds of the module's box (conservative under rotation).
    pub fn world_aabb(&self) -> Aabb {
        Aabb::from_dimensions(&Vector4::point(0.0, 0.0, 0.0), &self.dimensions)
            .transform(&self.local_to_world())
    }

    pub fn panel_frame(&self) -> PanelFrame {
        PanelFrame::new(self.absolute, self.dimensions)
    }

    /// Shape for containment tests; `None` for non-features.
    pub fn feature_shape(&self) -> Option<FeatureShape> {
        match self.parameters {
            FeatureParameters::Hole { depth, .. } if self.kind == ModuleKind::Hole => {
                Some(FeatureShape::Hole(HoleShape {
                    origin: self.absolute.position,
                    direction: self.toward_in_world,
                    depth,
                }))
            }
            FeatureParameters::Groove { axis_in_world, .. } if self.kind == ModuleKind::Groove => {
                Some(FeatureShape::Groove(GrooveShape {
                    pose: self.absolute,
                    dimensions: self.dimensions,
                    growth_axis: axis_in_world,
                }))
            }
            _ => None,
        }
    }
}
