// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pose propagation along the forest.
//!
//! Absolute (world) poses are authoritative. [`propagate_relative`] derives
//! every relative pose from them in one top-down pass; [`propagate_absolute`]
//! goes the other way, rebuilding absolute poses from relative ones after a
//! subtree has been re-rooted.

use cabinet_lite_geometry::{EulerOrder, Pose};

use crate::arena::ModuleForest;
use crate::keys::ModuleKey;
use crate::module::FeatureParameters;

/// Axis order used for every derived rotation.
pub const RELATIVE_ORDER: EulerOrder = EulerOrder::ZXY;

/// Computes relative poses and parent-frame directions from absolute poses.
///
/// Roots copy their absolute pose. Every other module is expressed in its
/// parent's frame; direction vectors are rotated (not translated) into the
/// parent frame and rounded to `decimals`. Only absolute data is read, so a
/// second run changes nothing.
pub fn propagate_relative(forest: &mut ModuleForest, decimals: u32) {
    for key in forest.pre_order() {
        let parent_pose = forest.parent(key).and_then(|p| forest.get(p)).map(|p| p.absolute);
        let Some(module) = forest.get_mut(key) else {
            continue;
        };

        match parent_pose {
            None => {
                module.relative = module.absolute;
                module.toward_in_parent = module.toward_in_world;
                if let FeatureParameters::Groove {
                    axis_in_world,
                    axis_in_parent,
                    ..
                } = &mut module.parameters
                {
                    *axis_in_parent = *axis_in_world;
                }
            }
            Some(parent) => {
                module.relative = module.absolute.relative_to(&parent, RELATIVE_ORDER);
                let to_parent = parent.inverse_rotation_matrix();
                module.toward_in_parent = (to_parent * module.toward_in_world).round(decimals);
                if let FeatureParameters::Groove {
                    axis_in_world,
                    axis_in_parent,
                    ..
                } = &mut module.parameters
                {
                    *axis_in_parent = (to_parent * *axis_in_world).round(decimals);
                }
            }
        }
    }
}

/// Places `root` at `pose` and recomputes the absolute poses of its
/// descendants from their relative poses.
pub fn propagate_absolute(forest: &mut ModuleForest, root: ModuleKey, pose: Pose) {
    if let Some(module) = forest.get_mut(root) {
        module.absolute = pose;
    }
    for key in forest.descendants(root) {
        let Some(parent) = forest.parent(key).and_then(|p| forest.get(p)).map(|p| p.absolute) else {
            continue;
        };
        if let Some(module) = forest.get_mut(key) {
            module.absolute = parent.compose(&module.relative, RELATIVE_ORDER);
            let to_world = parent.rotation_matrix();
            module.toward_in_world = to_world * module.toward_in_parent;
            if let FeatureParameters::Groove {
                axis_in_world,
                axis_in_parent,
                ..
            } = &mut module.parameters
            {
                *axis_in_world = to_world * *axis_in_parent;
            }
        }
    }
}
