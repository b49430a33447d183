// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement tests for holes and grooves inside panels.
//!
//! Both tests move characteristic points of the feature into the panel's
//! local frame, where the panel occupies the box `[0, dimensions]`.

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::frame::Pose;
use crate::matrix::Matrix4;
use crate::vector::Vector4;

/// Slack around the panel box for hole endpoints.
pub const DEFAULT_HOLE_TOLERANCE: f64 = 0.5;

/// How close a direction component must be to ±1 to count as axis-aligned.
pub const AXIS_TOLERANCE: f64 = 1e-2;

/// Tolerance for edge classification in panel-local coordinates.
pub const EDGE_TOLERANCE: f64 = 1e-3;

/// A panel's world pose and extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    pub pose: Pose,
    /// Width, depth, height.
    pub dimensions: Vector4,
}

impl PanelFrame {
    pub fn new(pose: Pose, dimensions: Vector4) -> Self {
        Self { pose, dimensions }
    }

    pub fn world_to_local(&self) -> Matrix4 {
        self.pose.world_to_local()
    }

    fn within(&self, local: &Vector4, slack: f64) -> bool {
        let d = &self.dimensions;
        local.x >= -slack
            && local.y >= -slack
            && local.z >= -slack
            && local.x <= d.x + slack
            && local.y <= d.y + slack
            && local.z <= d.z + slack
    }
}

/// A drilled hole: a world start point, a world direction and a depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleShape {
    pub origin: Vector4,
    pub direction: Vector4,
    pub depth: Option<f64>,
}

impl HoleShape {
    /// Start and end of the drilled segment, in world space. `None` without a
    /// depth or a direction.
    pub fn segment(&self) -> Option<(Vector4, Vector4)> {
        let depth = self.depth?;
        if self.direction.xyz() == [0.0; 3] {
            return None;
        }
        let start = Vector4::point(self.origin.x, self.origin.y, self.origin.z);
        let d = &self.direction;
        let end = start + Vector4::direction(d.x, d.y, d.z) * depth;
        Some((start, end))
    }
}

/// A milled groove: its own pose and box, plus its world growth axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrooveShape {
    pub pose: Pose,
    pub dimensions: Vector4,
    pub growth_axis: Vector4,
}

/// Either kind of feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureShape {
    Hole(HoleShape),
    Groove(GrooveShape),
}

impl FeatureShape {
    pub fn within(&self, panel: &PanelFrame, hole_tolerance: f64) -> Result<bool> {
        match self {
            FeatureShape::Hole(hole) => Ok(hole_in_panel(hole, panel, hole_tolerance)),
            FeatureShape::Groove(groove) => groove_in_panel(groove, panel),
        }
    }
}

/// Whether the whole drilled segment lies inside the panel box grown by
/// `tolerance`. A hole without a depth or direction is never inside.
pub fn hole_in_panel(hole: &HoleShape, panel: &PanelFrame, tolerance: f64) -> bool {
    let Some((start, end)) = hole.segment() else {
        return false;
    };
    let to_local = panel.world_to_local();
    panel.within(&(to_local * start), tolerance) && panel.within(&(to_local * end), tolerance)
}

/// Groove-local characteristic points: the two ends of the growth axis
/// through the box middle, then the min and max corners.
fn groove_points(groove: &GrooveShape) -> Result<SmallVec<[Vector4; 4]>> {
    let axis = &groove.growth_axis;
    let d = &groove.dimensions;
    let aligned = |v: f64| (v.abs() - 1.0).abs() < AXIS_TOLERANCE;

    let (p1, p2) = if aligned(axis.x) {
        (Vector4::point(0.0, d.y / 2.0, d.z / 2.0), Vector4::point(d.x, d.y / 2.0, d.z / 2.0))
    } else if aligned(axis.z) {
        (Vector4::point(d.x / 2.0, d.y / 2.0, 0.0), Vector4::point(d.x / 2.0, d.y / 2.0, d.z))
    } else if aligned(axis.y) {
        (Vector4::point(d.x / 2.0, 0.0, d.z / 2.0), Vector4::point(d.x / 2.0, d.y, d.z / 2.0))
    } else {
        return Err(Error::InvalidGrooveAxis(axis.xyz()));
    };

    let mut points = SmallVec::new();
    points.push(p1);
    points.push(p2);
    points.push(Vector4::point(0.0, 0.0, 0.0));
    points.push(Vector4::point(d.x, d.y, d.z));
    Ok(points)
}

/// Whether a groove sits inside a panel: its min/max corners stay within the
/// panel's height and the middle of its growth axis lies inside the panel box.
/// A growth axis not aligned with X, Y or Z is a configuration error.
pub fn groove_in_panel(groove: &GrooveShape, panel: &PanelFrame) -> Result<bool> {
    let points = groove_points(groove)?;
    let m = panel.world_to_local() * groove.pose.local_to_world();
    let local: SmallVec<[Vector4; 4]> = points.iter().map(|p| m * *p).collect();

    let height = panel.dimensions.z;
    let z_ok = |p: &Vector4| p.z >= 0.0 && p.z <= height;
    if !z_ok(&local[2]) || !z_ok(&local[3]) {
        return Ok(false);
    }

    let middle = (local[0] + local[1]) * 0.5;
    Ok(panel.within(&middle, 0.0))
}

/// Tests every (feature, panel) pair and returns the `(feature, panel)`
/// index pairs that hold, sorted. The first configuration error aborts.
pub fn contained_pairs(
    features: &[FeatureShape],
    panels: &[PanelFrame],
    hole_tolerance: f64,
) -> Result<Vec<(usize, usize)>> {
    let per_feature: Vec<Vec<(usize, usize)>> = features
        .par_iter()
        .enumerate()
        .map(|(fi, feature)| -> Result<Vec<(usize, usize)>> {
            let mut hits = Vec::new();
            for (pi, panel) in panels.iter().enumerate() {
                if feature.within(panel, hole_tolerance)? {
                    hits.push((fi, pi));
                }
            }
            Ok(hits)
        })
        .collect::<Result<_>>()?;
    Ok(per_feature.into_iter().flatten().collect())
}

/// Panel edge a point sits on, in panel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelEdge {
    /// `y <= 0`
    Left,
    /// `y >= depth`
    Right,
    /// `x <= 0`
    Back,
    /// `x >= width`
    Front,
}

/// Classifies a world point by the panel edge it lies on. Left/right are
/// checked before back/front.
pub fn classify_edge(panel: &PanelFrame, world_point: &Vector4) -> Option<PanelEdge> {
    let p = panel.world_to_local() * Vector4::point(world_point.x, world_point.y, world_point.z);
    let d = &panel.dimensions;
    let le = |a: f64, b: f64| a < b || (a - b).abs() < EDGE_TOLERANCE;
    let ge = |a: f64, b: f64| a > b || (a - b).abs() < EDGE_TOLERANCE;

    if le(p.y, 0.0) {
        Some(PanelEdge::Left)
    } else if ge(p.y, d.y) {
        Some(PanelEdge::Right)
    } else if le(p.x, 0.0) {
        Some(PanelEdge::Back)
    } else if ge(p.x, d.x) {
        Some(PanelEdge::Front)
    } else {
        None
    }
}
