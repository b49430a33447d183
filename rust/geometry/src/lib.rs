// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Cabinet-Lite Geometry
//!
//! Affine algebra and spatial tests for cabinet models.
//!
//! ## Overview
//!
//! - **Algebra**: [`Vector4`], [`Matrix4`] and [`Euler`] angles in six axis
//!   orders, with closed-form rotations and gimbal-aware decomposition
//! - **Frames**: [`Pose`] plus local↔world matrix builders
//! - **Bounds**: [`Aabb`]
//! - **Outlines**: arc-triplet densification, default rectangles and
//!   ear-clipping triangulation via [earcutr](https://docs.rs/earcutr)
//! - **Containment**: hole and groove placement tests
//!
//! ## Quick Start
//!
//! ```rust
//! use cabinet_lite_geometry::{Pose, Vector4};
//!
//! let pose = Pose::from_arrays([100.0, 0.0, 0.0], [0.0, 0.0, 90.0]);
//! let world = pose.local_to_world() * Vector4::point(1.0, 0.0, 0.0);
//! let back = pose.world_to_local() * world;
//! assert!(back.approx_eq(&Vector4::point(1.0, 0.0, 0.0), 1e-9));
//! ```

pub mod aabb;
pub mod containment;
pub mod error;
pub mod euler;
pub mod frame;
pub mod matrix;
pub mod outline;
pub mod vector;

pub use aabb::{Aabb, DEFAULT_COLLISION_TOLERANCE};
pub use containment::{
    classify_edge, contained_pairs, groove_in_panel, hole_in_panel, FeatureShape, GrooveShape,
    HoleShape, PanelEdge, PanelFrame, DEFAULT_HOLE_TOLERANCE,
};
pub use error::{Error, Result};
pub use euler::{Euler, EulerOrder, GIMBAL_THRESHOLD};
pub use frame::{local_to_world_matrix, world_to_local_matrix, Pose};
pub use matrix::Matrix4;
pub use outline::{
    bounding_rect_xy, densify, rectangle, rotate_about_center, sample_arc, transform_points,
    triangulate, Circle, OutlinePoint, DEFAULT_ARC_SAMPLES,
};
pub use vector::{Vector4, VECTOR_EPSILON};

/// Float equality used when matching dimensions.
pub fn float_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Three-way float comparison with a 1e-3 dead zone.
pub fn compare_float(a: f64, b: f64) -> std::cmp::Ordering {
    if (a - b).abs() < 1e-3 {
        std::cmp::Ordering::Equal
    } else if a < b {
        std::cmp::Ordering::Less
    } else {
        std::cmp::Ordering::Greater
    }
}
