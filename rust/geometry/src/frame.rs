// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local/world frame conversions and poses.
//!
//! A frame is a position plus an Euler rotation. Its local→world matrix is
//! `T(position) · R(rotation)`. The world→local matrix is built directly as
//! `R(-angles, reversed order) · T(-position)`: for order `ABC`,
//! `R = R_A·R_B·R_C`, so `R⁻¹ = R_C(-c)·R_B(-b)·R_A(-a)`, which is order `CBA`
//! with negated angles. This holds for all six orders.

use crate::euler::{Euler, EulerOrder};
use crate::matrix::Matrix4;
use crate::vector::Vector4;

pub fn local_to_world_matrix(position: &Vector4, rotation: &Euler) -> Matrix4 {
    Matrix4::from_translation(position) * Matrix4::rotation_from_euler(rotation)
}

pub fn world_to_local_matrix(position: &Vector4, rotation: &Euler) -> Matrix4 {
    Matrix4::rotation_from_euler(&rotation.inverse())
        * Matrix4::translation(-position.x, -position.y, -position.z)
}

/// Position and orientation of a frame relative to some reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Origin, stored as a point (`w = 1`).
    pub position: Vector4,
    pub rotation: Euler,
}

impl Pose {
    pub fn new(position: Vector4, rotation: Euler) -> Self {
        Self {
            position: Vector4::point(position.x, position.y, position.z),
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector4::point(0.0, 0.0, 0.0), Euler::identity())
    }

    /// Pose from export-style arrays (degrees, order `ZXY`).
    pub fn from_arrays(position: [f64; 3], rotation: [f64; 3]) -> Self {
        Self::new(
            Vector4::from_array(position, 1.0),
            Euler::zxy(rotation[0], rotation[1], rotation[2]),
        )
    }

    pub fn local_to_world(&self) -> Matrix4 {
        local_to_world_matrix(&self.position, &self.rotation)
    }

    pub fn world_to_local(&self) -> Matrix4 {
        world_to_local_matrix(&self.position, &self.rotation)
    }

    /// Rotation-only part of [`Pose::local_to_world`].
    pub fn rotation_matrix(&self) -> Matrix4 {
        self.rotation.to_matrix()
    }

    /// Rotation-only part of [`Pose::world_to_local`].
    pub fn inverse_rotation_matrix(&self) -> Matrix4 {
        self.rotation.inverse().to_matrix()
    }

    /// `self ∘ child`: the pose of `child` (given in this frame) in this
    /// frame's reference frame. The result uses `order`.
    pub fn compose(&self, child: &Pose, order: EulerOrder) -> Pose {
        let position = self.local_to_world() * child.position;
        let rotation =
            Euler::from_rotation_matrix(&(self.rotation_matrix() * child.rotation_matrix()), order);
        Pose::new(position, rotation)
    }

    /// This pose expressed in `parent`'s local frame; inverse of [`Pose::compose`].
    pub fn relative_to(&self, parent: &Pose, order: EulerOrder) -> Pose {
        let position = parent.world_to_local() * self.position;
        let rotation =
            parent.inverse_rotation_matrix() * self.rotation_matrix();
        let rotation = Euler::from_rotation_matrix(&rotation, order);
        Pose::new(position, rotation)
    }

    /// Same position and same rotation (compared as matrices, so equivalent
    /// angle sets match).
    pub fn approx_eq(&self, other: &Pose, epsilon: f64) -> bool {
        self.position.approx_eq(&other.position, epsilon)
            && self.rotation.same_rotation(&other.rotation, epsilon)
    }
}
