// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes.

use crate::matrix::Matrix4;
use crate::vector::Vector4;

/// Default per-axis tolerance of [`Aabb::collides`].
pub const DEFAULT_COLLISION_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector4,
    pub max: Vector4,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    pub fn new(min: Vector4, max: Vector4) -> Self {
        Self {
            min: Vector4::point(min.x, min.y, min.z),
            max: Vector4::point(max.x, max.y, max.z),
        }
    }

    /// Inverted infinite box; the identity of [`Aabb::union`].
    pub fn empty() -> Self {
        Self {
            min: Vector4::point(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Vector4::point(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Box spanning `origin .. origin + dimensions`.
    pub fn from_dimensions(origin: &Vector4, dimensions: &Vector4) -> Self {
        let far = Vector4::point(
            origin.x + dimensions.x,
            origin.y + dimensions.y,
            origin.z + dimensions.z,
        );
        Self::new(origin.min(&far), origin.max(&far))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vector4 {
        Vector4::point(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn size(&self) -> Vector4 {
        Vector4::direction(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(&other.min), self.max.max(&other.max))
    }

    pub fn expand_to_point(&mut self, p: &Vector4) {
        self.min = Vector4::point(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Vector4::point(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    /// Inclusive on every face.
    pub fn contains_point(&self, p: &Vector4) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Overlap test that treats boxes within `tolerance` per axis as touching.
    pub fn collides(&self, other: &Aabb, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && self.max.x >= other.min.x - tolerance
            && self.min.y <= other.max.y + tolerance
            && self.max.y >= other.min.y - tolerance
            && self.min.z <= other.max.z + tolerance
            && self.max.z >= other.min.z - tolerance
    }

    pub fn vertices(&self) -> [Vector4; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vector4::point(a.x, a.y, a.z),
            Vector4::point(b.x, a.y, a.z),
            Vector4::point(a.x, b.y, a.z),
            Vector4::point(b.x, b.y, a.z),
            Vector4::point(a.x, a.y, b.z),
            Vector4::point(b.x, a.y, b.z),
            Vector4::point(a.x, b.y, b.z),
            Vector4::point(b.x, b.y, b.z),
        ]
    }

    /// Box around all 8 transformed corners. Conservative under rotation.
    pub fn transform(&self, m: &Matrix4) -> Aabb {
        let mut out = Aabb::empty();
        for corner in self.vertices() {
            out.expand_to_point(&m.transform(&corner));
        }
        out
    }
}
