// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Homogeneous 4-component vector.
//!
//! Points carry `w = 1` and directions `w = 0`. Most operations act on all
//! four components; comparisons and `cross` treat the vector as 3D.

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::{Point3, Vector3};

/// Default tolerance of [`Vector4::approx_eq`].
pub const VECTOR_EPSILON: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Point with `w = 1`.
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Direction with `w = 0`.
    pub const fn direction(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// World up, the default feature direction.
    pub const fn unit_z() -> Self {
        Self::direction(0.0, 0.0, 1.0)
    }

    pub fn from_array(xyz: [f64; 3], w: f64) -> Self {
        Self::new(xyz[0], xyz[1], xyz[2], w)
    }

    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dot(&self, other: &Vector4) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Component-wise product.
    pub fn mul_elementwise(&self, other: &Vector4) -> Vector4 {
        Vector4::new(self.x * other.x, self.y * other.y, self.z * other.z, self.w * other.w)
    }

    /// 3D cross product; `w` is kept from `self`.
    pub fn cross(&self, other: &Vector4) -> Vector4 {
        Vector4::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
            self.w,
        )
    }

    pub fn scale(&self, factor: f64) -> Vector4 {
        Vector4::new(self.x * factor, self.y * factor, self.z * factor, self.w * factor)
    }

    /// Length over all four components.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance between the spatial parts.
    pub fn distance_to(&self, other: &Vector4) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Unit-length copy; a zero vector stays zero.
    pub fn normalize(&self) -> Vector4 {
        let len = self.length();
        if len > 0.0 {
            self.scale(1.0 / len)
        } else {
            *self
        }
    }

    pub fn approx_eq(&self, other: &Vector4, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
            && (self.w - other.w).abs() < epsilon
    }

    /// `self <= other` on x, y, z (and w when `include_w`).
    pub fn le(&self, other: &Vector4, include_w: bool) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.z <= other.z
            && (!include_w || self.w <= other.w)
    }

    /// `self >= other` on x, y, z (and w when `include_w`).
    pub fn ge(&self, other: &Vector4, include_w: bool) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.z >= other.z
            && (!include_w || self.w >= other.w)
    }

    /// Rounds every component to `decimals` places, half away from zero.
    /// Negative zero is folded to zero.
    pub fn round(&self, decimals: u32) -> Vector4 {
        let factor = 10f64.powi(decimals as i32);
        let r = |v: f64| {
            let rounded = (v * factor).round() / factor;
            if rounded == 0.0 {
                0.0
            } else {
                rounded
            }
        };
        Vector4::new(r(self.x), r(self.y), r(self.z), r(self.w))
    }

    pub fn min(&self, other: &Vector4) -> Vector4 {
        Vector4::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
            self.w.min(other.w),
        )
    }

    pub fn max(&self, other: &Vector4) -> Vector4 {
        Vector4::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
            self.w.max(other.w),
        )
    }

    pub fn to_point3(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl Add for Vector4 {
    type Output = Vector4;

    fn add(self, rhs: Vector4) -> Vector4 {
        Vector4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vector4 {
    type Output = Vector4;

    fn sub(self, rhs: Vector4) -> Vector4 {
        Vector4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Vector4 {
    type Output = Vector4;

    fn neg(self) -> Vector4 {
        Vector4::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul<f64> for Vector4 {
    type Output = Vector4;

    fn mul(self, rhs: f64) -> Vector4 {
        self.scale(rhs)
    }
}

impl From<nalgebra::Vector4<f64>> for Vector4 {
    fn from(v: nalgebra::Vector4<f64>) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for nalgebra::Vector4<f64> {
    fn from(v: Vector4) -> Self {
        nalgebra::Vector4::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arithmetic() {
        let a = Vector4::new(1.0, 2.0, 3.0, 1.0);
        let b = Vector4::new(4.0, 5.0, 6.0, 0.0);
        assert_eq!(a + b, Vector4::new(5.0, 7.0, 9.0, 1.0));
        assert_eq!(b - a, Vector4::new(3.0, 3.0, 3.0, -1.0));
        assert_eq!(-a, Vector4::new(-1.0, -2.0, -3.0, -1.0));
        assert_eq!(a * 2.0, Vector4::new(2.0, 4.0, 6.0, 2.0));
        assert_relative_eq!(a.dot(&b), 32.0);
        assert_eq!(a.mul_elementwise(&b), Vector4::new(4.0, 10.0, 18.0, 0.0));
    }

    #[test]
    fn cross_keeps_w() {
        let x = Vector4::point(1.0, 0.0, 0.0);
        let y = Vector4::direction(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn length_and_normalize() {
        let v = Vector4::direction(3.0, 4.0, 0.0);
        assert_relative_eq!(v.length(), 5.0);
        assert_relative_eq!(v.normalize().length(), 1.0);
        assert_eq!(Vector4::zero().normalize(), Vector4::zero());
        let origin = Vector4::point(0.0, 0.0, 0.0);
        assert_relative_eq!(origin.distance_to(&Vector4::point(0.0, 3.0, 4.0)), 5.0);
    }

    #[test]
    fn comparisons_ignore_w_by_default() {
        let a = Vector4::new(0.0, 0.0, 0.0, 5.0);
        let b = Vector4::new(1.0, 1.0, 1.0, 0.0);
        assert!(a.le(&b, false));
        assert!(!a.le(&b, true));
        assert!(b.ge(&a, false));
    }

    #[test]
    fn rounding() {
        let v = Vector4::new(0.9999999, -1e-12, 2.346, -0.5);
        assert_eq!(v.round(0), Vector4::new(1.0, 0.0, 2.0, -1.0));
        assert_eq!(v.round(2).z, 2.35);
        assert!(v.round(0).y.is_sign_positive());
    }

    #[test]
    fn approx_equality() {
        let a = Vector4::point(1.0, 1.0, 1.0);
        assert!(a.approx_eq(&Vector4::point(1.0005, 1.0, 1.0), VECTOR_EPSILON));
        assert!(!a.approx_eq(&Vector4::point(1.01, 1.0, 1.0), VECTOR_EPSILON));
    }
}
