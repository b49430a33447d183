// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 4x4 affine matrices.
//!
//! Thin wrapper over `nalgebra::Matrix4<f64>` with the constructors the
//! pipeline needs: axis rotations in degrees, per-order Euler rotations and
//! translations. Vectors are columns; `a * b` applies `b` first.

use std::ops::Mul;

use crate::euler::{Euler, EulerOrder};
use crate::vector::Vector4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4(nalgebra::Matrix4<f64>);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    pub fn identity() -> Self {
        Self(nalgebra::Matrix4::identity())
    }

    pub fn zeros() -> Self {
        Self(nalgebra::Matrix4::zeros())
    }

    /// Builds a matrix from row-major rows.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(nalgebra::Matrix4::from_fn(|r, c| rows[r][c]))
    }

    pub fn from_nalgebra(m: nalgebra::Matrix4<f64>) -> Self {
        Self(m)
    }

    pub fn as_nalgebra(&self) -> &nalgebra::Matrix4<f64> {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    pub fn transpose(&self) -> Matrix4 {
        Self(self.0.transpose())
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Closed-form inverse; `None` when the determinant is zero.
    pub fn try_inverse(&self) -> Option<Matrix4> {
        self.0.try_inverse().map(Self)
    }

    /// Inverse, or the all-zero matrix when singular. Callers that can meet a
    /// singular matrix must check [`Matrix4::is_zero`] on the result.
    pub fn inverse_or_zero(&self) -> Matrix4 {
        self.try_inverse().unwrap_or_else(Matrix4::zeros)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn approx_eq(&self, other: &Matrix4, epsilon: f64) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// `M · v` on all four components.
    pub fn transform(&self, v: &Vector4) -> Vector4 {
        let out = self.0 * nalgebra::Vector4::new(v.x, v.y, v.z, v.w);
        Vector4::from(out)
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4 {
        Self(nalgebra::Matrix4::new_translation(&nalgebra::Vector3::new(x, y, z)))
    }

    pub fn from_translation(v: &Vector4) -> Matrix4 {
        Self::translation(v.x, v.y, v.z)
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4 {
        Self(nalgebra::Matrix4::new_nonuniform_scaling(&nalgebra::Vector3::new(x, y, z)))
    }

    /// Translation column as a point.
    pub fn translation_part(&self) -> Vector4 {
        Vector4::point(self.get(0, 3), self.get(1, 3), self.get(2, 3))
    }

    /// Upper 3x3 block with the translation dropped.
    pub fn rotation_part(&self) -> Matrix4 {
        let mut m = self.0;
        m[(0, 3)] = 0.0;
        m[(1, 3)] = 0.0;
        m[(2, 3)] = 0.0;
        Self(m)
    }

    pub fn rotation_x(degrees: f64) -> Matrix4 {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(degrees: f64) -> Matrix4 {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(degrees: f64) -> Matrix4 {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Z axis through the planar point `(cx, cy)`.
    pub fn rotation_z_about(degrees: f64, cx: f64, cy: f64) -> Matrix4 {
        Self::translation(cx, cy, 0.0)
            * Self::rotation_z(degrees)
            * Self::translation(-cx, -cy, 0.0)
    }

    /// Closed-form rotation for each axis order.
    pub fn rotation_from_euler(euler: &Euler) -> Matrix4 {
        let (b, a) = euler.x.to_radians().sin_cos();
        let (d, c) = euler.y.to_radians().sin_cos();
        let (f, e) = euler.z.to_radians().sin_cos();

        let r = match euler.order {
            EulerOrder::XYZ => {
                let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);
                [
                    [c * e, -c * f, d],
                    [af + be * d, ae - bf * d, -b * c],
                    [bf - ae * d, be + af * d, a * c],
                ]
            }
            EulerOrder::YXZ => {
                let (ce, cf, de, df) = (c * e, c * f, d * e, d * f);
                [
                    [ce + df * b, de * b - cf, a * d],
                    [a * f, a * e, -b],
                    [cf * b - de, df + ce * b, a * c],
                ]
            }
            EulerOrder::ZXY => {
                let (ce, cf, de, df) = (c * e, c * f, d * e, d * f);
                [
                    [ce - df * b, -a * f, de + cf * b],
                    [cf + de * b, a * e, df - ce * b],
                    [-a * d, b, a * c],
                ]
            }
            EulerOrder::ZYX => {
                let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);
                [
                    [c * e, be * d - af, ae * d + bf],
                    [c * f, bf * d + ae, af * d - be],
                    [-d, b * c, a * c],
                ]
            }
            EulerOrder::YZX => {
                let (ac, ad, bc, bd) = (a * c, a * d, b * c, b * d);
                [
                    [c * e, bd - ac * f, bc * f + ad],
                    [f, a * e, -b * e],
                    [-d * e, ad * f + bc, ac - bd * f],
                ]
            }
            EulerOrder::XZY => {
                let (ac, ad, bc, bd) = (a * c, a * d, b * c, b * d);
                [
                    [c * e, -f, d * e],
                    [ac * f + bd, a * e, ad * f - bc],
                    [bc * f - ad, b * e, bd * f + ac],
                ]
            }
        };

        Self::from_rows([
            [r[0][0], r[0][1], r[0][2], 0.0],
            [r[1][0], r[1][1], r[1][2], 0.0],
            [r[2][0], r[2][1], r[2][2], 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        Matrix4(self.0 * rhs.0)
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform(&rhs)
    }
}
