// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Degree-valued Euler angles with an explicit axis order.
//!
//! Order `ABC` composes as `R = R_A · R_B · R_C` (the rightmost rotation is
//! applied to a vector first). Exports use `ZXY` throughout.

use std::fmt;

use crate::matrix::Matrix4;

/// Above this magnitude the critical matrix entry is treated as ±1 and the
/// decomposition falls back to its gimbal-lock branch.
pub const GIMBAL_THRESHOLD: f64 = 0.9999999;

/// The six Tait-Bryan axis orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EulerOrder {
    XYZ,
    YXZ,
    #[default]
    ZXY,
    ZYX,
    YZX,
    XZY,
}

impl EulerOrder {
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::XYZ,
        EulerOrder::YXZ,
        EulerOrder::ZXY,
        EulerOrder::ZYX,
        EulerOrder::YZX,
        EulerOrder::XZY,
    ];

    /// Order whose composition undoes this one when the angles are negated.
    pub fn reversed(&self) -> EulerOrder {
        match self {
            EulerOrder::XYZ => EulerOrder::ZYX,
            EulerOrder::YXZ => EulerOrder::ZXY,
            EulerOrder::ZXY => EulerOrder::YXZ,
            EulerOrder::ZYX => EulerOrder::XYZ,
            EulerOrder::YZX => EulerOrder::XZY,
            EulerOrder::XZY => EulerOrder::YZX,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EulerOrder::XYZ => "XYZ",
            EulerOrder::YXZ => "YXZ",
            EulerOrder::ZXY => "ZXY",
            EulerOrder::ZYX => "ZYX",
            EulerOrder::YZX => "YZX",
            EulerOrder::XZY => "XZY",
        }
    }

    pub fn parse(text: &str) -> Option<EulerOrder> {
        EulerOrder::ALL.into_iter().find(|order| order.as_str() == text)
    }
}

impl fmt::Display for EulerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation as three angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub order: EulerOrder,
}

impl Euler {
    pub const fn new(x: f64, y: f64, z: f64, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Angles in the export order `ZXY`.
    pub const fn zxy(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, EulerOrder::ZXY)
    }

    pub const fn identity() -> Self {
        Self::zxy(0.0, 0.0, 0.0)
    }

    pub fn angles(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Negated angles in the reversed order: the inverse rotation.
    pub fn inverse(&self) -> Euler {
        Euler::new(-self.x, -self.y, -self.z, self.order.reversed())
    }

    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::rotation_from_euler(self)
    }

    /// Decomposes the upper 3x3 block of a pure rotation matrix.
    pub fn from_rotation_matrix(m: &Matrix4, order: EulerOrder) -> Euler {
        let (m11, m12, m13) = (m.get(0, 0), m.get(0, 1), m.get(0, 2));
        let (m21, m22, m23) = (m.get(1, 0), m.get(1, 1), m.get(1, 2));
        let (m31, m32, m33) = (m.get(2, 0), m.get(2, 1), m.get(2, 2));

        let asin = |v: f64| v.clamp(-1.0, 1.0).asin();
        let unlocked = |v: f64| v.abs() < GIMBAL_THRESHOLD;

        let (x, y, z) = match order {
            EulerOrder::XYZ => {
                let y = asin(m13);
                if unlocked(m13) {
                    ((-m23).atan2(m33), y, (-m12).atan2(m11))
                } else {
                    (m32.atan2(m22), y, 0.0)
                }
            }
            EulerOrder::YXZ => {
                let x = asin(-m23);
                if unlocked(m23) {
                    (x, m13.atan2(m33), m21.atan2(m22))
                } else {
                    (x, (-m31).atan2(m11), 0.0)
                }
            }
            EulerOrder::ZXY => {
                let x = asin(m32);
                if unlocked(m32) {
                    (x, (-m31).atan2(m33), (-m12).atan2(m22))
                } else {
                    (x, 0.0, m21.atan2(m11))
                }
            }
            EulerOrder::ZYX => {
                let y = asin(-m31);
                if unlocked(m31) {
                    (m32.atan2(m33), y, m21.atan2(m11))
                } else {
                    (0.0, y, (-m12).atan2(m22))
                }
            }
            EulerOrder::YZX => {
                let z = asin(m21);
                if unlocked(m21) {
                    ((-m23).atan2(m22), (-m31).atan2(m11), z)
                } else {
                    (0.0, m13.atan2(m33), z)
                }
            }
            EulerOrder::XZY => {
                let z = asin(-m12);
                if unlocked(m12) {
                    (m32.atan2(m22), m13.atan2(m11), z)
                } else {
                    ((-m23).atan2(m33), 0.0, z)
                }
            }
        };

        Euler::new(x.to_degrees(), y.to_degrees(), z.to_degrees(), order)
    }

    /// Same rotation, re-expressed in another order.
    pub fn reorder(&self, order: EulerOrder) -> Euler {
        Euler::from_rotation_matrix(&self.to_matrix(), order)
    }

    /// Whether both angle sets describe the same rotation.
    pub fn same_rotation(&self, other: &Euler, epsilon: f64) -> bool {
        self.to_matrix().approx_eq(&other.to_matrix(), epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reversal_is_involutive() {
        for order in EulerOrder::ALL {
            assert_eq!(order.reversed().reversed(), order);
            assert_eq!(EulerOrder::parse(order.as_str()), Some(order));
        }
    }

    #[test]
    fn round_trips_every_order() {
        for order in EulerOrder::ALL {
            let euler = Euler::new(30.0, -20.0, 75.0, order);
            let back = Euler::from_rotation_matrix(&euler.to_matrix(), order);
            assert_relative_eq!(back.x, 30.0, epsilon = 1e-9);
            assert_relative_eq!(back.y, -20.0, epsilon = 1e-9);
            assert_relative_eq!(back.z, 75.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn gimbal_lock_preserves_rotation() {
        // The middle angle at ±90° locks every order.
        let locked = [
            Euler::new(10.0, 90.0, 25.0, EulerOrder::XYZ),
            Euler::new(90.0, 10.0, 25.0, EulerOrder::YXZ),
            Euler::new(-90.0, 10.0, 25.0, EulerOrder::ZXY),
            Euler::new(10.0, -90.0, 25.0, EulerOrder::ZYX),
            Euler::new(10.0, 25.0, 90.0, EulerOrder::YZX),
            Euler::new(10.0, 25.0, -90.0, EulerOrder::XZY),
        ];
        for euler in locked {
            let back = Euler::from_rotation_matrix(&euler.to_matrix(), euler.order);
            assert!(back.same_rotation(&euler, 1e-6), "{:?} -> {:?}", euler, back);
        }
    }

    #[test]
    fn inverse_undoes_rotation() {
        for order in EulerOrder::ALL {
            let euler = Euler::new(12.0, 34.0, -56.0, order);
            let product = euler.to_matrix() * euler.inverse().to_matrix();
            assert!(product.approx_eq(&Matrix4::identity(), 1e-12));
        }
    }

    #[test]
    fn reorder_keeps_rotation() {
        let euler = Euler::zxy(15.0, 40.0, -70.0);
        for order in EulerOrder::ALL {
            assert!(euler.reorder(order).same_rotation(&euler, 1e-9));
        }
    }
}
