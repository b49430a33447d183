// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Direction strings used by hole and groove attributes.

/// Signed axis direction of a hole (`YSFX` attribute): `X+`, `X-`, ... `Z-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    XPos,
    XNeg,
    YPos,
    YNeg,
    ZPos,
    ZNeg,
}

impl AxisDirection {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "X+" => Some(AxisDirection::XPos),
            "X-" => Some(AxisDirection::XNeg),
            "Y+" => Some(AxisDirection::YPos),
            "Y-" => Some(AxisDirection::YNeg),
            "Z+" => Some(AxisDirection::ZPos),
            "Z-" => Some(AxisDirection::ZNeg),
            _ => None,
        }
    }

    pub fn unit(&self) -> [f64; 3] {
        match self {
            AxisDirection::XPos => [1.0, 0.0, 0.0],
            AxisDirection::XNeg => [-1.0, 0.0, 0.0],
            AxisDirection::YPos => [0.0, 1.0, 0.0],
            AxisDirection::YNeg => [0.0, -1.0, 0.0],
            AxisDirection::ZPos => [0.0, 0.0, 1.0],
            AxisDirection::ZNeg => [0.0, 0.0, -1.0],
        }
    }
}

/// Unsigned growth axis of a groove (`LengthAxis` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn unit(&self) -> [f64; 3] {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_directions() {
        assert_eq!(AxisDirection::parse("X-").map(|d| d.unit()), Some([-1.0, 0.0, 0.0]));
        assert_eq!(AxisDirection::parse(" Z+ ").map(|d| d.unit()), Some([0.0, 0.0, 1.0]));
        assert_eq!(AxisDirection::parse("X"), None);
    }

    #[test]
    fn parses_axes() {
        assert_eq!(Axis::parse("Y").map(|a| a.unit()), Some([0.0, 1.0, 0.0]));
        assert_eq!(Axis::parse("y"), None);
    }
}
