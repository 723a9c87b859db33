//! Lattice and continuous geometry types shared by the world crates.
#![forbid(unsafe_code)]

use core::fmt;

use serde::{Deserialize, Serialize};

/// Continuous point or direction, as reported by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Snap one continuous coordinate to the lattice, rounding half away from zero.
///
/// Returns `None` for NaN, infinities, and values outside the `i32` range.
#[inline]
pub fn snap_axis(v: f64) -> Option<i32> {
    if !v.is_finite() {
        return None;
    }
    let r = v.round();
    if r < i32::MIN as f64 || r > i32::MAX as f64 {
        return None;
    }
    Some(r as i32)
}

/// Integer cell on the unit lattice. Cell centers sit on integer coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LatticePos {
    pub const ORIGIN: LatticePos = LatticePos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Ground and above.
    #[inline]
    pub const fn is_grounded(self) -> bool {
        self.y >= 0
    }

    #[inline]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl fmt::Display for LatticePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six axis-aligned faces of a unit cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Outward unit step across this face.
    #[inline]
    pub const fn step(self) -> LatticePos {
        match self {
            Face::PosX => LatticePos::new(1, 0, 0),
            Face::NegX => LatticePos::new(-1, 0, 0),
            Face::PosY => LatticePos::new(0, 1, 0),
            Face::NegY => LatticePos::new(0, -1, 0),
            Face::PosZ => LatticePos::new(0, 0, 1),
            Face::NegZ => LatticePos::new(0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        self.step().as_vec3()
    }

    /// Parses `+x`, `-y`, `x` (positive), and the like.
    pub fn from_label(s: &str) -> Option<Face> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+x" | "x" => Some(Face::PosX),
            "-x" => Some(Face::NegX),
            "+y" | "y" | "top" => Some(Face::PosY),
            "-y" | "bottom" => Some(Face::NegY),
            "+z" | "z" => Some(Face::PosZ),
            "-z" => Some(Face::NegZ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn face_step_is_unit(face: Face) {
            let s = face.step();
            prop_assert_eq!(s.x.abs() + s.y.abs() + s.z.abs(), 1);
        }

        #[test]
        fn normal_round_trips_through_snap(face: Face) {
            let n = face.normal();
            let s = face.step();
            prop_assert_eq!(snap_axis(n.x as f64), Some(s.x));
            prop_assert_eq!(snap_axis(n.y as f64), Some(s.y));
            prop_assert_eq!(snap_axis(n.z as f64), Some(s.z));
        }

        #[test]
        fn snapping_an_integer_is_identity(v: i32) {
            prop_assert_eq!(snap_axis(v as f64), Some(v));
        }
    }

    #[test]
    fn face_labels() {
        assert_eq!(Face::from_label("+X"), Some(Face::PosX));
        assert_eq!(Face::from_label("top"), Some(Face::PosY));
        assert_eq!(Face::from_label("-z"), Some(Face::NegZ));
        assert_eq!(Face::from_label("w"), None);
    }
}
