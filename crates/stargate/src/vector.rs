//! Template-space block offsets.
//!
//! A [`RelativeVector`] is measured from a template's top-left corner as seen
//! by someone standing in front of the control face: `right` runs along the
//! gate, `depth` runs downward, and `distance` runs outward toward the viewer.
//!
//! The canonical frame for an east-facing gate maps these onto block axes as
//! `(x, y, z) = (distance, -depth, -right)`. Everything else in the crate
//! reaches world space through [`crate::transform::CoordinateTransform`].

use std::fmt;
use std::ops::{Add, Neg, Sub};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RelativeVector {
    pub right: i32,
    pub depth: i32,
    pub distance: i32,
}

impl RelativeVector {
    pub const ZERO: Self = Self::new(0, 0, 0);
    /// One block outward from the control face.
    pub const OUTWARD: Self = Self::new(0, 0, 1);

    pub const fn new(right: i32, depth: i32, distance: i32) -> Self {
        Self {
            right,
            depth,
            distance,
        }
    }

    /// Express this vector in the canonical (east-facing) block frame.
    #[inline]
    pub fn to_canonical(self) -> IVec3 {
        IVec3::new(self.distance, -self.depth, -self.right)
    }

    /// Inverse of [`Self::to_canonical`].
    #[inline]
    pub fn from_canonical(v: IVec3) -> Self {
        Self::new(-v.z, -v.y, v.x)
    }
}

impl Add for RelativeVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.right + rhs.right,
            self.depth + rhs.depth,
            self.distance + rhs.distance,
        )
    }
}

impl Sub for RelativeVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Neg for RelativeVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.right, -self.depth, -self.distance)
    }
}

impl From<RelativeVector> for IVec3 {
    fn from(v: RelativeVector) -> Self {
        v.to_canonical()
    }
}

impl From<IVec3> for RelativeVector {
    fn from(v: IVec3) -> Self {
        Self::from_canonical(v)
    }
}

impl fmt::Display for RelativeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(right = {}, depth = {}, distance = {})",
            self.right, self.depth, self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_negate() {
        let a = RelativeVector::new(1, 2, 3);
        let b = RelativeVector::new(-4, 0, 2);
        assert_eq!(a + b, RelativeVector::new(-3, 2, 5));
        assert_eq!(-a, RelativeVector::new(-1, -2, -3));
        assert_eq!(a - a, RelativeVector::ZERO);
    }

    #[test]
    fn test_canonical_frame_roundtrip() {
        let v = RelativeVector::new(3, 2, -1);
        assert_eq!(RelativeVector::from_canonical(v.to_canonical()), v);
        // Depth grows downward, so it must lower the block's y.
        assert_eq!(RelativeVector::new(0, 4, 0).to_canonical(), IVec3::new(0, -4, 0));
        assert_eq!(RelativeVector::OUTWARD.to_canonical(), IVec3::X);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RelativeVector::new(1, 3, 0).to_string(),
            "(right = 1, depth = 3, distance = 0)"
        );
    }
}
