//! Exact integer transforms between template space and world space.
//!
//! A [`CoordinateTransform`] is an element of the dihedral group acting on the
//! horizontal plane: a rotation by a multiple of 90° about the vertical axis,
//! optionally composed with a reflection of the template's `right` axis.
//! Both directions are closed-form integer maps, so round trips are exact.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::facing::{Axis, Facing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateTransform {
    facing: Facing,
    mirror: bool,
}

/// Rotate `v` clockwise (seen from above) by `turns` quarter turns.
/// One quarter turn carries east (+X) onto south (+Z).
#[inline]
fn rotate_quarter_turns(v: IVec3, turns: u8) -> IVec3 {
    match turns % 4 {
        0 => v,
        1 => IVec3::new(-v.z, v.y, v.x),
        2 => IVec3::new(-v.x, v.y, -v.z),
        _ => IVec3::new(v.z, v.y, -v.x),
    }
}

/// Reflect the canonical frame's `right` axis.
#[inline]
fn reflect_right(v: IVec3) -> IVec3 {
    IVec3::new(v.x, v.y, -v.z)
}

impl CoordinateTransform {
    pub fn new(facing: Facing, mirror: bool) -> Self {
        Self { facing, mirror }
    }

    /// World offset → canonical template frame.
    ///
    /// Rotates `facing` back onto east, then undoes the mirror if one is set.
    pub fn operation(&self, v: IVec3) -> IVec3 {
        let rotated = rotate_quarter_turns(v, 4 - self.facing.quarter_turns());
        if self.mirror {
            reflect_right(rotated)
        } else {
            rotated
        }
    }

    /// Canonical template frame → world offset. Exact inverse of
    /// [`Self::operation`]: mirror first, then rotate east onto `facing`.
    pub fn inverse_operation(&self, v: IVec3) -> IVec3 {
        let reflected = if self.mirror { reflect_right(v) } else { v };
        rotate_quarter_turns(reflected, self.facing.quarter_turns())
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror
    }

    /// The horizontal axis spanned by the gate plane.
    pub fn iris_axis(&self) -> Axis {
        self.facing.axis().perpendicular()
    }
}
