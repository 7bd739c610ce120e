use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Horizontal cardinal direction a gate's control face points toward.
///
/// Block coordinates follow the usual voxel convention: +X is east, +Z is
/// south, +Y is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Facing {
    North,
    #[default]
    East,
    South,
    West,
}

/// Horizontal axis, used to orient axis-aligned blocks such as portal panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::East, Facing::South, Facing::West, Facing::North];

    /// Clockwise quarter turns (seen from above) from `East` to this facing.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Facing::East => 0,
            Facing::South => 1,
            Facing::West => 2,
            Facing::North => 3,
        }
    }

    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Facing::East,
            1 => Facing::South,
            2 => Facing::West,
            _ => Facing::North,
        }
    }

    pub fn opposite(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 2)
    }

    /// Unit block offset one step in this direction.
    pub fn offset(self) -> IVec3 {
        match self {
            Facing::North => IVec3::new(0, 0, -1),
            Facing::East => IVec3::new(1, 0, 0),
            Facing::South => IVec3::new(0, 0, 1),
            Facing::West => IVec3::new(-1, 0, 0),
        }
    }

    /// The axis this facing points along.
    pub fn axis(self) -> Axis {
        match self {
            Facing::East | Facing::West => Axis::X,
            Facing::North | Facing::South => Axis::Z,
        }
    }
}

impl Axis {
    pub fn perpendicular(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}
