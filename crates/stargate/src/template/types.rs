use serde::{Deserialize, Serialize};

/// The function a template position serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureRole {
    /// Blocks the sign and button attach to.
    Control,
    /// Rigid border blocks.
    Frame,
    /// Passable blocks a traveller steps into.
    Entrance,
    /// Blocks swapped between the open and closed materials.
    Iris,
}

impl StructureRole {
    pub const ALL: [StructureRole; 4] = [
        StructureRole::Control,
        StructureRole::Frame,
        StructureRole::Entrance,
        StructureRole::Iris,
    ];

    /// Roles that make up the physical body of a gate. Breaking one of these
    /// breaks the gate.
    pub const STRUCTURAL: [StructureRole; 2] = [StructureRole::Control, StructureRole::Frame];

    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            StructureRole::Control => 0,
            StructureRole::Frame => 1,
            StructureRole::Entrance => 2,
            StructureRole::Iris => 3,
        }
    }
}

/// Declared purpose of a single control position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlRole {
    /// Either the sign or the button, decided by where the player builds.
    #[default]
    Any,
    /// Only ever carries the sign (and is therefore the match anchor).
    Sign,
    /// Only ever carries the button.
    Button,
}

impl ControlRole {
    pub fn can_hold_sign(self) -> bool {
        matches!(self, ControlRole::Any | ControlRole::Sign)
    }
}
