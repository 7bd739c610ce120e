use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::facing::{Axis, Facing};
use crate::transform::CoordinateTransform;

/// Block kinds the gate engine needs to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Material {
    #[default]
    Air,
    CaveAir,
    VoidAir,
    Water,
    Lava,
    Stone,
    Cobblestone,
    Obsidian,
    CryingObsidian,
    EndStone,
    Glowstone,
    Sandstone,
    OakPlanks,
    NetherPortal,
    EndGateway,
    EndPortal,
    StoneButton,
    OakButton,
    DeadTubeCoralWallFan,
    OakWallSign,
    Torch,
}

impl Material {
    pub fn is_air(self) -> bool {
        matches!(self, Material::Air | Material::CaveAir | Material::VoidAir)
    }

    /// Blocks an entity can walk or swim through.
    pub fn is_passable(self) -> bool {
        self.is_air()
            || matches!(
                self,
                Material::Water
                    | Material::Lava
                    | Material::NetherPortal
                    | Material::EndGateway
                    | Material::EndPortal
                    | Material::Torch
            )
    }

    /// Full, rigid blocks that can carry a frame.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            Material::Stone
                | Material::Cobblestone
                | Material::Obsidian
                | Material::CryingObsidian
                | Material::EndStone
                | Material::Glowstone
                | Material::Sandstone
                | Material::OakPlanks
        )
    }

    pub fn is_button(self) -> bool {
        matches!(
            self,
            Material::StoneButton | Material::OakButton | Material::DeadTubeCoralWallFan
        )
    }
}

/// Orientation data attached to a block when it is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Directional blocks (buttons, wall signs) point this way.
    Facing(Facing),
    /// Axis-aligned blocks (portal panes) lie along this axis.
    Axis(Axis),
}

/// How a material must be oriented when a gate places it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationRule {
    #[default]
    None,
    /// Align with the horizontal axis of the gate plane.
    IrisAxis,
    /// Point along the gate's facing.
    Facing,
}

/// Placement capabilities of a single material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialPolicy {
    pub orientation: OrientationRule,
    /// The block simulates itself (e.g. an end gateway spawning its own exit
    /// portal) and must be pinned to a neutral state right after placement.
    pub neutralize: bool,
}

impl MaterialPolicy {
    pub fn orientation_for(&self, transform: &CoordinateTransform) -> Option<Orientation> {
        match self.orientation {
            OrientationRule::None => None,
            OrientationRule::IrisAxis => Some(Orientation::Axis(transform.iris_axis())),
            OrientationRule::Facing => Some(Orientation::Facing(transform.facing())),
        }
    }
}

/// Capability table consulted whenever a gate materializes blocks.
///
/// Materials without an entry get [`MaterialPolicy::default`]: no orientation
/// and no follow-up mutation.
#[derive(Resource, Debug, Clone)]
pub struct MaterialPolicies {
    policies: HashMap<Material, MaterialPolicy>,
}

impl Default for MaterialPolicies {
    fn default() -> Self {
        let mut policies = HashMap::new();
        policies.insert(
            Material::NetherPortal,
            MaterialPolicy {
                orientation: OrientationRule::IrisAxis,
                neutralize: false,
            },
        );
        policies.insert(
            Material::EndGateway,
            MaterialPolicy {
                orientation: OrientationRule::None,
                neutralize: true,
            },
        );
        for button in [
            Material::StoneButton,
            Material::OakButton,
            Material::DeadTubeCoralWallFan,
            Material::OakWallSign,
        ] {
            policies.insert(
                button,
                MaterialPolicy {
                    orientation: OrientationRule::Facing,
                    neutralize: false,
                },
            );
        }
        Self { policies }
    }
}

impl MaterialPolicies {
    pub fn get(&self, material: Material) -> MaterialPolicy {
        self.policies.get(&material).copied().unwrap_or_default()
    }

    pub fn set(&mut self, material: Material, policy: MaterialPolicy) {
        self.policies.insert(material, policy);
    }
}
