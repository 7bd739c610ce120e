use std::collections::{HashMap, HashSet};

use crate::material::Material;
use crate::vector::RelativeVector;

use super::types::{ControlRole, StructureRole};

/// Immutable description of a portal type, shared by every gate built from it.
///
/// Built once by [`GateTemplate::from_definition`] and never mutated; gates
/// hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct GateTemplate {
    pub(crate) name: String,
    /// Positions per role, indexed by [`StructureRole::slot`], in layout order.
    pub(crate) positions: [Vec<RelativeVector>; 4],
    /// Parallel to the control positions.
    pub(crate) control_roles: Vec<ControlRole>,
    /// Materials accepted at each frame and control position.
    pub(crate) accepted: HashMap<RelativeVector, Vec<Material>>,
    pub(crate) exit: RelativeVector,
    pub(crate) open: Material,
    pub(crate) closed: Material,
    pub(crate) triggers: HashSet<Material>,
}

impl GateTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self, role: StructureRole) -> &[RelativeVector] {
        &self.positions[role.slot()]
    }

    /// Control positions in declaration order. The order decides which
    /// position becomes the button, so it is part of the template's identity.
    pub fn control_positions(&self) -> &[RelativeVector] {
        self.positions(StructureRole::Control)
    }

    /// Control positions paired with their declared roles.
    pub fn controls(&self) -> impl Iterator<Item = (RelativeVector, ControlRole)> + '_ {
        self.control_positions()
            .iter()
            .copied()
            .zip(self.control_roles.iter().copied())
    }

    pub fn exit(&self) -> RelativeVector {
        self.exit
    }

    /// Materials found behind a control block that can start this template.
    pub fn trigger_materials(&self) -> &HashSet<Material> {
        &self.triggers
    }

    pub fn open_material(&self) -> Material {
        self.open
    }

    pub fn closed_material(&self) -> Material {
        self.closed
    }

    pub fn iris_material(&self, open: bool) -> Material {
        if open {
            self.open
        } else {
            self.closed
        }
    }

    /// Materials that satisfy a frame or control position, if `v` is one.
    pub fn accepted_materials(&self, v: RelativeVector) -> Option<&[Material]> {
        self.accepted.get(&v).map(Vec::as_slice)
    }

    /// Whether `material` satisfies the structural requirement of `role` at `v`.
    ///
    /// Frame and control blocks must be one of their accepted materials.
    /// Entrances must be passable or already hold the closed iris material.
    /// The iris places its own blocks and accepts anything.
    pub fn accepts(&self, role: StructureRole, v: RelativeVector, material: Material) -> bool {
        match role {
            StructureRole::Control | StructureRole::Frame => self
                .accepted_materials(v)
                .is_some_and(|accepted| accepted.contains(&material)),
            StructureRole::Entrance => material.is_passable() || material == self.closed,
            StructureRole::Iris => true,
        }
    }

    /// Which role `v` plays in this template. Structural roles win over the
    /// passable ones when a position appears in several.
    pub fn role_of(&self, v: RelativeVector) -> Option<StructureRole> {
        StructureRole::ALL
            .into_iter()
            .find(|role| self.positions(*role).contains(&v))
    }
}
