//! Ownership index for gate blocks.
//!
//! Maps `(role, block position)` to the entity of the gate that claims it.
//! This is the only record of which blocks belong to a gate. Entries are
//! non-owning handles kept in lockstep with gate creation and destruction;
//! the index does not validate claims, callers check for conflicts first.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::template::StructureRole;

#[derive(Resource, Debug, Clone, Default)]
pub struct SpatialIndex {
    claims: HashMap<(StructureRole, IVec3), Entity>,
}

impl SpatialIndex {
    pub fn register(&mut self, role: StructureRole, pos: IVec3, gate: Entity) {
        self.claims.insert((role, pos), gate);
    }

    pub fn unregister(&mut self, role: StructureRole, pos: IVec3) -> Option<Entity> {
        self.claims.remove(&(role, pos))
    }

    /// Remove the claim on `(role, pos)` only if `gate` holds it.
    pub fn release(&mut self, role: StructureRole, pos: IVec3, gate: Entity) -> bool {
        if self.lookup(pos, role) != Some(gate) {
            return false;
        }
        self.claims.remove(&(role, pos));
        true
    }

    pub fn lookup(&self, pos: IVec3, role: StructureRole) -> Option<Entity> {
        self.claims.get(&(role, pos)).copied()
    }

    /// First claim on `pos` among `roles`, checked in the given order.
    pub fn lookup_any(&self, pos: IVec3, roles: &[StructureRole]) -> Option<(Entity, StructureRole)> {
        roles
            .iter()
            .find_map(|&role| self.lookup(pos, role).map(|gate| (gate, role)))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Number of blocks claimed by `gate`.
    pub fn claim_count(&self, gate: Entity) -> usize {
        self.claims.values().filter(|&&owner| owner == gate).count()
    }
}
