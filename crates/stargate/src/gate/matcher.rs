//! Binds a block structure to a template.
//!
//! For every candidate template, both mirror states and every control
//! position that may hold the sign, the matcher assumes the anchor is that
//! control block, derives the template origin, and checks each template
//! position against the world. The search order is fixed (declaration order
//! of templates, unmirrored before mirrored, declaration order of controls),
//! so the first fit always wins and repeated calls are deterministic.
//!
//! Symmetric templates are tried under both mirror states even though the
//! second pass can only repeat the first.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

use crate::facing::Facing;
use crate::spatial_index::SpatialIndex;
use crate::template::{ControlRole, GateTemplate, StructureRole};
use crate::transform::CoordinateTransform;
use crate::vector::RelativeVector;
use crate::world::BlockSource;

use super::instance::GateInstance;

/// Roles whose blocks may not overlap an existing gate.
const EXCLUSIVE_ROLES: [StructureRole; 2] = [StructureRole::Frame, StructureRole::Iris];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Nothing around the anchor fits any candidate template.
    NoFormatFound,
    /// A template fits, but `pos` already belongs to `owner`. Decisive: the
    /// search stops here.
    GateConflict {
        template: String,
        pos: IVec3,
        owner: Entity,
    },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NoFormatFound => write!(f, "no gate template matches this structure"),
            MatchError::GateConflict {
                template,
                pos,
                owner,
            } => write!(
                f,
                "structure matches '{template}' but block {pos} belongs to gate {owner}"
            ),
        }
    }
}

impl std::error::Error for MatchError {}

fn structure_matches<S: BlockSource + ?Sized>(
    template: &GateTemplate,
    transform: &CoordinateTransform,
    origin: IVec3,
    world: &S,
) -> bool {
    StructureRole::ALL.into_iter().all(|role| {
        template.positions(role).iter().all(|&v| {
            let pos = origin + transform.inverse_operation(v.to_canonical());
            template.accepts(role, v, world.material_at(pos))
        })
    })
}

fn find_conflict(
    template: &GateTemplate,
    transform: &CoordinateTransform,
    origin: IVec3,
    index: &SpatialIndex,
) -> Option<(IVec3, Entity)> {
    let location = |v: RelativeVector| origin + transform.inverse_operation(v.to_canonical());
    let exclusive = EXCLUSIVE_ROLES.into_iter().find_map(|role| {
        template.positions(role).iter().find_map(|&v| {
            let pos = location(v);
            index
                .lookup_any(pos, &StructureRole::ALL)
                .map(|(owner, _)| (pos, owner))
        })
    });
    // A control block belongs to at most one gate.
    exclusive.or_else(|| {
        template.control_positions().iter().find_map(|&v| {
            let pos = location(v);
            index
                .lookup(pos, StructureRole::Control)
                .map(|owner| (pos, owner))
        })
    })
}

/// The button goes on the first other control declared as a button, or
/// failing that, the first other control with no declared role.
fn select_button(template: &GateTemplate, sign_pos: RelativeVector) -> Option<RelativeVector> {
    let others = || template.controls().filter(move |&(v, _)| v != sign_pos);
    others()
        .find(|&(_, role)| role == ControlRole::Button)
        .or_else(|| others().find(|&(_, role)| role == ControlRole::Any))
        .map(|(v, _)| v)
}

/// Find the first template that fits the structure anchored at `anchor`.
pub fn match_gate<S: BlockSource + ?Sized>(
    anchor: IVec3,
    facing: Facing,
    candidates: &[Arc<GateTemplate>],
    world: &S,
    index: &SpatialIndex,
) -> Result<GateInstance, MatchError> {
    for template in candidates {
        for mirror in [false, true] {
            let transform = CoordinateTransform::new(facing, mirror);
            for (control, role) in template.controls() {
                if !role.can_hold_sign() {
                    continue;
                }
                let origin = anchor - transform.inverse_operation(control.to_canonical());
                if !structure_matches(template, &transform, origin, world) {
                    continue;
                }
                debug!(
                    "Gate '{}' fits at {} (mirror: {}, control {})",
                    template.name(),
                    anchor,
                    mirror,
                    control
                );

                if let Some((pos, owner)) = find_conflict(template, &transform, origin, index) {
                    return Err(MatchError::GateConflict {
                        template: template.name().to_string(),
                        pos,
                        owner,
                    });
                }

                let button = select_button(template, control);
                return Ok(GateInstance::new(
                    Arc::clone(template),
                    transform,
                    origin,
                    control,
                    button,
                ));
            }
        }
    }
    debug!(
        "No gate template fits at {} facing {:?} ({} candidates)",
        anchor,
        facing,
        candidates.len()
    );
    Err(MatchError::NoFormatFound)
}
