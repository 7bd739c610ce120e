//! Gate events, systems, and Bevy plugin registration.

use bevy::prelude::*;

use crate::config::GateConfig;
use crate::facing::Facing;
use crate::material::MaterialPolicies;
use crate::mutation::{apply_block_mutations, BlockMutationQueue};
use crate::spatial_index::SpatialIndex;
use crate::template::{GateDefinition, StructureRole, TemplateRegistry};
use crate::world::{BlockSource, BlockWorld};

use super::instance::GateInstance;
use super::matcher::{match_gate, MatchError};

// =============================================================================
// Events
// =============================================================================

/// Request to build a gate whose sign-side control block sits at `anchor`.
#[derive(Event, Debug, Clone)]
pub struct CreateGate {
    pub anchor: IVec3,
    pub facing: Facing,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct OpenGate(pub Entity);

#[derive(Event, Debug, Clone, Copy)]
pub struct CloseGate(pub Entity);

#[derive(Event, Debug, Clone, Copy)]
pub struct DestroyGate(pub Entity);

/// A block changed in the world (broken, replaced, burnt, ...).
#[derive(Event, Debug, Clone, Copy)]
pub struct BlockChanged {
    pub pos: IVec3,
}

/// Replace the loaded templates with a new set of definitions.
#[derive(Event, Debug, Clone)]
pub struct ReloadTemplates(pub Vec<GateDefinition>);

#[derive(Event, Debug, Clone)]
pub struct GateCreated {
    pub entity: Entity,
    pub template: String,
}

#[derive(Event, Debug, Clone)]
pub struct GateCreationFailed {
    pub anchor: IVec3,
    pub error: MatchError,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct GateDestroyed {
    pub entity: Entity,
}

/// A frame or control block of a gate no longer holds an accepted material.
#[derive(Event, Debug, Clone, Copy)]
pub struct GateStructureBroken {
    pub entity: Entity,
    pub pos: IVec3,
    pub role: StructureRole,
}

// =============================================================================
// System sets
// =============================================================================

/// Gate phases inside `FixedUpdate`, chained `Match → Lifecycle → Flush`.
///
/// * **Match** – template reloads, gate creation, structure break detection.
/// * **Lifecycle** – open, close, and destroy requests.
/// * **Flush** – applies the deferred block mutations queued above.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GateSet {
    Match,
    Lifecycle,
    Flush,
}

// =============================================================================
// Systems
// =============================================================================

fn handle_reload_templates(
    mut events: EventReader<ReloadTemplates>,
    mut registry: ResMut<TemplateRegistry>,
) {
    for ev in events.read() {
        let report = registry.reload(&ev.0);
        if !report.is_clean() {
            warn!(
                "Template reload rejected {} definition(s)",
                report.rejected.len()
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_create_gate(
    mut commands: Commands,
    mut events: EventReader<CreateGate>,
    registry: Res<TemplateRegistry>,
    world: Res<BlockWorld>,
    mut index: ResMut<SpatialIndex>,
    mut queue: ResMut<BlockMutationQueue>,
    config: Res<GateConfig>,
    policies: Res<MaterialPolicies>,
    mut created: EventWriter<GateCreated>,
    mut failed: EventWriter<GateCreationFailed>,
) {
    let templates = registry.snapshot();
    for ev in events.read() {
        let trigger = world.material_at(ev.anchor);
        let candidates = templates.candidates_for(trigger);
        match match_gate(ev.anchor, ev.facing, candidates, &*world, &index) {
            Ok(gate) => {
                let entity = commands.spawn_empty().id();
                gate.register(entity, &mut index);
                if config.draw_button_on_create {
                    gate.draw_button(&mut queue, &config, &policies);
                }
                let template = gate.template().name().to_string();
                info!(
                    "Gate '{}' created at {} facing {:?} (entity {})",
                    template,
                    gate.origin(),
                    gate.facing(),
                    entity
                );
                commands.entity(entity).insert(gate);
                created.send(GateCreated { entity, template });
            }
            Err(error) => {
                if let MatchError::GateConflict { .. } = &error {
                    info!("Gate creation at {} refused: {}", ev.anchor, error);
                }
                failed.send(GateCreationFailed {
                    anchor: ev.anchor,
                    error,
                });
            }
        }
    }
}

fn detect_structure_breaks(
    mut events: EventReader<BlockChanged>,
    index: Res<SpatialIndex>,
    world: Res<BlockWorld>,
    config: Res<GateConfig>,
    gates: Query<&GateInstance>,
    mut broken: EventWriter<GateStructureBroken>,
    mut destroy: EventWriter<DestroyGate>,
) {
    for ev in events.read() {
        let Some((entity, role)) = index.lookup_any(ev.pos, &StructureRole::STRUCTURAL) else {
            continue;
        };
        let Ok(gate) = gates.get(entity) else {
            continue;
        };
        let v = gate.relative_vector(ev.pos);
        if gate
            .template()
            .accepts(role, v, world.material_at(ev.pos))
        {
            continue;
        }
        debug!("{:?} block {} of gate {} broken", role, ev.pos, entity);
        broken.send(GateStructureBroken {
            entity,
            pos: ev.pos,
            role,
        });
        if config.destroy_on_frame_break {
            destroy.send(DestroyGate(entity));
        }
    }
}

fn handle_open_gate(
    mut events: EventReader<OpenGate>,
    mut gates: Query<&mut GateInstance>,
    mut queue: ResMut<BlockMutationQueue>,
    policies: Res<MaterialPolicies>,
) {
    for OpenGate(entity) in events.read() {
        match gates.get_mut(*entity) {
            Ok(mut gate) => gate.open(&mut queue, &policies),
            Err(_) => warn!("OpenGate: {} is not a gate", entity),
        }
    }
}

fn handle_close_gate(
    mut events: EventReader<CloseGate>,
    mut gates: Query<&mut GateInstance>,
    mut queue: ResMut<BlockMutationQueue>,
    policies: Res<MaterialPolicies>,
) {
    for CloseGate(entity) in events.read() {
        match gates.get_mut(*entity) {
            Ok(mut gate) => gate.close(&mut queue, &policies),
            Err(_) => warn!("CloseGate: {} is not a gate", entity),
        }
    }
}

fn handle_destroy_gate(
    mut commands: Commands,
    mut events: EventReader<DestroyGate>,
    mut gates: Query<&mut GateInstance>,
    mut index: ResMut<SpatialIndex>,
    mut destroyed: EventWriter<GateDestroyed>,
) {
    for DestroyGate(entity) in events.read() {
        let Ok(mut gate) = gates.get_mut(*entity) else {
            continue;
        };
        if gate.is_destroyed() {
            continue;
        }
        gate.destroy(*entity, &mut index);
        commands.entity(*entity).despawn();
        info!(
            "Gate '{}' at {} destroyed",
            gate.template().name(),
            gate.origin()
        );
        destroyed.send(GateDestroyed { entity: *entity });
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct StargatePlugin;

impl Plugin for StargatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TemplateRegistry>()
            .init_resource::<SpatialIndex>()
            .init_resource::<BlockMutationQueue>()
            .init_resource::<BlockWorld>()
            .init_resource::<GateConfig>()
            .init_resource::<MaterialPolicies>()
            .add_event::<CreateGate>()
            .add_event::<OpenGate>()
            .add_event::<CloseGate>()
            .add_event::<DestroyGate>()
            .add_event::<BlockChanged>()
            .add_event::<ReloadTemplates>()
            .add_event::<GateCreated>()
            .add_event::<GateCreationFailed>()
            .add_event::<GateDestroyed>()
            .add_event::<GateStructureBroken>()
            .configure_sets(
                FixedUpdate,
                (GateSet::Match, GateSet::Lifecycle, GateSet::Flush).chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    handle_reload_templates,
                    handle_create_gate,
                    detect_structure_breaks,
                )
                    .chain()
                    .in_set(GateSet::Match),
            )
            .add_systems(
                FixedUpdate,
                (handle_open_gate, handle_close_gate, handle_destroy_gate)
                    .chain()
                    .in_set(GateSet::Lifecycle),
            )
            .add_systems(FixedUpdate, apply_block_mutations.in_set(GateSet::Flush));
    }
}
