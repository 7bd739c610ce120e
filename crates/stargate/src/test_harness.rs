//! # TestWorld: headless harness for gate integration tests
//!
//! Wraps a `bevy::app::App` running `MinimalPlugins` + [`StargatePlugin`] and
//! offers helpers to stamp gate structures into the reference
//! [`BlockWorld`], send requests, and step the `FixedUpdate` schedule.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::config::GateConfig;
use crate::facing::Facing;
use crate::gate::{CreateGate, GateCreated, GateCreationFailed, GateInstance};
use crate::material::Material;
use crate::mutation::BlockMutationQueue;
use crate::template::{GateDefinition, GateTemplate, StructureRole, TemplateRegistry};
use crate::transform::CoordinateTransform;
use crate::world::{BlockSource, BlockState, BlockWorld};
use crate::StargatePlugin;

// -----------------------------------------------------------------------
// Fixture definitions
// -----------------------------------------------------------------------

fn definition(
    name: &str,
    layout: &[&str],
    symbols: &[(char, &[Material])],
    open: Material,
    closed: Material,
) -> GateDefinition {
    GateDefinition {
        name: name.to_string(),
        layout: layout.iter().map(|row| row.to_string()).collect(),
        symbols: symbols
            .iter()
            .map(|(symbol, materials)| (*symbol, materials.to_vec()))
            .collect::<BTreeMap<_, _>>(),
        open,
        closed,
        control_roles: None,
    }
}

/// 4x4 obsidian rectangle with controls at `(0,2,0)` and `(3,2,0)`.
pub fn small_gate_definition(name: &str) -> GateDefinition {
    definition(
        name,
        &["XXXX", "X..X", "-*.-", "XXXX"],
        &[('X', &[Material::Obsidian]), ('-', &[Material::Obsidian])],
        Material::NetherPortal,
        Material::Air,
    )
}

/// The classic nether gate: rounded obsidian ring, 2x3 opening.
pub fn nether_gate_definition(name: &str) -> GateDefinition {
    definition(
        name,
        &[" XX ", "X..X", "-..-", "X*.X", " XX "],
        &[('X', &[Material::Obsidian]), ('-', &[Material::Obsidian])],
        Material::NetherPortal,
        Material::Air,
    )
}

/// Stone gate whose iris rests on water and opens onto end gateway blocks.
pub fn water_gate_definition(name: &str) -> GateDefinition {
    definition(
        name,
        &["SSSS", "-*.-", "S..S", "SSSS"],
        &[('S', &[Material::Stone, Material::Cobblestone]), ('-', &[Material::Glowstone])],
        Material::EndGateway,
        Material::Water,
    )
}

/// Asymmetric obsidian gate: its mirror image does not match itself.
pub fn lopsided_gate_definition(name: &str) -> GateDefinition {
    definition(
        name,
        &["XXXG", "-*.X", "XXXX"],
        &[
            ('X', &[Material::Obsidian]),
            ('G', &[Material::Glowstone]),
            ('-', &[Material::Obsidian]),
        ],
        Material::NetherPortal,
        Material::Air,
    )
}

// -----------------------------------------------------------------------
// Structure stamping
// -----------------------------------------------------------------------

/// World block for template vector `v` of a gate at `origin`.
pub fn world_pos(transform: CoordinateTransform, origin: IVec3, v: crate::vector::RelativeVector) -> IVec3 {
    origin + transform.inverse_operation(v.to_canonical())
}

/// Build `template` into `world` at `origin` using the first accepted
/// material of every frame and control position.
pub fn stamp_template(
    world: &mut BlockWorld,
    template: &GateTemplate,
    transform: CoordinateTransform,
    origin: IVec3,
) {
    for role in StructureRole::STRUCTURAL {
        for &v in template.positions(role) {
            if let Some(&material) = template.accepted_materials(v).and_then(|m| m.first()) {
                world.set_material(world_pos(transform, origin, v), material);
            }
        }
    }
    for &v in template.positions(StructureRole::Entrance) {
        world.set_material(world_pos(transform, origin, v), template.closed_material());
    }
}

/// The anchor a player would use: the control block at `control_index`.
pub fn anchor_for(
    template: &GateTemplate,
    transform: CoordinateTransform,
    origin: IVec3,
    control_index: usize,
) -> IVec3 {
    world_pos(transform, origin, template.control_positions()[control_index])
}

// -----------------------------------------------------------------------
// TestWorld
// -----------------------------------------------------------------------

pub struct TestWorld {
    app: App,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Empty world, no templates loaded.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StargatePlugin);
        app.update();
        Self { app }
    }

    /// World with the given definitions loaded into the registry.
    pub fn with_templates(definitions: &[GateDefinition]) -> Self {
        let mut world = Self::new();
        let (registry, _) = TemplateRegistry::from_definitions(definitions);
        world.app.insert_resource(registry);
        world
    }

    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.app.insert_resource(config);
        self
    }

    pub fn template(&self, name: &str) -> std::sync::Arc<GateTemplate> {
        let registry = self.resource::<TemplateRegistry>();
        match registry.get(name) {
            Some(template) => std::sync::Arc::clone(template),
            None => panic!("template '{name}' is not loaded"),
        }
    }

    /// Stamp a loaded template into the world and return the anchor of its
    /// first control block.
    pub fn build_structure(&mut self, name: &str, facing: Facing, mirror: bool, origin: IVec3) -> IVec3 {
        let template = self.template(name);
        let transform = CoordinateTransform::new(facing, mirror);
        stamp_template(&mut self.blocks_mut(), &template, transform, origin);
        anchor_for(&template, transform, origin, 0)
    }

    // -----------------------------------------------------------------------
    // Driving the simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by executing the `FixedUpdate` schedule
    /// directly.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }

    /// Request a gate and tick once. Returns the new entity, if any.
    pub fn create_gate(&mut self, anchor: IVec3, facing: Facing) -> Option<Entity> {
        let before = self.events::<GateCreated>().len();
        self.send(CreateGate { anchor, facing });
        self.tick(1);
        self.events::<GateCreated>().get(before).map(|ev| ev.entity)
    }

    /// Set a block and report the change, as a host would after a player
    /// breaks or replaces it.
    pub fn change_block(&mut self, pos: IVec3, material: Material) {
        self.blocks_mut().set_material(pos, material);
        self.send(crate::gate::BlockChanged { pos });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn blocks(&self) -> &BlockWorld {
        self.resource::<BlockWorld>()
    }

    pub fn blocks_mut(&mut self) -> Mut<'_, BlockWorld> {
        self.app.world_mut().resource_mut::<BlockWorld>()
    }

    pub fn material(&self, pos: IVec3) -> Material {
        self.blocks().material_at(pos)
    }

    pub fn block(&self, pos: IVec3) -> BlockState {
        self.blocks().get(pos)
    }

    pub fn gate(&self, entity: Entity) -> Option<&GateInstance> {
        self.app.world().get::<GateInstance>(entity)
    }

    pub fn gate_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query::<&GateInstance>().iter(world).count()
    }

    pub fn pending_mutations(&self) -> usize {
        self.resource::<BlockMutationQueue>().len()
    }

    /// Every event of type `E` sent since the world was created.
    pub fn events<E: Event + Clone>(&self) -> Vec<E> {
        self.resource::<bevy::ecs::event::Events<E>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    pub fn last_failure(&self) -> Option<GateCreationFailed> {
        self.events::<GateCreationFailed>().pop()
    }
}
