//! Block access for the gate engine.
//!
//! The engine only reads materials through [`BlockSource`]. [`BlockWorld`] is
//! a sparse reference world with a loaded vertical band; hosts with their own
//! world storage implement [`BlockSource`] on it instead.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::{WORLD_MAX_Y, WORLD_MIN_Y};
use crate::material::{Material, Orientation};

/// Read-only material lookup.
pub trait BlockSource {
    fn material_at(&self, pos: IVec3) -> Material;
}

impl<F> BlockSource for F
where
    F: Fn(IVec3) -> Material,
{
    fn material_at(&self, pos: IVec3) -> Material {
        self(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockState {
    pub material: Material,
    pub orientation: Option<Orientation>,
    /// Self-simulating behavior (regeneration, exit spawning) is pinned off.
    pub neutralized: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct BlockWorld {
    blocks: HashMap<IVec3, BlockState>,
    min_y: i32,
    max_y: i32,
}

impl Default for BlockWorld {
    fn default() -> Self {
        Self::new(WORLD_MIN_Y, WORLD_MAX_Y)
    }
}

impl BlockWorld {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            min_y,
            max_y,
        }
    }

    #[inline]
    pub fn is_loaded(&self, pos: IVec3) -> bool {
        pos.y >= self.min_y && pos.y <= self.max_y
    }

    /// Block state at `pos`. Unset blocks are air; unloaded blocks are void.
    pub fn get(&self, pos: IVec3) -> BlockState {
        if !self.is_loaded(pos) {
            return BlockState {
                material: Material::VoidAir,
                ..Default::default()
            };
        }
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    /// Overwrite a block directly. Returns `false` outside the loaded band.
    pub fn set(&mut self, pos: IVec3, state: BlockState) -> bool {
        if !self.is_loaded(pos) {
            return false;
        }
        if state == BlockState::default() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
        true
    }

    pub fn set_material(&mut self, pos: IVec3, material: Material) -> bool {
        self.set(
            pos,
            BlockState {
                material,
                ..Default::default()
            },
        )
    }

    /// Number of non-air blocks stored.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl BlockSource for BlockWorld {
    fn material_at(&self, pos: IVec3) -> Material {
        self.get(pos).material
    }
}
