//! Deferred block mutations.
//!
//! Gates never write blocks directly. `open()`, `close()` and button drawing
//! append to the [`BlockMutationQueue`]; a per-tick drain applies the queue
//! once no event handler is iterating the affected region.

use std::fmt;

use bevy::prelude::*;

use crate::material::{Material, Orientation};
use crate::world::{BlockState, BlockWorld};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockChange {
    Set {
        material: Material,
        orientation: Option<Orientation>,
    },
    /// Pin the block's self-simulating state to a neutral value. Always
    /// queued right after the `Set` it corrects.
    Neutralize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMutation {
    pub pos: IVec3,
    pub change: BlockChange,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BlockMutationQueue {
    pending: Vec<BlockMutation>,
}

impl BlockMutationQueue {
    pub fn enqueue(&mut self, pos: IVec3, material: Material, orientation: Option<Orientation>) {
        self.pending.push(BlockMutation {
            pos,
            change: BlockChange::Set {
                material,
                orientation,
            },
        });
    }

    pub fn enqueue_neutralize(&mut self, pos: IVec3) {
        self.pending.push(BlockMutation {
            pos,
            change: BlockChange::Neutralize,
        });
    }

    pub fn drain(&mut self) -> Vec<BlockMutation> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> &[BlockMutation] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationError {
    OutsideLoadedRegion(IVec3),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationError::OutsideLoadedRegion(pos) => {
                write!(f, "block {pos} is outside the loaded region")
            }
        }
    }
}

impl std::error::Error for MutationError {}

impl BlockWorld {
    pub fn apply(&mut self, mutation: &BlockMutation) -> Result<(), MutationError> {
        let pos = mutation.pos;
        if !self.is_loaded(pos) {
            return Err(MutationError::OutsideLoadedRegion(pos));
        }
        let state = match mutation.change {
            BlockChange::Set {
                material,
                orientation,
            } => BlockState {
                material,
                orientation,
                neutralized: false,
            },
            BlockChange::Neutralize => BlockState {
                neutralized: true,
                ..self.get(pos)
            },
        };
        self.set(pos, state);
        Ok(())
    }
}

/// Drains the queue into the reference world. Failed mutations are logged and
/// dropped; they never surface to the gate that queued them.
pub fn apply_block_mutations(mut queue: ResMut<BlockMutationQueue>, mut world: ResMut<BlockWorld>) {
    if queue.is_empty() {
        return;
    }
    for mutation in queue.drain() {
        if let Err(e) = world.apply(&mutation) {
            warn!("Skipping block mutation {:?}: {}", mutation.change, e);
        }
    }
}
