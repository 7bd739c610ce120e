//! Portal structure matching and gate lifecycle for block worlds.
//!
//! Players build a gate out of ordinary blocks; this crate recognizes which
//! template the structure matches, under which of the four facings and
//! whether mirrored, and then answers every template-relative question about
//! the live gate: where its exit is, which blocks belong to it, and what to
//! place when it opens or closes.
//!
//! All world writes go through the [`mutation::BlockMutationQueue`] and are
//! applied by the `GateSet::Flush` phase, never from inside a handler.

pub mod config;
pub mod facing;
pub mod gate;
pub mod material;
pub mod mutation;
pub mod spatial_index;
pub mod template;
pub mod transform;
pub mod vector;
pub mod world;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use gate::{GateSet, StargatePlugin};
