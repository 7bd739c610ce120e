//! Live gates: templates bound to a world origin and orientation.
//!
//! [`match_gate`] searches the candidate templates for one that fits the
//! blocks around an anchor. A successful match yields a [`GateInstance`],
//! which the plugin spawns as a component and registers in the
//! [`crate::spatial_index::SpatialIndex`].

pub mod instance;
pub mod matcher;
pub mod plugin;


pub use instance::*;
pub use matcher::*;
pub use plugin::*;
