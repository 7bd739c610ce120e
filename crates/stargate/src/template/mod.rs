//! Gate templates: immutable descriptions of a portal's block layout.
//!
//! A [`GateDefinition`] is the serializable input (a character layout plus a
//! symbol table). It is validated into a [`GateTemplate`], which the
//! [`TemplateRegistry`] indexes by the material found behind a control block.

pub mod definition;
pub mod gate_template;
pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;

pub use definition::*;
pub use gate_template::*;
pub use registry::*;
pub use types::*;
