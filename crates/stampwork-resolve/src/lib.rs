//! Parameter resolution over decoded blueprint export trees.
//!
//! Resolution is a pure rebuild: the input tree is never mutated, a new
//! tree comes out with numeric parameter tokens replaced according to a
//! caller-supplied [`ParameterMapping`], alongside a [`ResolveStats`]
//! record of everything the pass touched.

pub mod classify;
pub mod mapping;
pub mod resolve;
pub mod stats;
pub mod walk;

pub use classify::{NodeKind, classify};
pub use mapping::{NumberOverride, ParameterMapping};
pub use resolve::resolve_parameters;
pub use stats::{ResolveStats, UpdateTally};
pub use walk::{Resolution, resolve_export};
