//! Stampwork Schema -- the typed data model for the blueprint exchange format.
//!
//! This crate defines every structural variant of the versioned export
//! format used by the game: single blueprints, blueprint books, signals,
//! circuit conditions, filters, wires, train schedules, and the parameter
//! placeholders that the resolution engine rewrites. Each discriminated
//! union in the wire format is a closed Rust sum type, so downstream code
//! matches exhaustively instead of probing JSON shapes at runtime.
//!
//! # Lossless round-trips
//!
//! The exchange format is forward-compatible: exports routinely carry keys
//! this schema does not model. Every open record therefore ends in a
//! flattened extension bag that preserves unknown siblings verbatim.
//! Alternate comparator spellings (`>=` vs `≥`) are distinct enum variants
//! because the format treats them as distinct byte sequences that must
//! reproduce exactly on re-encoding. Absent optional fields re-encode as
//! absent, never as explicit `null`.
//!
//! # Key Types
//!
//! - [`ExportNode`] -- recursive root: a blueprint, a book of further
//!   nodes, a bare list, or an unrelated pass-through value.
//! - [`blueprint::Blueprint`] -- a single placed-construction export.
//! - [`parameter::Parameter`] -- the two-variant placeholder union the
//!   resolution engine operates on.
//! - [`validate`] -- strict validating parser from raw JSON, with
//!   field-path errors for every violated constraint.

pub mod blueprint;
pub mod condition;
pub mod entity;
pub mod filter;
pub mod parameter;
pub mod schedule;
pub mod signal;
pub mod validate;

pub use blueprint::{Blueprint, BlueprintBook, BlueprintEnvelope, BookEnvelope, ExportNode};
pub use parameter::{IdParameter, NumberParameter, Parameter};
pub use signal::{Comparator, Quality, SignalId, SignalType};
pub use validate::{ValidationError, validate};

/// JSON object used by extension bags and pass-through values.
///
/// serde_json is built with `preserve_order`, so keys keep their source
/// order across a decode/encode round-trip.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
