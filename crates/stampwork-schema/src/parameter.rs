//! Blueprint parameters: user-facing placeholders substituted at build time.
//!
//! Exactly two variants exist, discriminated by the `type` field: an
//! identifier substitution and a numeric substitution. The discriminant
//! decides which sibling fields are legal; [`crate::validate`] rejects a
//! parameter carrying fields that belong to the other variant.

use serde::{Deserialize, Serialize};

use crate::JsonObject;
use crate::signal::QualityFilter;

/// Signal/id substitution placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdParameter {
    /// User-facing display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Signal identifier or parameter token to substitute.
    pub id: String,
    /// Quality constraint applied when resolving the signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_condition: Option<QualityFilter>,
    /// Name of another parameter to inherit signal type information from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_of: Option<String>,
    /// Whether the parameter is selectable during placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Numeric substitution placeholder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberParameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Literal string encoding of the constant numeric value to replace.
    /// Absence means "no release value yet", not zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// When true, leaves the original blueprint value untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_parametrised: Option<bool>,
    /// Variable name that other formulas may reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Arithmetic expression used to compute the final value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Marks the parameter as dependent on earlier variables in the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// The parameter union, tagged by the wire-format `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Parameter {
    #[serde(rename = "id")]
    Id(IdParameter),
    #[serde(rename = "number")]
    Number(NumberParameter),
}

impl Parameter {
    /// User-facing display name, whichever variant carries it.
    pub fn name(&self) -> Option<&str> {
        match self {
            Parameter::Id(p) => p.name.as_deref(),
            Parameter::Number(p) => p.name.as_deref(),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Parameter::Number(_))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
