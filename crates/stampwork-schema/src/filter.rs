//! Signal and item filters, manual sections, and alert configuration.

use serde::{Deserialize, Serialize};

use crate::JsonObject;
use crate::signal::{Comparator, Quality, SignalId, SignalType};

/// Signal filter entry used by constant combinators and logistic sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalFilter {
    /// Index of the entry within the owning GUI list.
    pub index: u32,
    /// Signal name being filtered; absent represents an empty slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Numeric value, or lower bound when `max_count` is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    /// Category to enforce when multiple categories share a name.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SignalType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
    /// Upper bound when representing a range of counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<i64>,
}

/// Item filter entry used by inserters and requester chests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub index: u32,
    /// Item prototype name requested by this filter.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<i64>,
}

/// Manual signal section exported by constant combinators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualSection {
    pub index: u32,
    /// Ordered signal filters contained in this section.
    pub filters: Vec<SignalFilter>,
    /// Section label registered within the save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Whether the section currently contributes to the output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Alert configuration serialised alongside certain entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertParameters {
    /// Alert type discriminator from the game's alert prototype table.
    pub alert_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_signal_id: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on_map: Option<bool>,
    /// Prototype-specific extension data.
    #[serde(flatten)]
    pub extra: JsonObject,
}

// ===========================================================================
// Tests
// ===========================================================================
