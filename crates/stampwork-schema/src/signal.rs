//! Signal identifiers, quality tiers, and comparison operators.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scalar enums
// ---------------------------------------------------------------------------

/// Signal categories recognised by the exchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalType {
    Virtual,
    Item,
    Fluid,
    Recipe,
    Entity,
    SpaceLocation,
    AsteroidChunk,
    Quality,
}

/// Quality tiers modifying a signal or item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    /// Default tier when unspecified.
    #[default]
    Normal,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    /// Placeholder when the tier cannot be discerned.
    QualityUnknown,
}

/// Comparison operators accepted by the format.
///
/// Four of the ten spellings are alternates of the same relation
/// (`≥`/`>=`, `≤`/`<=`, `≠`/`!=`, `=`/`==`). They stay distinct variants
/// here: the exchange format treats the spellings as distinct literal
/// byte sequences that must reproduce verbatim on re-encoding. Use
/// [`Comparator::relation`] when only the semantics matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "==")]
    DoubleEqual,
    #[serde(rename = "≥")]
    GreaterOrEqualUnicode,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "≤")]
    LessOrEqualUnicode,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "≠")]
    NotEqualUnicode,
    #[serde(rename = "!=")]
    NotEqual,
}

/// The five relations underlying the ten comparator spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Greater,
    Less,
    Equal,
    GreaterOrEqual,
    LessOrEqual,
    NotEqual,
}

impl Comparator {
    /// Collapse alternate spellings onto their underlying relation.
    pub fn relation(self) -> Relation {
        match self {
            Comparator::Greater => Relation::Greater,
            Comparator::Less => Relation::Less,
            Comparator::Equal | Comparator::DoubleEqual => Relation::Equal,
            Comparator::GreaterOrEqualUnicode | Comparator::GreaterOrEqual => {
                Relation::GreaterOrEqual
            }
            Comparator::LessOrEqualUnicode | Comparator::LessOrEqual => Relation::LessOrEqual,
            Comparator::NotEqualUnicode | Comparator::NotEqual => Relation::NotEqual,
        }
    }
}

// ---------------------------------------------------------------------------
// Value records
// ---------------------------------------------------------------------------

/// Serialized signal identifier.
///
/// An absent `name` means "no signal" and re-encodes as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Signal category (item, fluid, virtual, etc.).
    #[serde(rename = "type")]
    pub kind: SignalType,
    /// Quality tier. Treated as normal when unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    /// Comparator for quality ranges; only meaningful alongside `quality`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
}

impl Default for SignalType {
    fn default() -> Self {
        SignalType::Virtual
    }
}

impl SignalId {
    /// Named signal of the given category.
    pub fn named(name: impl Into<String>, kind: SignalType) -> Self {
        SignalId {
            name: Some(name.into()),
            kind,
            quality: None,
            comparator: None,
        }
    }

    /// Effective quality tier, applying the normal default.
    pub fn effective_quality(&self) -> Quality {
        self.quality.unwrap_or_default()
    }
}

/// Selection constraint filtering signal quality ranges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityFilter {
    /// Target quality; absent matches any quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_spellings_round_trip_verbatim() {
        for spelling in [">", "<", "=", "==", "≥", ">=", "≤", "<=", "≠", "!="] {
            let json = format!("\"{spelling}\"");
            let parsed: Comparator = serde_json::from_str(&json).unwrap();
            assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
        }
    }

    #[test]
    fn alternate_spellings_share_a_relation() {
        let ge: Comparator = serde_json::from_str("\">=\"").unwrap();
        let ge_u: Comparator = serde_json::from_str("\"≥\"").unwrap();
        assert_ne!(ge, ge_u);
        assert_eq!(ge.relation(), ge_u.relation());
    }

    #[test]
    fn unknown_comparator_rejected() {
        assert!(serde_json::from_str::<Comparator>("\"=>\"").is_err());
    }

    #[test]
    fn signal_type_uses_kebab_case() {
        let t: SignalType = serde_json::from_str("\"space-location\"").unwrap();
        assert_eq!(t, SignalType::SpaceLocation);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"space-location\"");
    }

    #[test]
    fn absent_signal_name_round_trips_to_absence() {
        let sig: SignalId = serde_json::from_str(r#"{"type":"item"}"#).unwrap();
        assert!(sig.name.is_none());
        assert_eq!(serde_json::to_string(&sig).unwrap(), r#"{"type":"item"}"#);
    }

    #[test]
    fn explicit_null_name_re_encodes_as_absent() {
        let sig: SignalId = serde_json::from_str(r#"{"name":null,"type":"fluid"}"#).unwrap();
        assert!(sig.name.is_none());
        assert!(!serde_json::to_string(&sig).unwrap().contains("name"));
    }

    #[test]
    fn quality_defaults_to_normal() {
        let sig = SignalId::named("iron-plate", SignalType::Item);
        assert_eq!(sig.effective_quality(), Quality::Normal);
    }

    #[test]
    fn quality_unknown_tier_spelling() {
        let q: Quality = serde_json::from_str("\"quality-unknown\"").unwrap();
        assert_eq!(q, Quality::QualityUnknown);
    }
}
