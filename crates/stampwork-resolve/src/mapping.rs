//! Override mappings for numeric parameters.
//!
//! A [`ParameterMapping`] is keyed by the *current* `number` token of a
//! parameter and iterated in declared order, first match wins. Order is
//! load-bearing, so the backing store is an association list rather than
//! a hash map, and serde round-trips preserve entry order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stampwork_schema::NumberParameter;

// ---------------------------------------------------------------------------
// NumberOverride
// ---------------------------------------------------------------------------

/// Partial replacement for a [`NumberParameter`]. Set fields win over the
/// parameter's own, unset fields leave the parameter untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_parametrised: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent: Option<bool>,
}

impl NumberOverride {
    /// Shallow-merge this override onto `parameter`, producing the
    /// resolved parameter. Extension-bag fields carry over unchanged.
    pub fn apply(&self, parameter: &NumberParameter) -> NumberParameter {
        let mut merged = parameter.clone();
        if let Some(name) = &self.name {
            merged.name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            merged.description = Some(description.clone());
        }
        if let Some(number) = &self.number {
            merged.number = Some(number.clone());
        }
        if let Some(not_parametrised) = self.not_parametrised {
            merged.not_parametrised = Some(not_parametrised);
        }
        if let Some(variable) = &self.variable {
            merged.variable = Some(variable.clone());
        }
        if let Some(formula) = &self.formula {
            merged.formula = Some(formula.clone());
        }
        if let Some(dependent) = self.dependent {
            merged.dependent = Some(dependent);
        }
        merged
    }
}

// ---------------------------------------------------------------------------
// ParameterMapping
// ---------------------------------------------------------------------------

/// Ordered token -> override mapping.
///
/// Tokens are the parameters' *current* numeric values, not stable
/// identifiers: two parameters that happen to share a number are both
/// rewritten by the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMapping {
    entries: Vec<(String, NumberOverride)>,
}

impl ParameterMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an override for `token`. An existing entry for the same
    /// token is replaced in place, keeping its position in the order.
    pub fn insert(&mut self, token: impl Into<String>, over: NumberOverride) {
        let token = token.into();
        match self.entries.iter_mut().find(|(key, _)| *key == token) {
            Some((_, slot)) => *slot = over,
            None => self.entries.push((token, over)),
        }
    }

    /// First entry whose token equals `token`, in declared order.
    pub fn get(&self, token: &str) -> Option<&NumberOverride> {
        self.entries
            .iter()
            .find(|(key, _)| key == token)
            .map(|(_, over)| over)
    }

    pub fn contains_key(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// Entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NumberOverride)> {
        self.entries.iter().map(|(key, over)| (key.as_str(), over))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, NumberOverride)> for ParameterMapping {
    fn from_iter<I: IntoIterator<Item = (String, NumberOverride)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (token, over) in iter {
            mapping.insert(token, over);
        }
        mapping
    }
}

impl Serialize for ParameterMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (token, over) in &self.entries {
            map.serialize_entry(token, over)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = ParameterMapping;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of number tokens to overrides")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mapping = ParameterMapping::new();
                while let Some((token, over)) = access.next_entry::<String, NumberOverride>()? {
                    mapping.insert(token, over);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
