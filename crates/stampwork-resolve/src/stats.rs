//! Counters accumulated during a resolution pass.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// UpdateTally
// ---------------------------------------------------------------------------

/// Per-token update counts, ordered by first touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTally {
    entries: Vec<(String, u64)>,
}

impl UpdateTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one update for `token`. A token seen for the first time is
    /// appended, so iteration order is first-touch order.
    pub fn bump(&mut self, token: &str) {
        match self.entries.iter_mut().find(|(key, _)| key == token) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((token.to_string(), 1)),
        }
    }

    pub fn get(&self, token: &str) -> u64 {
        self.entries
            .iter()
            .find(|(key, _)| key == token)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Total updates across all tokens.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for UpdateTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (token, count) in &self.entries {
            map.serialize_entry(token, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UpdateTally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TallyVisitor;

        impl<'de> Visitor<'de> for TallyVisitor {
            type Value = UpdateTally;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of number tokens to update counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut tally = UpdateTally::new();
                while let Some((token, count)) = access.next_entry::<String, u64>()? {
                    match tally.entries.iter_mut().find(|(key, _)| *key == token) {
                        Some((_, slot)) => *slot = count,
                        None => tally.entries.push((token, count)),
                    }
                }
                Ok(tally)
            }
        }

        deserializer.deserialize_map(TallyVisitor)
    }
}

// ---------------------------------------------------------------------------
// ResolveStats
// ---------------------------------------------------------------------------

/// What a resolution pass saw and changed.
///
/// `blueprints` counts blueprints carrying a `parameters` field;
/// blueprints without one pass through unseen. Field names serialize in
/// the export format's camelCase spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveStats {
    pub blueprints: u64,
    pub parameters: u64,
    pub number_parameters: u64,
    pub parameter_update_instances: UpdateTally,
}

impl ResolveStats {
    /// Counter sanity: updates never exceed the numeric parameters seen,
    /// which never exceed the parameters seen.
    pub fn is_consistent(&self) -> bool {
        self.parameter_update_instances.total() <= self.number_parameters
            && self.number_parameters <= self.parameters
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_orders_by_first_touch() {
        let mut tally = UpdateTally::new();
        tally.bump("b");
        tally.bump("a");
        tally.bump("b");
        let entries: Vec<(&str, u64)> = tally.iter().collect();
        assert_eq!(entries, [("b", 2), ("a", 1)]);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.get("missing"), 0);
    }

    #[test]
    fn stats_serialize_with_export_field_names() {
        let mut stats = ResolveStats::default();
        stats.blueprints = 1;
        stats.parameters = 2;
        stats.number_parameters = 1;
        stats.parameter_update_instances.bump("123123");
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "blueprints": 1,
                "parameters": 2,
                "numberParameters": 1,
                "parameterUpdateInstances": {"123123": 1}
            })
        );
    }

    #[test]
    fn consistency_check() {
        let mut stats = ResolveStats::default();
        assert!(stats.is_consistent());
        stats.parameter_update_instances.bump("5");
        assert!(!stats.is_consistent());
        stats.number_parameters = 1;
        stats.parameters = 1;
        assert!(stats.is_consistent());
    }
}
