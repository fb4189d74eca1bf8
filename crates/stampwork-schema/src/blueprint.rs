//! Single blueprints, blueprint books, and the recursive export root.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::JsonObject;
use crate::entity::{Color, Entity, Position, Tile, Wire};
use crate::parameter::Parameter;
use crate::schedule::{ScheduleAssignment, StockConnection};
use crate::signal::SignalId;

// ---------------------------------------------------------------------------
// Item markers
// ---------------------------------------------------------------------------

/// The fixed `item` discriminant on a single blueprint.
///
/// Decoding any value other than the literal string `"blueprint"` fails,
/// so a typed [`Blueprint`] always carries the correct marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlueprintItem;

impl Serialize for BlueprintItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("blueprint")
    }
}

impl<'de> Deserialize<'de> for BlueprintItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "blueprint" {
            Ok(BlueprintItem)
        } else {
            Err(de::Error::invalid_value(
                de::Unexpected::Str(&raw),
                &"the literal \"blueprint\"",
            ))
        }
    }
}

/// The fixed `item` discriminant on a blueprint book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookItem;

impl Serialize for BookItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("blueprint-book")
    }
}

impl<'de> Deserialize<'de> for BookItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "blueprint-book" {
            Ok(BookItem)
        } else {
            Err(de::Error::invalid_value(
                de::Unexpected::Str(&raw),
                &"the literal \"blueprint-book\"",
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

/// One-based icon slot index, valid range 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IconIndex(u8);

impl IconIndex {
    pub fn new(value: u8) -> Option<Self> {
        (1..=4).contains(&value).then_some(IconIndex(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Serialize for IconIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for IconIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl de::Visitor<'_> for IndexVisitor {
            type Value = IconIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an icon slot index in 1..=4")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u8::try_from(v)
                    .ok()
                    .and_then(IconIndex::new)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
                    .and_then(|u| self.visit_u64(u))
            }
        }

        deserializer.deserialize_u64(IndexVisitor)
    }
}

/// Icon metadata for blueprints and books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub index: IconIndex,
    /// Signal displayed in the slot.
    pub signal: SignalId,
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

/// A single placed-construction export: entities, tiles, wires, schedules,
/// and parameter placeholders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Blueprint {
    /// Always the literal `"blueprint"`.
    pub item: BlueprintItem,
    /// User-given title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Up to 4 icons with unique in-range slot indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<Icon>>,
    /// 64-bit encoded game version.
    pub version: u64,
    /// Snapping grid size; presence enables snapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapping_grid_size: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_snapping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_relative_to_grid: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<Tile>>,
    /// Native circuit wires; may be absent in older exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wires: Option<Vec<Wire>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<ScheduleAssignment>>,
    /// Parameter placeholders. Present-but-empty and absent are distinct
    /// states: only a present sequence makes the blueprint eligible for
    /// parameter resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// Train couplings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_connections: Option<Vec<StockConnection>>,
    /// Additional group metadata present in some exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<JsonObject>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Blueprint {
    /// Empty blueprint at the given encoded game version.
    pub fn new(version: u64) -> Self {
        Blueprint {
            version,
            ..Blueprint::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Book and export root
// ---------------------------------------------------------------------------

/// A blueprint book: an ordered container of further export nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlueprintBook {
    /// The `"blueprint-book"` marker; tolerated as absent in exports from
    /// tools that omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<BookItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<Icon>>,
    /// Index of the child selected in the GUI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Ordered children; nesting depth is unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprints: Option<Vec<ExportNode>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Root wrapper holding a single blueprint under the `blueprint` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintEnvelope {
    pub blueprint: Blueprint,
    /// Position within a containing book, when nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl BlueprintEnvelope {
    pub fn new(blueprint: Blueprint) -> Self {
        BlueprintEnvelope {
            blueprint,
            index: None,
            extra: JsonObject::new(),
        }
    }

    /// Whether this blueprint carries a parameter list (possibly empty).
    ///
    /// This is the classifier gate for parameter resolution: a blueprint
    /// without the field is passed through untouched.
    pub fn has_parameters(&self) -> bool {
        self.blueprint.parameters.is_some()
    }
}

/// Root wrapper holding a book under the `blueprint_book` key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookEnvelope {
    pub blueprint_book: BlueprintBook,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl BookEnvelope {
    pub fn new(blueprint_book: BlueprintBook) -> Self {
        BookEnvelope {
            blueprint_book,
            index: None,
            extra: JsonObject::new(),
        }
    }
}

/// A node of the recursive export tree.
///
/// The format is a tree, never a graph: containers hold their children by
/// value and no back-references exist. Decoding is lenient by design --
/// values matching neither structured variant become [`ExportNode::Other`]
/// and pass through resolution untouched. Use [`crate::validate`] for the
/// strict parse that rejects malformed structured nodes instead of
/// passing them through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportNode {
    /// `{"blueprint": {...}}`
    Blueprint(BlueprintEnvelope),
    /// `{"blueprint_book": {...}}`
    Book(BookEnvelope),
    /// A bare ordered list of nodes.
    List(Vec<ExportNode>),
    /// Unrelated data, preserved verbatim.
    Other(serde_json::Value),
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_blueprint_json() -> &'static str {
        r#"{"blueprint": {"item": "blueprint", "version": 281479278297089}}"#
    }

    #[test]
    fn icon_index_range() {
        assert!(IconIndex::new(0).is_none());
        assert!(IconIndex::new(1).is_some());
        assert!(IconIndex::new(4).is_some());
        assert!(IconIndex::new(5).is_none());
        assert!(serde_json::from_str::<IconIndex>("0").is_err());
        assert!(serde_json::from_str::<IconIndex>("5").is_err());
        assert_eq!(serde_json::from_str::<IconIndex>("3").unwrap().get(), 3);
    }

    #[test]
    fn item_marker_is_literal() {
        assert!(serde_json::from_str::<BlueprintItem>("\"blueprint\"").is_ok());
        assert!(serde_json::from_str::<BlueprintItem>("\"blueprint-book\"").is_err());
        assert_eq!(
            serde_json::to_string(&BlueprintItem).unwrap(),
            "\"blueprint\""
        );
    }

    #[test]
    fn export_node_classifies_blueprint() {
        let node: ExportNode = serde_json::from_str(minimal_blueprint_json()).unwrap();
        assert!(matches!(node, ExportNode::Blueprint(_)));
    }

    #[test]
    fn export_node_book_with_nested_children() {
        let json = r#"{
            "blueprint_book": {
                "item": "blueprint-book",
                "label": "Outer",
                "blueprints": [
                    {"index": 0, "blueprint": {"item": "blueprint", "version": 1}},
                    {"index": 1, "blueprint_book": {"item": "blueprint-book", "blueprints": []}}
                ]
            }
        }"#;
        let node: ExportNode = serde_json::from_str(json).unwrap();
        let ExportNode::Book(env) = node else {
            panic!("expected book");
        };
        let children = env.blueprint_book.blueprints.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], ExportNode::Blueprint(_)));
        assert!(matches!(children[1], ExportNode::Book(_)));
    }

    #[test]
    fn unrelated_value_falls_through_to_other() {
        let node: ExportNode = serde_json::from_str(r#"{"deconstruction_planner": {}}"#).unwrap();
        assert!(matches!(node, ExportNode::Other(_)));
        let scalar: ExportNode = serde_json::from_str("42").unwrap();
        assert!(matches!(scalar, ExportNode::Other(_)));
    }

    #[test]
    fn bare_list_becomes_list_node() {
        let json = r#"[{"blueprint": {"item": "blueprint", "version": 1}}, "loose"]"#;
        let node: ExportNode = serde_json::from_str(json).unwrap();
        let ExportNode::List(children) = node else {
            panic!("expected list");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], ExportNode::Blueprint(_)));
        assert!(matches!(children[1], ExportNode::Other(_)));
    }

    #[test]
    fn malformed_blueprint_passes_through_as_other() {
        // Icon index 9 is out of range, so the strict Blueprint decode
        // fails and the lenient root decode classifies the node as Other.
        let json = r#"{"blueprint": {"item": "blueprint", "version": 1,
            "icons": [{"index": 9, "signal": {"type": "item"}}]}}"#;
        let node: ExportNode = serde_json::from_str(json).unwrap();
        assert!(matches!(node, ExportNode::Other(_)));
    }

    #[test]
    fn envelope_round_trip_preserves_extra_keys() {
        let json = r#"{"blueprint": {"item": "blueprint", "version": 7, "modded": true}, "index": 2}"#;
        let node: ExportNode = serde_json::from_str(json).unwrap();
        let ExportNode::Blueprint(ref env) = node else {
            panic!("expected blueprint");
        };
        assert_eq!(env.index, Some(2));
        assert!(env.blueprint.extra.contains_key("modded"));
        let encoded = serde_json::to_string(&node).unwrap();
        assert!(encoded.contains("modded"));
        let back: ExportNode = serde_json::from_str(&encoded).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn parameters_absent_vs_empty_distinct() {
        let absent: ExportNode = serde_json::from_str(minimal_blueprint_json()).unwrap();
        let ExportNode::Blueprint(env) = absent else {
            panic!("expected blueprint");
        };
        assert!(!env.has_parameters());

        let empty: ExportNode = serde_json::from_str(
            r#"{"blueprint": {"item": "blueprint", "version": 1, "parameters": []}}"#,
        )
        .unwrap();
        let ExportNode::Blueprint(env) = empty else {
            panic!("expected blueprint");
        };
        assert!(env.has_parameters());
        // Present-but-empty re-encodes as present.
        assert!(serde_json::to_string(&env).unwrap().contains("\"parameters\":[]"));
    }
}
