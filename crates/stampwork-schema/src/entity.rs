//! Placed entities, tiles, control behaviour, and wiring.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::JsonObject;
use crate::condition::{ArithmeticCondition, Condition, DeciderCondition, DeciderOutput, OneOrMany};
use crate::filter::{AlertParameters, ItemFilter, ManualSection, SignalFilter};
use crate::schedule::Schedule;
use crate::signal::Quality;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Two-dimensional position measured in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// RGBA colour encoded as floats or bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    /// Alpha; treated as fully opaque when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Physical connection socket identifier on an entity. Closed set 1..=6;
/// out-of-range values are rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireConnectorId {
    CircuitInputRed,
    CircuitInputGreen,
    CircuitOutputRed,
    CircuitOutputGreen,
    PoleCopper,
    PowerSwitchCopper,
}

impl WireConnectorId {
    /// Wire-format numeric identifier.
    pub fn as_u8(self) -> u8 {
        match self {
            WireConnectorId::CircuitInputRed => 1,
            WireConnectorId::CircuitInputGreen => 2,
            WireConnectorId::CircuitOutputRed => 3,
            WireConnectorId::CircuitOutputGreen => 4,
            WireConnectorId::PoleCopper => 5,
            WireConnectorId::PowerSwitchCopper => 6,
        }
    }
}

impl TryFrom<u64> for WireConnectorId {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, u64> {
        match value {
            1 => Ok(WireConnectorId::CircuitInputRed),
            2 => Ok(WireConnectorId::CircuitInputGreen),
            3 => Ok(WireConnectorId::CircuitOutputRed),
            4 => Ok(WireConnectorId::CircuitOutputGreen),
            5 => Ok(WireConnectorId::PoleCopper),
            6 => Ok(WireConnectorId::PowerSwitchCopper),
            other => Err(other),
        }
    }
}

impl Serialize for WireConnectorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for WireConnectorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConnectorVisitor;

        impl de::Visitor<'_> for ConnectorVisitor {
            type Value = WireConnectorId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a wire connector id in 1..=6")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                WireConnectorId::try_from(v)
                    .map_err(|bad| E::invalid_value(de::Unexpected::Unsigned(bad), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
                    .and_then(|u| self.visit_u64(u))
            }
        }

        deserializer.deserialize_u64(ConnectorVisitor)
    }
}

/// Native wire connection: `[entity, connector, entity, connector]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire(pub u64, pub WireConnectorId, pub u64, pub WireConnectorId);

impl Wire {
    pub fn source_entity(&self) -> u64 {
        self.0
    }

    pub fn source_connector(&self) -> WireConnectorId {
        self.1
    }

    pub fn target_entity(&self) -> u64 {
        self.2
    }

    pub fn target_connector(&self) -> WireConnectorId {
        self.3
    }
}

/// Circuit network connection to another entity (legacy serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitWireConnection {
    /// Target entity number receiving the wire.
    pub entity_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_id: Option<u32>,
}

/// Power network connection to another entity (legacy serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerWireConnection {
    pub entity_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_id: Option<u32>,
}

/// Port definition for a specific connection point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircuitPort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<Vec<CircuitWireConnection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<Vec<CircuitWireConnection>>,
}

/// Union of circuit- and power-wire connection payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectionPort {
    Circuit(CircuitPort),
    Power(Vec<PowerWireConnection>),
}

/// Map of connection point identifiers to wire definitions.
pub type EntityConnections = BTreeMap<String, ConnectionPort>;

// ---------------------------------------------------------------------------
// Control behaviour
// ---------------------------------------------------------------------------

/// Control behaviour bag shared across circuit-aware entity classes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlBehavior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistic_condition: Option<Condition>,
    /// One or more decider-style conditions backing the behaviour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decider_conditions: Option<OneOrMany<DeciderCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decider_outputs: Option<OneOrMany<DeciderOutput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arithmetic_conditions: Option<ArithmeticCondition>,
    /// Flat signal filter list (legacy constant combinator format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<SignalFilter>>,
    /// Manual sections (current constant combinator format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<ManualSection>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

// ---------------------------------------------------------------------------
// Entities and tiles
// ---------------------------------------------------------------------------

/// Blueprint entity definition.
///
/// Entity numbers are unique within one blueprint; [`crate::validate`]
/// enforces that. Wire endpoints referencing declared entity numbers is a
/// caller concern, see [`crate::validate::check_wire_references`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier within the blueprint.
    pub entity_number: u64,
    /// Prototype name for the entity.
    pub name: String,
    /// World-space position measured in tiles.
    pub position: Position,
    /// Cardinal direction index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    /// Orientation for rolling stock and curved entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    /// Force that owns the entity (defaults to the player force).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<String>,
    /// Inventory contents serialized alongside the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<BTreeMap<String, i64>>,
    /// Active recipe assigned to crafting entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    /// Inventory bar limitation for container-style entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_behavior: Option<ControlBehavior>,
    /// Legacy wire connections originating from this entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<EntityConnections>,
    /// Power pole neighbours (legacy wire serialization).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbours: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_parameters: Option<AlertParameters>,
    /// Item drop offset used by inserters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_position: Option<Position>,
    /// Item pickup offset used by inserters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<ItemFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_filters: Option<Vec<SignalFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistic_filters: Option<Vec<ItemFilter>>,
    /// Arbitrary metadata tags stored on the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<JsonObject>,
    /// Entity type hint used by certain blueprint tools.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Custom station name for train stop entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_stop_name: Option<String>,
    /// When false, keeps the train in manual mode after placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_mode: Option<bool>,
    /// Embedded schedule when blueprinting locomotives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Requested module/item counts attached to the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_requests: Option<BTreeMap<String, i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_size_override: Option<u32>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Entity {
    /// Minimal entity for construction in code and tests.
    pub fn new(entity_number: u64, name: impl Into<String>, position: Position) -> Self {
        Entity {
            entity_number,
            name: name.into(),
            position,
            direction: None,
            orientation: None,
            tile_position: None,
            quality: None,
            force: None,
            items: None,
            recipe: None,
            bar: None,
            control_behavior: None,
            connections: None,
            neighbours: None,
            alert_parameters: None,
            drop_position: None,
            pickup_position: None,
            filters: None,
            request_filters: None,
            logistic_filters: None,
            tags: None,
            kind: None,
            train_stop_name: None,
            manual_mode: None,
            schedule: None,
            item_requests: None,
            stack_size_override: None,
            extra: JsonObject::new(),
        }
    }
}

/// Blueprint tile definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Tile prototype name being placed.
    pub name: String,
    pub position: Position,
    /// Tile orientation (used by hazard concrete).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

// ===========================================================================
// Tests
// ===========================================================================
