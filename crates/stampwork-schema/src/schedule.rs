//! Train schedules: wait conditions, stops, interrupts, and assignments.
//!
//! This crate models the schedule structure only; evaluation of wait
//! conditions happens in the consuming simulator, never here.

use serde::{Deserialize, Serialize};

use crate::JsonObject;
use crate::condition::{CompareType, Condition};

// ---------------------------------------------------------------------------
// Discriminants
// ---------------------------------------------------------------------------

/// Fixed wait condition discriminants gating schedule progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitConditionKind {
    AllRequestsSatisfied,
    AnyPlanetImportZero,
    AnyRequestNotSatisfied,
    AnyRequestZero,
    AtStation,
    Circuit,
    DamageTaken,
    DestinationFullOrNoPath,
    Empty,
    FluidCount,
    FuelItemCountAll,
    FuelItemCountAny,
    Full,
    FuelFull,
    NotEmpty,
    Inactivity,
    ItemCount,
    NotAtStation,
    PassengerPresent,
    PassengerNotPresent,
    RequestSatisfied,
    RequestNotSatisfied,
    SpecificDestinationFull,
    SpecificDestinationNotFull,
    Time,
}

/// Whether the train should arrive driving forward or reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RailDirection {
    Front,
    Back,
}

// ---------------------------------------------------------------------------
// Schedule structure
// ---------------------------------------------------------------------------

/// A single wait condition, optionally chained to the next with AND/OR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitCondition {
    #[serde(rename = "type")]
    pub kind: WaitConditionKind,
    /// Boolean operator chaining to the next condition in the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_type: Option<CompareType>,
    /// Train stop name referenced by station-type waits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    /// Duration in ticks used by time and inactivity waits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticks: Option<u64>,
    /// Circuit/logistic payload for circuit and count-based waits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl WaitCondition {
    pub fn new(kind: WaitConditionKind) -> Self {
        WaitCondition {
            kind,
            compare_type: None,
            station: None,
            ticks: None,
            condition: None,
            extra: JsonObject::new(),
        }
    }
}

/// Single schedule record (stop) entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Name of the station to visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    /// Serialized rail reference for temporary/explicit target stops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail_direction: Option<RailDirection>,
    /// Branch identifier for split junctions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail_branch: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary: Option<bool>,
    /// When false, prevents unloading at this stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_unloading: Option<bool>,
    /// Ordered wait conditions evaluated at this stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_conditions: Option<Vec<WaitCondition>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Schedule interrupt evaluated alongside the base schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInterrupt {
    pub name: String,
    /// Conditions that must hold before the interrupt activates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<WaitCondition>>,
    /// Alternative records executed while the interrupt is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<ScheduleRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside_interrupt: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Complete schedule definition: ordered stops plus interrupts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub records: Vec<ScheduleRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupts: Option<Vec<ScheduleInterrupt>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Assignment of a schedule to one or more locomotives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    /// Entity numbers of locomotives that own this schedule.
    pub locomotives: Vec<u64>,
    pub schedule: Schedule,
    /// Additional rolling stock indices included in the assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_stock: Option<Vec<u64>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Train coupling information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConnection {
    /// Entity number of the rolling stock being described.
    pub stock: u64,
    /// Entity connected to the front coupler, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<u64>,
    /// Entity connected to the rear coupler, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<u64>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_condition_kinds_use_snake_case() {
        let wc: WaitCondition =
            serde_json::from_str(r#"{"type": "destination_full_or_no_path"}"#).unwrap();
        assert_eq!(wc.kind, WaitConditionKind::DestinationFullOrNoPath);
        assert_eq!(
            serde_json::to_string(&wc).unwrap(),
            r#"{"type":"destination_full_or_no_path"}"#
        );
    }

    #[test]
    fn unknown_wait_condition_kind_rejected() {
        assert!(serde_json::from_str::<WaitCondition>(r#"{"type": "teleport"}"#).is_err());
    }

    #[test]
    fn schedule_round_trip() {
        let json = r#"{
            "records": [
                {
                    "station": "Iron Pickup",
                    "wait_conditions": [
                        {"type": "full"},
                        {"type": "inactivity", "compare_type": "or", "ticks": 300}
                    ]
                },
                {"station": "Iron Dropoff", "wait_conditions": [{"type": "empty"}]}
            ],
            "interrupts": [
                {"name": "refuel", "conditions": [{"type": "fuel_item_count_all"}]}
            ]
        }"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.records.len(), 2);
        let chained = &schedule.records[0].wait_conditions.as_ref().unwrap()[1];
        assert_eq!(chained.compare_type, Some(CompareType::Or));
        assert_eq!(chained.ticks, Some(300));
        let back: Schedule =
            serde_json::from_str(&serde_json::to_string(&schedule).unwrap()).unwrap();
        assert_eq!(schedule, back);
    }

    #[test]
    fn assignment_keeps_locomotive_order() {
        let json = r#"{"locomotives": [5, 2, 9], "schedule": {"records": []}}"#;
        let assignment: ScheduleAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.locomotives, vec![5, 2, 9]);
    }
}
