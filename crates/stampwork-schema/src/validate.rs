//! Strict validating parser: raw JSON -> typed, invariant-satisfying tree.
//!
//! The lenient [`ExportNode`] serde decode classifies anything malformed
//! as pass-through data. [`validate`] is the strict entry point: it walks
//! the raw value first, rejecting violated constraints with the offending
//! field path, and only then performs the typed decode, so a structured
//! node that fails its invariants aborts the parse instead of silently
//! degrading to [`ExportNode::Other`].

use serde_json::Value;

use crate::JsonObject;
use crate::blueprint::{BlueprintEnvelope, BookEnvelope, ExportNode};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Constraint violation found while validating raw input. Carries the
/// JSON path of the offending field and the violated constraint.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: String, field: &'static str },
    #[error("{path}: expected {expected}")]
    WrongType { path: String, expected: &'static str },
    #[error("{path}: `{value}` is not a valid {expected}")]
    BadDiscriminant {
        path: String,
        value: String,
        expected: &'static str,
    },
    #[error("{path}: {constraint}, got {got}")]
    OutOfRange {
        path: String,
        constraint: &'static str,
        got: i128,
    },
    #[error("{path}: field `{field}` does not belong to `{variant}` parameters")]
    ForeignField {
        path: String,
        field: String,
        variant: &'static str,
    },
    #[error("{path}: duplicate entity_number {number}")]
    DuplicateEntityNumber { path: String, number: u64 },
    #[error("{path}: duplicate icon index {index}")]
    DuplicateIconIndex { path: String, index: u64 },
    #[error("{path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Discriminant tables
// ---------------------------------------------------------------------------

const SIGNAL_TYPES: &[&str] = &[
    "virtual",
    "item",
    "fluid",
    "recipe",
    "entity",
    "space-location",
    "asteroid-chunk",
    "quality",
];

const QUALITIES: &[&str] = &[
    "normal",
    "uncommon",
    "rare",
    "epic",
    "legendary",
    "quality-unknown",
];

const COMPARATORS: &[&str] = &[">", "<", "=", "==", "≥", ">=", "≤", "<=", "≠", "!="];

const WAIT_CONDITION_KINDS: &[&str] = &[
    "all_requests_satisfied",
    "any_planet_import_zero",
    "any_request_not_satisfied",
    "any_request_zero",
    "at_station",
    "circuit",
    "damage_taken",
    "destination_full_or_no_path",
    "empty",
    "fluid_count",
    "fuel_item_count_all",
    "fuel_item_count_any",
    "full",
    "fuel_full",
    "not_empty",
    "inactivity",
    "item_count",
    "not_at_station",
    "passenger_present",
    "passenger_not_present",
    "request_satisfied",
    "request_not_satisfied",
    "specific_destination_full",
    "specific_destination_not_full",
    "time",
];

/// Sibling fields legal only on the `id` parameter variant.
const ID_ONLY_FIELDS: &[&str] = &["id", "quality_condition", "ingredient_of", "parameter"];

/// Sibling fields legal only on the `number` parameter variant.
const NUMBER_ONLY_FIELDS: &[&str] = &[
    "number",
    "not_parametrised",
    "variable",
    "formula",
    "dependent",
];

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Validate raw JSON into a typed export tree.
///
/// Rejects missing or foreign discriminants, out-of-range icon indices
/// (1..=4) and wire connector ids (1..=6), cross-variant parameter
/// fields, and duplicate entity numbers or icon indices. Unknown sibling
/// keys are accepted and preserved in extension bags.
pub fn validate(raw: Value) -> Result<ExportNode, ValidationError> {
    build_node("$", &raw)
}

fn build_node(path: &str, value: &Value) -> Result<ExportNode, ValidationError> {
    match value {
        Value::Object(obj) if obj.contains_key("blueprint") => {
            let bp_path = format!("{path}.blueprint");
            let content = as_object(&bp_path, &obj["blueprint"])?;
            check_blueprint(&bp_path, content)?;
            let env: BlueprintEnvelope =
                serde_json::from_value(value.clone()).map_err(|source| {
                    ValidationError::Decode {
                        path: path.to_string(),
                        source,
                    }
                })?;
            Ok(ExportNode::Blueprint(env))
        }
        Value::Object(obj) if obj.contains_key("blueprint_book") => {
            build_book(path, value, obj)
        }
        Value::Array(children) => {
            let mut built = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                built.push(build_node(&format!("{path}[{i}]"), child)?);
            }
            Ok(ExportNode::List(built))
        }
        other => Ok(ExportNode::Other(other.clone())),
    }
}

fn build_book(
    path: &str,
    value: &Value,
    obj: &JsonObject,
) -> Result<ExportNode, ValidationError> {
    let book_path = format!("{path}.blueprint_book");
    let content = as_object(&book_path, &obj["blueprint_book"])?;

    if let Some(item) = content.get("item") {
        let marker = as_str(&format!("{book_path}.item"), item)?;
        if marker != "blueprint-book" {
            return Err(ValidationError::BadDiscriminant {
                path: format!("{book_path}.item"),
                value: marker.to_string(),
                expected: "blueprint book marker",
            });
        }
    }
    if let Some(icons) = content.get("icons") {
        check_icons(&format!("{book_path}.icons"), icons)?;
    }

    // Validate and build the children first, then decode the book shell
    // without them so nested nodes go through this validator rather than
    // the lenient serde fallback.
    let raw_children = match content.get("blueprints") {
        Some(Value::Array(arr)) => Some(arr),
        Some(_) => {
            return Err(ValidationError::WrongType {
                path: format!("{book_path}.blueprints"),
                expected: "an array of export nodes",
            });
        }
        None => None,
    };

    let mut shell = value.clone();
    if let Some(book) = shell
        .get_mut("blueprint_book")
        .and_then(Value::as_object_mut)
    {
        book.remove("blueprints");
    }
    let mut env: BookEnvelope =
        serde_json::from_value(shell).map_err(|source| ValidationError::Decode {
            path: path.to_string(),
            source,
        })?;

    if let Some(children) = raw_children {
        let mut built = Vec::with_capacity(children.len());
        for (i, child) in children.iter().enumerate() {
            built.push(build_node(
                &format!("{book_path}.blueprints[{i}]"),
                child,
            )?);
        }
        env.blueprint_book.blueprints = Some(built);
    }
    Ok(ExportNode::Book(env))
}

// ---------------------------------------------------------------------------
// Blueprint constraint checks
// ---------------------------------------------------------------------------

fn check_blueprint(path: &str, content: &JsonObject) -> Result<(), ValidationError> {
    let marker_path = format!("{path}.item");
    let marker = as_str(&marker_path, require(path, content, "item")?)?;
    if marker != "blueprint" {
        return Err(ValidationError::BadDiscriminant {
            path: marker_path,
            value: marker.to_string(),
            expected: "blueprint marker",
        });
    }

    let version = require(path, content, "version")?;
    if version.as_u64().is_none() {
        return Err(ValidationError::WrongType {
            path: format!("{path}.version"),
            expected: "an unsigned 64-bit version number",
        });
    }

    if let Some(icons) = content.get("icons") {
        check_icons(&format!("{path}.icons"), icons)?;
    }
    if let Some(entities) = content.get("entities") {
        check_entities(&format!("{path}.entities"), entities)?;
    }
    if let Some(wires) = content.get("wires") {
        check_wires(&format!("{path}.wires"), wires)?;
    }
    if let Some(parameters) = content.get("parameters") {
        check_parameters(&format!("{path}.parameters"), parameters)?;
    }
    if let Some(schedules) = content.get("schedules") {
        check_schedules(&format!("{path}.schedules"), schedules)?;
    }
    Ok(())
}

fn check_icons(path: &str, icons: &Value) -> Result<(), ValidationError> {
    let list = as_array(path, icons)?;
    let mut seen = [false; 4];
    for (i, icon) in list.iter().enumerate() {
        let icon_path = format!("{path}[{i}]");
        let obj = as_object(&icon_path, icon)?;
        let index_path = format!("{icon_path}.index");
        let index = as_integer(&index_path, require(&icon_path, obj, "index")?)?;
        if !(1..=4).contains(&index) {
            return Err(ValidationError::OutOfRange {
                path: index_path,
                constraint: "icon index must be in 1..=4",
                got: index,
            });
        }
        let slot = (index - 1) as usize;
        if seen[slot] {
            return Err(ValidationError::DuplicateIconIndex {
                path: index_path,
                index: index as u64,
            });
        }
        seen[slot] = true;

        let signal_path = format!("{icon_path}.signal");
        let signal = as_object(&signal_path, require(&icon_path, obj, "signal")?)?;
        check_signal(&signal_path, signal)?;
    }
    Ok(())
}

fn check_signal(path: &str, signal: &JsonObject) -> Result<(), ValidationError> {
    let kind_path = format!("{path}.type");
    let kind = as_str(&kind_path, require(path, signal, "type")?)?;
    check_membership(&kind_path, kind, SIGNAL_TYPES, "signal category")?;
    if let Some(quality) = signal.get("quality").filter(|v| !v.is_null()) {
        let quality_path = format!("{path}.quality");
        let quality = as_str(&quality_path, quality)?;
        check_membership(&quality_path, quality, QUALITIES, "quality tier")?;
    }
    if let Some(comparator) = signal.get("comparator").filter(|v| !v.is_null()) {
        let comparator_path = format!("{path}.comparator");
        let comparator = as_str(&comparator_path, comparator)?;
        check_membership(&comparator_path, comparator, COMPARATORS, "comparator")?;
    }
    Ok(())
}

fn check_entities(path: &str, entities: &Value) -> Result<(), ValidationError> {
    let list = as_array(path, entities)?;
    let mut seen = std::collections::BTreeSet::new();
    for (i, entity) in list.iter().enumerate() {
        let entity_path = format!("{path}[{i}]");
        let obj = as_object(&entity_path, entity)?;
        let number_path = format!("{entity_path}.entity_number");
        let number = require(&entity_path, obj, "entity_number")?
            .as_u64()
            .ok_or_else(|| ValidationError::WrongType {
                path: number_path.clone(),
                expected: "an unsigned entity number",
            })?;
        if !seen.insert(number) {
            return Err(ValidationError::DuplicateEntityNumber {
                path: number_path,
                number,
            });
        }
        as_str(
            &format!("{entity_path}.name"),
            require(&entity_path, obj, "name")?,
        )?;
        as_object(
            &format!("{entity_path}.position"),
            require(&entity_path, obj, "position")?,
        )?;
    }
    Ok(())
}

fn check_wires(path: &str, wires: &Value) -> Result<(), ValidationError> {
    let list = as_array(path, wires)?;
    for (i, wire) in list.iter().enumerate() {
        let wire_path = format!("{path}[{i}]");
        let parts = as_array(&wire_path, wire)?;
        if parts.len() != 4 {
            return Err(ValidationError::WrongType {
                path: wire_path,
                expected: "a [entity, connector, entity, connector] quadruple",
            });
        }
        for connector_slot in [1usize, 3] {
            let connector_path = format!("{wire_path}[{connector_slot}]");
            let connector = as_integer(&connector_path, &parts[connector_slot])?;
            if !(1..=6).contains(&connector) {
                return Err(ValidationError::OutOfRange {
                    path: connector_path,
                    constraint: "wire connector id must be in 1..=6",
                    got: connector,
                });
            }
        }
    }
    Ok(())
}

fn check_parameters(path: &str, parameters: &Value) -> Result<(), ValidationError> {
    let list = as_array(path, parameters)?;
    for (i, parameter) in list.iter().enumerate() {
        let param_path = format!("{path}[{i}]");
        let obj = as_object(&param_path, parameter)?;
        let kind_path = format!("{param_path}.type");
        let kind = as_str(&kind_path, require(&param_path, obj, "type")?)?;
        let (variant, foreign) = match kind {
            "id" => ("id", NUMBER_ONLY_FIELDS),
            "number" => ("number", ID_ONLY_FIELDS),
            other => {
                return Err(ValidationError::BadDiscriminant {
                    path: kind_path,
                    value: other.to_string(),
                    expected: "parameter discriminant (`id` or `number`)",
                });
            }
        };
        for field in obj.keys() {
            if foreign.contains(&field.as_str()) {
                return Err(ValidationError::ForeignField {
                    path: param_path.clone(),
                    field: field.clone(),
                    variant,
                });
            }
        }
        if kind == "id" {
            as_str(
                &format!("{param_path}.id"),
                require(&param_path, obj, "id")?,
            )?;
        }
    }
    Ok(())
}

fn check_schedules(path: &str, schedules: &Value) -> Result<(), ValidationError> {
    let list = as_array(path, schedules)?;
    for (i, assignment) in list.iter().enumerate() {
        let assignment_path = format!("{path}[{i}]");
        let obj = as_object(&assignment_path, assignment)?;
        as_array(
            &format!("{assignment_path}.locomotives"),
            require(&assignment_path, obj, "locomotives")?,
        )?;
        let schedule_path = format!("{assignment_path}.schedule");
        let schedule = as_object(&schedule_path, require(&assignment_path, obj, "schedule")?)?;
        let records_path = format!("{schedule_path}.records");
        let records = as_array(&records_path, require(&schedule_path, schedule, "records")?)?;
        for (r, record) in records.iter().enumerate() {
            let record_path = format!("{records_path}[{r}]");
            let record = as_object(&record_path, record)?;
            if let Some(waits) = record.get("wait_conditions") {
                check_wait_conditions(&format!("{record_path}.wait_conditions"), waits)?;
            }
        }
    }
    Ok(())
}

fn check_wait_conditions(path: &str, waits: &Value) -> Result<(), ValidationError> {
    let list = as_array(path, waits)?;
    for (i, wait) in list.iter().enumerate() {
        let wait_path = format!("{path}[{i}]");
        let obj = as_object(&wait_path, wait)?;
        let kind_path = format!("{wait_path}.type");
        let kind = as_str(&kind_path, require(&wait_path, obj, "type")?)?;
        check_membership(&kind_path, kind, WAIT_CONDITION_KINDS, "wait condition")?;
        if let Some(compare) = obj.get("compare_type") {
            let compare_path = format!("{wait_path}.compare_type");
            let compare = as_str(&compare_path, compare)?;
            check_membership(&compare_path, compare, &["and", "or"], "compare type")?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Referential integrity (caller concern, spec'd separately)
// ---------------------------------------------------------------------------

/// Entity numbers referenced by native wires but declared by no entity.
///
/// Wire endpoint integrity is not a schema invariant; callers that care
/// run this check after [`validate`].
pub fn check_wire_references(blueprint: &crate::Blueprint) -> Vec<u64> {
    let declared: std::collections::BTreeSet<u64> = blueprint
        .entities
        .iter()
        .flatten()
        .map(|e| e.entity_number)
        .collect();
    let mut unknown = Vec::new();
    for wire in blueprint.wires.iter().flatten() {
        for endpoint in [wire.source_entity(), wire.target_entity()] {
            if !declared.contains(&endpoint) && !unknown.contains(&endpoint) {
                unknown.push(endpoint);
            }
        }
    }
    unknown
}

// ---------------------------------------------------------------------------
// Small accessors
// ---------------------------------------------------------------------------

fn require<'a>(
    path: &str,
    obj: &'a JsonObject,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    obj.get(field).ok_or_else(|| ValidationError::MissingField {
        path: path.to_string(),
        field,
    })
}

fn as_object<'a>(path: &str, value: &'a Value) -> Result<&'a JsonObject, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "an object",
    })
}

fn as_array<'a>(path: &str, value: &'a Value) -> Result<&'a Vec<Value>, ValidationError> {
    value.as_array().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "an array",
    })
}

fn as_str<'a>(path: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "a string",
    })
}

fn as_integer(path: &str, value: &Value) -> Result<i128, ValidationError> {
    if let Some(u) = value.as_u64() {
        Ok(i128::from(u))
    } else if let Some(i) = value.as_i64() {
        Ok(i128::from(i))
    } else {
        Err(ValidationError::WrongType {
            path: path.to_string(),
            expected: "an integer",
        })
    }
}

fn check_membership(
    path: &str,
    value: &str,
    table: &[&str],
    expected: &'static str,
) -> Result<(), ValidationError> {
    if table.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::BadDiscriminant {
            path: path.to_string(),
            value: value.to_string(),
            expected,
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
