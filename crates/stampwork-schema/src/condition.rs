//! Circuit conditions: decider, arithmetic, and the shared operand model.

use serde::{Deserialize, Serialize};

use crate::signal::{Comparator, Quality, SignalId};

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Arithmetic operations supported by circuit combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "^")]
    Power,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "XOR")]
    Xor,
}

/// Boolean operator chaining sequential conditions.
///
/// Mirrors short-circuit evaluation at the consuming simulator; this crate
/// never evaluates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareType {
    And,
    Or,
}

// ---------------------------------------------------------------------------
// Operand plumbing
// ---------------------------------------------------------------------------

/// Which circuit wires an operand draws values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<bool>,
}

/// One value or a sequence of values.
///
/// Control behaviours serialize decider conditions and outputs either as a
/// single object or as an array; both forms must survive a round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Iterate the contained values in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v).iter(),
            OneOrMany::Many(vs) => vs.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// Simplified condition payload used for logistic and circuit checks.
///
/// Pairs two operands (each a signal or a literal constant) with a
/// comparator. `second_signal` takes precedence over `constant` when both
/// are present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal: Option<SignalId>,
    /// Copies operand counts from input wires instead of constants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_from_input: Option<bool>,
    /// Quality discriminator used by quality-aware conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_comparator: Option<Comparator>,
}

/// Decider combinator condition: the shared payload plus per-operand wire
/// selection and the chaining operator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeciderCondition {
    #[serde(flatten)]
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal_networks: Option<NetworkSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal_networks: Option<NetworkSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_type: Option<CompareType>,
}

/// Decider combinator output description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeciderOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_count_from_input: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<NetworkSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<i64>,
}

/// Arithmetic combinator configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArithmeticCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal_networks: Option<NetworkSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_constant: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal_networks: Option<NetworkSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_constant: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<ArithmeticOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_signal_networks: Option<NetworkSelection>,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalType;

    #[test]
    fn shift_operators_round_trip() {
        for (json, op) in [("\"<<\"", ArithmeticOp::ShiftLeft), ("\">>\"", ArithmeticOp::ShiftRight)]
        {
            let parsed: ArithmeticOp = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, op);
            assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
        }
    }

    #[test]
    fn decider_condition_flattens_shared_payload() {
        let json = r#"{
            "first_signal": {"name": "signal-A", "type": "virtual"},
            "comparator": ">",
            "constant": 10,
            "compare_type": "or"
        }"#;
        let dc: DeciderCondition = serde_json::from_str(json).unwrap();
        assert_eq!(
            dc.condition.first_signal,
            Some(SignalId::named("signal-A", SignalType::Virtual))
        );
        assert_eq!(dc.condition.constant, Some(10));
        assert_eq!(dc.compare_type, Some(CompareType::Or));
    }

    #[test]
    fn one_or_many_accepts_both_shapes() {
        let one: OneOrMany<DeciderOutput> = serde_json::from_str(r#"{"constant": 1}"#).unwrap();
        assert_eq!(one.len(), 1);
        let many: OneOrMany<DeciderOutput> =
            serde_json::from_str(r#"[{"constant": 1}, {"constant": 2}]"#).unwrap();
        assert_eq!(many.len(), 2);
        // The single-object form re-encodes as an object, not a one-element array.
        assert!(serde_json::to_string(&one).unwrap().starts_with('{'));
    }

    #[test]
    fn arithmetic_condition_empty_is_all_absent() {
        let ac: ArithmeticCondition = serde_json::from_str("{}").unwrap();
        assert_eq!(serde_json::to_string(&ac).unwrap(), "{}");
    }
}
