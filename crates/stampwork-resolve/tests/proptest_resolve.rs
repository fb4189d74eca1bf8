//! Property-based tests for the resolution walk.
//!
//! Uses proptest to generate random export trees and mappings, then
//! verify the rebuild invariants hold.

use proptest::prelude::*;
use stampwork_resolve::{NumberOverride, ParameterMapping, classify, resolve_export};
use stampwork_schema::{
    Blueprint, BlueprintBook, BlueprintEnvelope, BookEnvelope, ExportNode, NumberParameter,
    Parameter,
};

// ===========================================================================
// Generators
// ===========================================================================

/// Tokens drawn from a small pool so mappings actually hit.
fn arb_token() -> impl Strategy<Value = String> {
    (0..6u8).prop_map(|n| format!("{}", 1000 + u32::from(n)))
}

fn arb_parameter() -> impl Strategy<Value = Parameter> {
    prop_oneof![
        // number parameter with a token
        arb_token().prop_map(|token| {
            Parameter::Number(NumberParameter {
                name: Some("P".to_string()),
                number: Some(token),
                ..Default::default()
            })
        }),
        // number parameter without a token
        Just(Parameter::Number(NumberParameter::default())),
    ]
}

fn arb_blueprint_node() -> impl Strategy<Value = ExportNode> {
    prop_oneof![
        // parameterized blueprint
        proptest::collection::vec(arb_parameter(), 0..4).prop_map(|params| {
            let mut bp = Blueprint::new(1);
            bp.parameters = Some(params);
            ExportNode::Blueprint(BlueprintEnvelope::new(bp))
        }),
        // blueprint without a parameters field
        Just(ExportNode::Blueprint(BlueprintEnvelope::new(
            Blueprint::new(1)
        ))),
        // foreign payload
        Just(ExportNode::Other(serde_json::json!({
            "deconstruction_planner": {"settings": {}}
        }))),
    ]
}

/// Trees of books up to the given depth, blueprints at the leaves.
fn arb_tree(depth: u32) -> BoxedStrategy<ExportNode> {
    let leaf = arb_blueprint_node();
    leaf.prop_recursive(depth, 24, 4, |inner| {
        proptest::collection::vec(inner, 0..4).prop_map(|children| {
            let mut book = BlueprintBook::default();
            book.blueprints = Some(children);
            ExportNode::Book(BookEnvelope::new(book))
        })
    })
    .boxed()
}

fn arb_mapping() -> impl Strategy<Value = ParameterMapping> {
    proptest::collection::vec((arb_token(), arb_token()), 0..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(token, replacement)| {
                (
                    token,
                    NumberOverride {
                        number: Some(replacement),
                        ..Default::default()
                    },
                )
            })
            .collect()
    })
}

// ===========================================================================
// Helpers
// ===========================================================================

fn count_parameterized(node: &ExportNode) -> u64 {
    match classify(node) {
        stampwork_resolve::NodeKind::Parameterized(_) => 1,
        stampwork_resolve::NodeKind::Container(children) => {
            children.iter().map(count_parameterized).sum()
        }
        stampwork_resolve::NodeKind::Other => 0,
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// An empty mapping is the identity transform.
    #[test]
    fn empty_mapping_is_identity(root in arb_tree(3)) {
        let out = resolve_export(&root, &ParameterMapping::new());
        prop_assert_eq!(out.result, root);
    }

    /// Resolution is deterministic: equal inputs give equal outputs.
    #[test]
    fn resolution_is_deterministic(root in arb_tree(3), mapping in arb_mapping()) {
        let a = resolve_export(&root, &mapping);
        let b = resolve_export(&root, &mapping);
        prop_assert_eq!(a.result, b.result);
        prop_assert_eq!(a.stats, b.stats);
    }

    /// Counter ordering always holds: updates <= number params <= params.
    #[test]
    fn stats_are_consistent(root in arb_tree(3), mapping in arb_mapping()) {
        let out = resolve_export(&root, &mapping);
        prop_assert!(out.stats.is_consistent());
    }

    /// The blueprint counter matches a recursive count of nodes the
    /// classifier marks as resolution targets.
    #[test]
    fn blueprint_count_matches_classifier(root in arb_tree(3), mapping in arb_mapping()) {
        let out = resolve_export(&root, &mapping);
        prop_assert_eq!(out.stats.blueprints, count_parameterized(&root));
    }

    /// Rebuilding never changes tree shape, only parameter contents.
    #[test]
    fn tree_shape_is_preserved(root in arb_tree(3), mapping in arb_mapping()) {
        let out = resolve_export(&root, &mapping);
        prop_assert_eq!(shape(&out.result), shape(&root));
    }
}

/// Structural fingerprint ignoring parameter contents.
fn shape(node: &ExportNode) -> String {
    match node {
        ExportNode::Blueprint(_) => "B".to_string(),
        ExportNode::Book(env) => match &env.blueprint_book.blueprints {
            Some(children) => format!(
                "K({})",
                children.iter().map(|c| shape(c)).collect::<Vec<_>>().join(",")
            ),
            None => "K".to_string(),
        },
        ExportNode::List(children) => format!(
            "L({})",
            children.iter().map(|c| shape(c)).collect::<Vec<_>>().join(",")
        ),
        ExportNode::Other(_) => "O".to_string(),
    }
}
