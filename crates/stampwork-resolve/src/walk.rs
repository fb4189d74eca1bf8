//! Iterative pre-order walk over an export tree.
//!
//! The walk rebuilds rather than mutates: containers are reconstructed
//! around resolved children, pass-through nodes are cloned verbatim, and
//! the input tree is left untouched. An explicit work stack keeps
//! arbitrarily deep book nesting off the call stack.

use stampwork_schema::{BookEnvelope, ExportNode};

use crate::classify::{NodeKind, classify};
use crate::mapping::ParameterMapping;
use crate::resolve::resolve_parameters;
use crate::stats::ResolveStats;

/// Output of [`resolve_export`]: the rebuilt tree plus pass statistics.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: ExportNode,
    pub stats: ResolveStats,
}

enum Frame<'a> {
    Visit(&'a ExportNode),
    /// Reassemble a book from the last `children` rebuilt nodes. `had`
    /// records whether the source book carried a `blueprints` field at
    /// all, so absent stays absent instead of becoming present-empty.
    RebuildBook {
        shell: &'a BookEnvelope,
        children: usize,
        had: bool,
    },
    RebuildList {
        children: usize,
    },
}

/// Resolve every parameterized blueprint in `root` against `mapping`.
///
/// Children are visited in document order. Nodes the classifier marks
/// pass-through survive structurally equal, unknown fields included.
pub fn resolve_export(root: &ExportNode, mapping: &ParameterMapping) -> Resolution {
    let mut stats = ResolveStats::default();
    let mut work = vec![Frame::Visit(root)];
    // Rebuilt nodes in document order; rebuild frames consume their
    // children from the tail.
    let mut done: Vec<ExportNode> = Vec::new();

    while let Some(frame) = work.pop() {
        let emitted = match frame {
            Frame::Visit(node) => match node {
                ExportNode::Book(shell) => {
                    let had = shell.blueprint_book.blueprints.is_some();
                    let children = shell.blueprint_book.blueprints.as_deref().unwrap_or(&[]);
                    work.push(Frame::RebuildBook {
                        shell,
                        children: children.len(),
                        had,
                    });
                    // Reversed so the first child is popped first.
                    for child in children.iter().rev() {
                        work.push(Frame::Visit(child));
                    }
                    None
                }
                ExportNode::List(children) => {
                    work.push(Frame::RebuildList {
                        children: children.len(),
                    });
                    for child in children.iter().rev() {
                        work.push(Frame::Visit(child));
                    }
                    None
                }
                leaf => match classify(leaf) {
                    NodeKind::Parameterized(env) => {
                        stats.blueprints += 1;
                        let mut env = env.clone();
                        let parameters = env.blueprint.parameters.take().unwrap_or_default();
                        env.blueprint.parameters =
                            Some(resolve_parameters(parameters, mapping, &mut stats));
                        Some(ExportNode::Blueprint(env))
                    }
                    _ => Some(leaf.clone()),
                },
            },
            Frame::RebuildBook {
                shell,
                children,
                had,
            } => {
                let rebuilt = done.split_off(done.len() - children);
                let mut env = shell.clone();
                env.blueprint_book.blueprints = had.then_some(rebuilt);
                Some(ExportNode::Book(env))
            }
            Frame::RebuildList { children } => {
                Some(ExportNode::List(done.split_off(done.len() - children)))
            }
        };

        if let Some(node) = emitted {
            // The last emission with no frames left is the rebuilt root.
            if work.is_empty() {
                return Resolution {
                    result: node,
                    stats,
                };
            }
            done.push(node);
        }
    }

    // Unreachable: the root node's emission drains the work stack and
    // returns from inside the loop.
    Resolution {
        result: ExportNode::List(done),
        stats,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::NumberOverride;
    use serde_json::json;
    use stampwork_schema::Parameter;

    fn node(raw: serde_json::Value) -> ExportNode {
        serde_json::from_value(raw).unwrap()
    }

    fn parameterized(token: &str) -> serde_json::Value {
        json!({"blueprint": {"item": "blueprint", "version": 1,
            "parameters": [{"type": "number", "name": "N", "number": token}]}})
    }

    fn mapping_for(token: &str, replacement: &str) -> ParameterMapping {
        [(
            token.to_string(),
            NumberOverride {
                number: Some(replacement.to_string()),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect()
    }

    fn first_token(node: &ExportNode) -> Option<&str> {
        let ExportNode::Blueprint(env) = node else {
            return None;
        };
        let Parameter::Number(p) = env.blueprint.parameters.as_ref()?.first()? else {
            return None;
        };
        p.number.as_deref()
    }

    #[test]
    fn single_blueprint_is_resolved() {
        let root = node(parameterized("42"));
        let out = resolve_export(&root, &mapping_for("42", "0"));
        assert_eq!(first_token(&out.result), Some("0"));
        assert_eq!(out.stats.blueprints, 1);
        // Input untouched.
        assert_eq!(first_token(&root), Some("42"));
    }

    #[test]
    fn empty_mapping_is_identity() {
        let root = node(json!({"blueprint_book": {"item": "blueprint-book", "blueprints": [
            parameterized("1"),
            {"blueprint": {"item": "blueprint", "version": 1}},
            {"deconstruction_planner": {"settings": {}}}
        ]}}));
        let out = resolve_export(&root, &ParameterMapping::new());
        assert_eq!(out.result, root);
        assert_eq!(out.stats.blueprints, 1);
        assert_eq!(out.stats.parameters, 1);
    }

    #[test]
    fn nested_books_reach_every_blueprint() {
        let root = node(json!({"blueprint_book": {"item": "blueprint-book", "blueprints": [
            parameterized("1"),
            {"blueprint_book": {"item": "blueprint-book", "blueprints": [
                parameterized("2"),
                {"blueprint_book": {"item": "blueprint-book", "blueprints": [
                    parameterized("3")
                ]}}
            ]}}
        ]}}));
        let out = resolve_export(&root, &ParameterMapping::new());
        assert_eq!(out.stats.blueprints, 3);
        assert_eq!(out.stats.parameters, 3);
        assert_eq!(out.stats.number_parameters, 3);
    }

    #[test]
    fn document_order_drives_the_tally() {
        let root = node(json!([parameterized("b"), parameterized("a"), parameterized("b")]));
        let mut mapping = ParameterMapping::new();
        mapping.insert("a", NumberOverride::default());
        mapping.insert("b", NumberOverride::default());
        let out = resolve_export(&root, &mapping);
        let order: Vec<&str> = out.stats.parameter_update_instances.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["b", "a"]);
        assert_eq!(out.stats.parameter_update_instances.get("b"), 2);
    }

    #[test]
    fn book_without_blueprints_field_keeps_it_absent() {
        let root = node(json!({"blueprint_book": {"item": "blueprint-book", "label": "Empty"}}));
        let out = resolve_export(&root, &ParameterMapping::new());
        let ExportNode::Book(env) = out.result else {
            panic!("expected book");
        };
        assert!(env.blueprint_book.blueprints.is_none());
    }

    #[test]
    fn blueprint_without_parameters_passes_through_uncounted() {
        let root = node(json!({"blueprint": {"item": "blueprint", "version": 1}}));
        let out = resolve_export(&root, &mapping_for("1", "2"));
        assert_eq!(out.result, root);
        assert_eq!(out.stats.blueprints, 0);
    }

    #[test]
    fn book_sibling_fields_survive_the_rebuild() {
        let root = node(json!({"blueprint_book": {
            "item": "blueprint-book", "label": "Kit", "active_index": 2,
            "custom_tag": true,
            "blueprints": [parameterized("9")]
        }, "index": 4}));
        let out = resolve_export(&root, &mapping_for("9", "10"));
        let ExportNode::Book(env) = out.result else {
            panic!("expected book");
        };
        assert_eq!(env.blueprint_book.label.as_deref(), Some("Kit"));
        assert_eq!(env.blueprint_book.active_index, Some(2));
        assert_eq!(env.blueprint_book.extra["custom_tag"], true);
        assert_eq!(env.index, Some(4));
    }
}
