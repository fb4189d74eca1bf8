//! Node classification for the resolution walk.

use stampwork_schema::{BlueprintEnvelope, ExportNode};

/// How the walker treats a node.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    /// A blueprint carrying a `parameters` field (possibly empty): the
    /// resolution target.
    Parameterized(&'a BlueprintEnvelope),
    /// A node whose children are walked: a book's `blueprints` list or a
    /// bare list of nodes.
    Container(&'a [ExportNode]),
    /// Everything else passes through untouched, including blueprints
    /// without a `parameters` field.
    Other,
}

/// Classify a node. The gate for [`NodeKind::Parameterized`] is field
/// presence, not content: a present-but-empty parameter list qualifies.
pub fn classify(node: &ExportNode) -> NodeKind<'_> {
    match node {
        ExportNode::Blueprint(env) if env.has_parameters() => NodeKind::Parameterized(env),
        ExportNode::Book(env) => {
            NodeKind::Container(env.blueprint_book.blueprints.as_deref().unwrap_or(&[]))
        }
        ExportNode::List(children) => NodeKind::Container(children),
        _ => NodeKind::Other,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stampwork_schema::{Blueprint, BlueprintEnvelope};

    fn blueprint_node(parameters: Option<Vec<stampwork_schema::Parameter>>) -> ExportNode {
        let mut bp = Blueprint::new(1);
        bp.parameters = parameters;
        ExportNode::Blueprint(BlueprintEnvelope::new(bp))
    }

    #[test]
    fn empty_parameter_list_still_qualifies() {
        assert!(matches!(
            classify(&blueprint_node(Some(Vec::new()))),
            NodeKind::Parameterized(_)
        ));
    }

    #[test]
    fn absent_parameters_is_other() {
        assert!(matches!(classify(&blueprint_node(None)), NodeKind::Other));
    }

    #[test]
    fn book_without_children_is_empty_container() {
        let raw = serde_json::json!({"blueprint_book": {"item": "blueprint-book"}});
        let node: ExportNode = serde_json::from_value(raw).unwrap();
        let NodeKind::Container(children) = classify(&node) else {
            panic!("expected container");
        };
        assert!(children.is_empty());
    }

    #[test]
    fn foreign_payloads_are_other() {
        let node = ExportNode::Other(serde_json::json!({"upgrade_planner": {}}));
        assert!(matches!(classify(&node), NodeKind::Other));
    }
}
