//! AST node definitions
//!
//! A tree is an ordered sequence of root nodes. Containers (`logical` and
//! `embedded` nodes) own their children exclusively; there are no back
//! references.

use super::operator::{ComparisonOperator, EmbeddedOperator, LogicalOperator};
use super::value::ConditionValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier, unique across a whole tree
pub type NodeId = u64;

/// AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AstNode {
    /// Leaf comparison on a field
    Condition(ConditionNode),
    /// `$and` / `$or` / `$not` over child nodes
    Logical(LogicalNode),
    /// `$some` / `$every` / `$none` over an array field
    Embedded(EmbeddedNode),
}

/// Leaf comparison, e.g. `{ "age": { "$gte": 18 } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNode {
    pub id: NodeId,
    /// Nested field names; empty means "at the current context"
    pub field_path: Vec<String>,
    pub operator: ComparisonOperator,
    pub value: ConditionValue,
}

/// Logical combination of child nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalNode {
    pub id: NodeId,
    pub operator: LogicalOperator,
    pub children: Vec<AstNode>,
}

/// Sub-filter evaluated against the elements of an array field.
///
/// Field paths inside `subtree` are relative to an array element, not to the
/// outer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedNode {
    pub id: NodeId,
    pub field_path: Vec<String>,
    pub operator: EmbeddedOperator,
    pub subtree: Vec<AstNode>,
}

/// Node discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Condition,
    Logical,
    Embedded,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Condition => f.write_str("condition"),
            NodeType::Logical => f.write_str("logical"),
            NodeType::Embedded => f.write_str("embedded"),
        }
    }
}

impl AstNode {
    /// Create a condition node
    pub fn condition(
        id: NodeId,
        field_path: Vec<String>,
        operator: ComparisonOperator,
        value: ConditionValue,
    ) -> Self {
        AstNode::Condition(ConditionNode {
            id,
            field_path,
            operator,
            value,
        })
    }

    /// Create a logical node
    pub fn logical(id: NodeId, operator: LogicalOperator, children: Vec<AstNode>) -> Self {
        AstNode::Logical(LogicalNode {
            id,
            operator,
            children,
        })
    }

    /// Create an embedded node
    pub fn embedded(
        id: NodeId,
        field_path: Vec<String>,
        operator: EmbeddedOperator,
        subtree: Vec<AstNode>,
    ) -> Self {
        AstNode::Embedded(EmbeddedNode {
            id,
            field_path,
            operator,
            subtree,
        })
    }

    pub fn id(&self) -> NodeId {
        match self {
            AstNode::Condition(node) => node.id,
            AstNode::Logical(node) => node.id,
            AstNode::Embedded(node) => node.id,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            AstNode::Condition(_) => NodeType::Condition,
            AstNode::Logical(_) => NodeType::Logical,
            AstNode::Embedded(_) => NodeType::Embedded,
        }
    }

    /// Returns true for nodes that can hold children
    pub fn is_container(&self) -> bool {
        !matches!(self, AstNode::Condition(_))
    }

    /// Child list of a container, `None` for leaves
    pub fn children(&self) -> Option<&[AstNode]> {
        match self {
            AstNode::Condition(_) => None,
            AstNode::Logical(node) => Some(&node.children),
            AstNode::Embedded(node) => Some(&node.subtree),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<AstNode>> {
        match self {
            AstNode::Condition(_) => None,
            AstNode::Logical(node) => Some(&mut node.children),
            AstNode::Embedded(node) => Some(&mut node.subtree),
        }
    }

    /// Depth-first pre-order search for `id` within `nodes`
    pub fn find<'a>(nodes: &'a [AstNode], id: NodeId) -> Option<&'a AstNode> {
        for node in nodes {
            if node.id() == id {
                return Some(node);
            }
            if let Some(found) = node.children().and_then(|children| Self::find(children, id)) {
                return Some(found);
            }
        }
        None
    }

    pub(crate) fn find_mut(nodes: &mut [AstNode], id: NodeId) -> Option<&mut AstNode> {
        for node in nodes.iter_mut() {
            if node.id() == id {
                return Some(node);
            }
            if let Some(found) = node
                .children_mut()
                .and_then(|children| Self::find_mut(children, id))
            {
                return Some(found);
            }
        }
        None
    }

    /// Remove the first node matching `id` from `nodes` or any descendant list
    pub(crate) fn remove_from(nodes: &mut Vec<AstNode>, id: NodeId) -> Option<AstNode> {
        if let Some(pos) = nodes.iter().position(|node| node.id() == id) {
            return Some(nodes.remove(pos));
        }
        nodes
            .iter_mut()
            .filter_map(AstNode::children_mut)
            .find_map(|children| Self::remove_from(children, id))
    }

    /// Collect ids of `nodes` and all their descendants in pre-order
    pub fn collect_ids(nodes: &[AstNode], out: &mut Vec<NodeId>) {
        for node in nodes {
            out.push(node.id());
            if let Some(children) = node.children() {
                Self::collect_ids(children, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<AstNode> {
        vec![
            AstNode::condition(
                1,
                vec!["age".to_string()],
                ComparisonOperator::Gte,
                ConditionValue::from(18i64),
            ),
            AstNode::logical(
                2,
                LogicalOperator::Or,
                vec![
                    AstNode::condition(
                        3,
                        vec!["country".to_string()],
                        ComparisonOperator::Eq,
                        ConditionValue::from("US"),
                    ),
                    AstNode::embedded(
                        4,
                        vec!["tags".to_string()],
                        EmbeddedOperator::Some,
                        vec![AstNode::condition(
                            5,
                            vec!["name".to_string()],
                            ComparisonOperator::Eq,
                            ConditionValue::from("vip"),
                        )],
                    ),
                ],
            ),
        ]
    }

    #[test]
    fn test_node_accessors() {
        let tree = sample_tree();
        assert_eq!(tree[0].id(), 1);
        assert_eq!(tree[0].node_type(), NodeType::Condition);
        assert!(!tree[0].is_container());
        assert!(tree[0].children().is_none());

        assert_eq!(tree[1].node_type(), NodeType::Logical);
        assert!(tree[1].is_container());
        assert_eq!(tree[1].children().map(<[AstNode]>::len), Some(2));
    }

    #[test]
    fn test_find_pre_order() {
        let tree = sample_tree();
        assert_eq!(AstNode::find(&tree, 5).map(AstNode::id), Some(5));
        assert_eq!(
            AstNode::find(&tree, 4).map(AstNode::node_type),
            Some(NodeType::Embedded)
        );
        assert!(AstNode::find(&tree, 99).is_none());
    }

    #[test]
    fn test_remove_nested() {
        let mut tree = sample_tree();
        let removed = AstNode::remove_from(&mut tree, 4);
        assert_eq!(removed.map(|n| n.id()), Some(4));
        assert!(AstNode::find(&tree, 5).is_none());
        assert!(AstNode::remove_from(&mut tree, 4).is_none());
    }

    #[test]
    fn test_collect_ids() {
        let tree = sample_tree();
        let mut ids = Vec::new();
        AstNode::collect_ids(&tree, &mut ids);
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_node_serde_tagged() {
        let node = AstNode::condition(
            7,
            vec!["a".to_string(), "b".to_string()],
            ComparisonOperator::In,
            ConditionValue::from(vec![1i64, 2]),
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "condition",
                "id": 7,
                "fieldPath": ["a", "b"],
                "operator": "$in",
                "value": [1, 2]
            })
        );

        let back: AstNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
