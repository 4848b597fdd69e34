//! AST → condition object
//!
//! Each node becomes a small object nested under its field path. Sibling
//! results are deep-merged, so conditions on `store.id` and `store.name`
//! end up in a single `store` object. Containers that produce nothing are
//! pruned from the output.

use crate::ast::{AstNode, LogicalOperator};
use serde_json::{Map, Value};

/// Deserialize a whole tree. Returns `None` when nothing survives pruning.
pub fn deserialize(nodes: &[AstNode]) -> Option<Value> {
    let merged = deserialize_nodes(nodes);
    if merged.is_empty() {
        None
    } else {
        Some(Value::Object(merged))
    }
}

/// Deserialize a node list and deep-merge the results left to right
pub fn deserialize_nodes(nodes: &[AstNode]) -> Map<String, Value> {
    let mut merged = Map::new();
    for object in nodes.iter().map(deserialize_node) {
        if !object.is_empty() {
            deep_merge(&mut merged, object);
        }
    }
    merged
}

/// Deserialize a single node. An empty map means the node contributes nothing.
pub fn deserialize_node(node: &AstNode) -> Map<String, Value> {
    match node {
        AstNode::Condition(condition) => {
            let inner = single(condition.operator.as_str(), condition.value.to_json());
            nest(&condition.field_path, inner)
        }
        AstNode::Logical(logical) => match logical.operator {
            LogicalOperator::Not => {
                let merged = deserialize_nodes(&logical.children);
                if merged.is_empty() {
                    Map::new()
                } else {
                    single(logical.operator.as_str(), Value::Object(merged))
                }
            }
            LogicalOperator::And | LogicalOperator::Or => {
                // Children stay separate; order is significant
                let items: Vec<Value> = logical
                    .children
                    .iter()
                    .map(deserialize_node)
                    .filter(|object| !object.is_empty())
                    .map(Value::Object)
                    .collect();
                if items.is_empty() {
                    Map::new()
                } else {
                    single(logical.operator.as_str(), Value::Array(items))
                }
            }
        },
        AstNode::Embedded(embedded) => {
            let merged = deserialize_nodes(&embedded.subtree);
            if merged.is_empty() {
                Map::new()
            } else {
                let inner = single(embedded.operator.as_str(), Value::Object(merged));
                nest(&embedded.field_path, inner)
            }
        }
    }
}

/// Merge `source` into `target`. Objects present on both sides merge
/// recursively; any other incoming value overwrites.
pub fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        match incoming {
            Value::Object(incoming) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => deep_merge(existing, incoming),
                _ => {
                    target.insert(key, Value::Object(incoming));
                }
            },
            other => {
                target.insert(key, other);
            }
        }
    }
}

fn single(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

/// Wrap `inner` in one object per path segment, outermost first
fn nest(path: &[String], inner: Map<String, Value>) -> Map<String, Value> {
    path.iter()
        .rev()
        .fold(inner, |acc, segment| single(segment, Value::Object(acc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOperator, ConditionValue, EmbeddedOperator};
    use serde_json::json;

    fn condition(id: u64, path: &[&str], op: ComparisonOperator, value: Value) -> AstNode {
        AstNode::condition(
            id,
            path.iter().map(|s| s.to_string()).collect(),
            op,
            ConditionValue::from_json(value),
        )
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_condition_nests_under_path() {
        let node = condition(1, &["a", "b"], ComparisonOperator::Eq, json!(1));
        assert_eq!(
            Value::Object(deserialize_node(&node)),
            json!({ "a": { "b": { "$eq": 1 } } })
        );
    }

    #[test]
    fn test_condition_with_empty_path() {
        let node = condition(1, &[], ComparisonOperator::Exists, json!(true));
        assert_eq!(Value::Object(deserialize_node(&node)), json!({ "$exists": true }));
    }

    #[test]
    fn test_siblings_deep_merge() {
        let nodes = vec![
            condition(1, &["feedback", "store", "id"], ComparisonOperator::Eq, json!(7)),
            condition(2, &["feedback", "store", "name"], ComparisonOperator::Ilike, json!("%a%")),
        ];
        assert_eq!(
            deserialize(&nodes),
            Some(json!({
                "feedback": { "store": { "id": { "$eq": 7 }, "name": { "$ilike": "%a%" } } }
            }))
        );
    }

    #[test]
    fn test_and_keeps_children_separate() {
        let node = AstNode::logical(
            1,
            LogicalOperator::And,
            vec![
                condition(2, &["x"], ComparisonOperator::Eq, json!(1)),
                AstNode::logical(3, LogicalOperator::Or, vec![]),
                condition(4, &["y"], ComparisonOperator::Gt, json!(2)),
            ],
        );
        assert_eq!(
            Value::Object(deserialize_node(&node)),
            json!({ "$and": [{ "x": { "$eq": 1 } }, { "y": { "$gt": 2 } }] })
        );
    }

    #[test]
    fn test_empty_containers_prune() {
        let nodes = vec![
            AstNode::logical(1, LogicalOperator::Or, vec![]),
            AstNode::logical(
                2,
                LogicalOperator::Not,
                vec![AstNode::logical(3, LogicalOperator::And, vec![])],
            ),
            AstNode::embedded(4, vec!["tags".to_string()], EmbeddedOperator::None, vec![]),
        ];
        assert_eq!(deserialize(&nodes), None);
        assert_eq!(deserialize(&[]), None);
    }

    #[test]
    fn test_not_merges_children() {
        let node = AstNode::logical(
            1,
            LogicalOperator::Not,
            vec![
                condition(2, &["a"], ComparisonOperator::Gte, json!(1)),
                condition(3, &["a"], ComparisonOperator::Lte, json!(9)),
            ],
        );
        assert_eq!(
            Value::Object(deserialize_node(&node)),
            json!({ "$not": { "a": { "$gte": 1, "$lte": 9 } } })
        );
    }

    #[test]
    fn test_embedded_wraps_subtree() {
        let node = AstNode::embedded(
            1,
            vec!["items".to_string()],
            EmbeddedOperator::Every,
            vec![condition(2, &["qty"], ComparisonOperator::Gt, json!(0))],
        );
        assert_eq!(
            Value::Object(deserialize_node(&node)),
            json!({ "items": { "$every": { "qty": { "$gt": 0 } } } })
        );
    }

    #[test]
    fn test_deep_merge_overwrites_non_objects() {
        let mut target = as_map(json!({ "a": { "$eq": 1 }, "b": [1] }));
        deep_merge(&mut target, as_map(json!({ "a": { "$eq": 2, "$ne": 3 }, "b": { "c": 1 } })));
        assert_eq!(
            Value::Object(target),
            json!({ "a": { "$eq": 2, "$ne": 3 }, "b": { "c": 1 } })
        );
    }
}
