//! Condition object → AST
//!
//! Walks a condition object recursively, accumulating the field path of
//! nested keys. Every key is classified with [`classify_key`] before its value
//! is inspected:
//!
//! - `$and` / `$or` / `$not` produce a `logical` node whose children are
//!   serialized under the same path.
//! - Any other key is a field name and extends the path. Its value is scanned
//!   for operator keys; if none are found it is treated as a nested field
//!   group.
//! - `$some` / `$every` / `$none` produce an `embedded` node. Their body is a
//!   self-contained filter on array elements, so the path restarts empty.
//!
//! Input the grammar does not cover is ignored rather than rejected.

use crate::ast::{classify_key, AstNode, ComparisonOperator, ConditionValue, EmbeddedOperator};
use crate::ast::{KeyKind, NodeId};
use log::{debug, trace, warn};
use serde_json::Value;

/// Builds AST nodes, drawing ids from a shared counter
pub struct Serializer<'a> {
    next_id: &'a mut NodeId,
}

impl<'a> Serializer<'a> {
    /// Create a serializer that allocates ids from `next_id`
    pub fn new(next_id: &'a mut NodeId) -> Self {
        Self { next_id }
    }

    /// Serialize a condition object into a sequence of root nodes
    pub fn serialize(&mut self, query: &Value) -> Vec<AstNode> {
        self.serialize_value(query, &[])
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }

    fn serialize_value(&mut self, value: &Value, path: &[String]) -> Vec<AstNode> {
        match value {
            Value::Array(items) => items
                .iter()
                .flat_map(|item| self.serialize_value(item, path))
                .collect(),
            Value::Object(map) => {
                let mut nodes = Vec::new();
                for (key, body) in map {
                    self.serialize_entry(key, body, path, &mut nodes);
                }
                nodes
            }
            other => {
                debug!("Ignoring non-object condition at {:?}: {}", path, other);
                Vec::new()
            }
        }
    }

    fn serialize_entry(&mut self, key: &str, body: &Value, path: &[String], nodes: &mut Vec<AstNode>) {
        match classify_key(key) {
            KeyKind::Logical(op) => {
                let id = self.allocate_id();
                let children = self.serialize_value(body, path);
                trace!("Logical node {} {} with {} children", id, op, children.len());
                nodes.push(AstNode::logical(id, op, children));
            }
            // Bare operators at condition-object level apply to the current
            // path, e.g. the body of a field-level `$not`
            KeyKind::Comparison(op) => nodes.push(self.condition(path.to_vec(), op, body)),
            KeyKind::Embedded(op) => nodes.push(self.embedded(path.to_vec(), op, body)),
            KeyKind::Unknown => self.serialize_field(key, body, path, nodes),
        }
    }

    fn serialize_field(&mut self, key: &str, body: &Value, path: &[String], nodes: &mut Vec<AstNode>) {
        let mut field_path = path.to_vec();
        field_path.push(key.to_string());

        let Value::Object(operators) = body else {
            debug!("Ignoring non-object value for field {:?}", field_path);
            return;
        };

        let mut found_operator = false;
        let mut skipped = Vec::new();
        for (op_key, op_body) in operators {
            match classify_key(op_key) {
                KeyKind::Embedded(op) => {
                    nodes.push(self.embedded(field_path.clone(), op, op_body));
                    found_operator = true;
                }
                KeyKind::Comparison(op) => {
                    nodes.push(self.condition(field_path.clone(), op, op_body));
                    found_operator = true;
                }
                KeyKind::Logical(op) => {
                    let id = self.allocate_id();
                    let children = self.serialize_value(op_body, &field_path);
                    nodes.push(AstNode::logical(id, op, children));
                    found_operator = true;
                }
                KeyKind::Unknown => skipped.push(op_key.as_str()),
            }
        }

        if !found_operator {
            // Nested field group: { "a": { "b": { "$eq": 1 } } }
            nodes.extend(self.serialize_value(body, &field_path));
        } else if !skipped.is_empty() {
            debug!("Ignoring keys {:?} next to operators at {:?}", skipped, field_path);
        }
    }

    fn condition(&mut self, field_path: Vec<String>, op: ComparisonOperator, body: &Value) -> AstNode {
        let id = self.allocate_id();
        let value = ConditionValue::from_json(body.clone());
        if !op.accepts(&value) {
            warn!(
                "Operator {} at {:?} has a {} value",
                op,
                field_path,
                value.type_name()
            );
        }
        trace!("Condition node {} {:?} {}", id, field_path, op);
        AstNode::condition(id, field_path, op, value)
    }

    fn embedded(&mut self, field_path: Vec<String>, op: EmbeddedOperator, body: &Value) -> AstNode {
        let id = self.allocate_id();
        let subtree = self.serialize_value(body, &[]);
        trace!("Embedded node {} {:?} {} with {} nodes", id, field_path, op, subtree.len());
        AstNode::embedded(id, field_path, op, subtree)
    }
}

/// Serialize `query` with ids starting at `first_id`
pub fn serialize(query: &Value, first_id: NodeId) -> Vec<AstNode> {
    let mut next_id = first_id;
    Serializer::new(&mut next_id).serialize(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LogicalOperator, NodeType};
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_condition() {
        let nodes = serialize(&json!({ "age": { "$gte": 18 } }), 1);
        assert_eq!(
            nodes,
            vec![AstNode::condition(
                1,
                path(&["age"]),
                ComparisonOperator::Gte,
                ConditionValue::from(18i64)
            )]
        );
    }

    #[test]
    fn test_nested_field_paths() {
        let nodes = serialize(&json!({ "a": { "b": { "$eq": 1 } }, "c": { "$eq": 2 } }), 1);
        assert_eq!(nodes.len(), 2);
        match (&nodes[0], &nodes[1]) {
            (AstNode::Condition(first), AstNode::Condition(second)) => {
                assert_eq!(first.field_path, path(&["a", "b"]));
                assert_eq!(second.field_path, path(&["c"]));
            }
            _ => panic!("Expected two condition nodes"),
        }
    }

    #[test]
    fn test_multiple_operators_on_one_field() {
        let nodes = serialize(&json!({ "age": { "$gte": 18, "$lt": 65 } }), 1);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.node_type() == NodeType::Condition));
    }

    #[test]
    fn test_and_flattens_array_body() {
        let nodes = serialize(
            &json!({ "$and": [{ "x": { "$eq": 1 } }, { "y": { "$ne": null } }] }),
            1,
        );
        match &nodes[..] {
            [AstNode::Logical(logical)] => {
                assert_eq!(logical.id, 1);
                assert_eq!(logical.operator, LogicalOperator::And);
                assert_eq!(logical.children.len(), 2);
                assert_eq!(logical.children[0].id(), 2);
                assert_eq!(logical.children[1].id(), 3);
            }
            _ => panic!("Expected one logical node"),
        }
    }

    #[test]
    fn test_not_recurses_on_object() {
        let nodes = serialize(&json!({ "$not": { "status": { "$eq": "closed" } } }), 1);
        match &nodes[..] {
            [AstNode::Logical(logical)] => {
                assert_eq!(logical.operator, LogicalOperator::Not);
                assert_eq!(logical.children.len(), 1);
            }
            _ => panic!("Expected one logical node"),
        }
    }

    #[test]
    fn test_embedded_resets_path() {
        let nodes = serialize(
            &json!({ "tags": { "$some": { "$and": [{ "x": { "$eq": 1 } }] } } }),
            1,
        );
        let AstNode::Embedded(embedded) = &nodes[0] else {
            panic!("Expected embedded node");
        };
        assert_eq!(embedded.field_path, path(&["tags"]));
        assert_eq!(embedded.operator, EmbeddedOperator::Some);

        let AstNode::Logical(logical) = &embedded.subtree[0] else {
            panic!("Expected logical node in subtree");
        };
        let AstNode::Condition(condition) = &logical.children[0] else {
            panic!("Expected condition child");
        };
        assert_eq!(condition.field_path, path(&["x"]));
    }

    #[test]
    fn test_logical_under_field_keeps_path() {
        let nodes = serialize(&json!({ "a": { "$or": [{ "b": { "$eq": 1 } }] } }), 1);
        let AstNode::Logical(logical) = &nodes[0] else {
            panic!("Expected logical node");
        };
        let AstNode::Condition(condition) = &logical.children[0] else {
            panic!("Expected condition child");
        };
        assert_eq!(condition.field_path, path(&["a", "b"]));
    }

    #[test]
    fn test_field_level_not_applies_to_field() {
        let nodes = serialize(&json!({ "age": { "$not": { "$gt": 5 } } }), 1);
        let AstNode::Logical(logical) = &nodes[0] else {
            panic!("Expected logical node");
        };
        let AstNode::Condition(condition) = &logical.children[0] else {
            panic!("Expected condition child");
        };
        assert_eq!(condition.field_path, path(&["age"]));
        assert_eq!(condition.operator, ComparisonOperator::Gt);
    }

    #[test]
    fn test_unknown_input_is_ignored() {
        assert!(serialize(&json!({ "name": "bob" }), 1).is_empty());
        assert!(serialize(&json!({ "age": { "$regex": "^a" } }), 1).is_empty());
        assert!(serialize(&json!(42), 1).is_empty());

        let nodes = serialize(&json!({ "age": { "$gt": 1, "$regex": "x" } }), 1);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_mismatched_value_is_kept() {
        let nodes = serialize(&json!({ "age": { "$gt": [1, "a"] } }), 1);
        let AstNode::Condition(condition) = &nodes[0] else {
            panic!("Expected condition node");
        };
        assert_eq!(condition.value, ConditionValue::Other(json!([1, "a"])));
    }

    #[test]
    fn test_ids_continue_from_counter() {
        let mut next_id = 10;
        let nodes = Serializer::new(&mut next_id)
            .serialize(&json!({ "a": { "$eq": 1 }, "b": { "$eq": 2 } }));
        assert_eq!(nodes[0].id(), 10);
        assert_eq!(nodes[1].id(), 11);
        assert_eq!(next_id, 12);
    }
}
