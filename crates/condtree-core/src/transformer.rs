//! Transformer
//!
//! Owns an AST and the id counter used to build it. The tree is only
//! modified through the operations below, each of which either applies fully
//! or fails without touching the tree.
//!
//! # Example
//! ```rust
//! use condtree_core::{ComparisonOperator, LogicalOperator, Transformer};
//! use serde_json::json;
//!
//! let mut transformer = Transformer::from_query(&json!({ "age": { "$gte": 18 } }));
//!
//! let or_id = transformer.add_logical_node(LogicalOperator::Or, None).unwrap();
//! transformer
//!     .add_condition_node(vec!["country".to_string()], ComparisonOperator::Eq, "US", Some(or_id))
//!     .unwrap();
//!
//! assert_eq!(
//!     transformer.deserialize(),
//!     Some(json!({ "age": { "$gte": 18 }, "$or": [{ "country": { "$eq": "US" } }] }))
//! );
//! ```

use crate::ast::{
    AstNode, ComparisonOperator, ConditionValue, EmbeddedOperator, LogicalOperator, NodeId,
};
use crate::config::TransformerConfig;
use crate::deserializer;
use crate::error::{Result, TransformError};
use crate::serializer::Serializer;
use log::debug;
use serde_json::Value;

/// Bidirectional transformer and editor for a condition AST
#[derive(Debug, Clone)]
pub struct Transformer {
    tree: Vec<AstNode>,
    /// Next id to hand out. Never decreases, not even on `clear`.
    next_id: NodeId,
    config: TransformerConfig,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Create a transformer with an empty tree
    pub fn new() -> Self {
        Self::with_config(TransformerConfig::default())
    }

    pub fn with_config(config: TransformerConfig) -> Self {
        Self {
            tree: Vec::new(),
            next_id: 1,
            config,
        }
    }

    /// Create a transformer and serialize `query` into its tree
    pub fn from_query(query: &Value) -> Self {
        let mut transformer = Self::new();
        transformer.serialize(query);
        transformer
    }

    /// Parse JSON text and serialize it into a new transformer
    pub fn from_json_str(json: &str) -> Result<Self> {
        let query: Value = serde_json::from_str(json)?;
        Ok(Self::from_query(&query))
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Replace the current tree with the serialization of `query`
    pub fn serialize(&mut self, query: &Value) -> &[AstNode] {
        self.tree = Serializer::new(&mut self.next_id).serialize(query);
        debug!("Serialized query into {} root nodes", self.tree.len());
        &self.tree
    }

    /// Convert the tree back into a condition object.
    ///
    /// Returns `None` for an empty tree, or one whose containers all prune to
    /// nothing.
    pub fn deserialize(&self) -> Option<Value> {
        deserializer::deserialize(&self.tree)
    }

    /// Deserialize and render as JSON text (`null` when empty)
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.deserialize())?)
    }

    /// Read-only view of the root nodes
    pub fn tree(&self) -> &[AstNode] {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Every id in the tree, in depth-first pre-order
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        AstNode::collect_ids(&self.tree, &mut ids);
        ids
    }

    /// Add a condition node at the root, or to the container `parent_id`
    pub fn add_condition_node(
        &mut self,
        field_path: Vec<String>,
        operator: ComparisonOperator,
        value: impl Into<ConditionValue>,
        parent_id: Option<NodeId>,
    ) -> Result<NodeId> {
        let value = value.into();
        self.check_value(operator, &value)?;
        self.attach(parent_id, |id| {
            AstNode::condition(id, field_path, operator, value)
        })
    }

    /// Add an empty logical node at the root, or to the container `parent_id`
    pub fn add_logical_node(
        &mut self,
        operator: LogicalOperator,
        parent_id: Option<NodeId>,
    ) -> Result<NodeId> {
        self.attach(parent_id, |id| AstNode::logical(id, operator, Vec::new()))
    }

    /// Add an empty embedded node at the root, or to the container `parent_id`
    pub fn add_embedded_node(
        &mut self,
        field_path: Vec<String>,
        operator: EmbeddedOperator,
        parent_id: Option<NodeId>,
    ) -> Result<NodeId> {
        self.attach(parent_id, |id| {
            AstNode::embedded(id, field_path, operator, Vec::new())
        })
    }

    /// Replace the operator and value of a condition node. The id and field
    /// path stay as they are.
    pub fn update_condition_node(
        &mut self,
        id: NodeId,
        operator: ComparisonOperator,
        value: impl Into<ConditionValue>,
    ) -> Result<()> {
        let value = value.into();
        self.check_value(operator, &value)?;

        match AstNode::find_mut(&mut self.tree, id) {
            Some(AstNode::Condition(condition)) => {
                debug!("Updating condition node {}: {} -> {}", id, condition.operator, operator);
                condition.operator = operator;
                condition.value = value;
                Ok(())
            }
            Some(other) => Err(TransformError::InvalidNodeType {
                id,
                node_type: other.node_type(),
            }),
            None => Err(TransformError::NodeNotFound { id }),
        }
    }

    /// Remove a node and everything below it. Returns false if no node has
    /// this id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match AstNode::remove_from(&mut self.tree, id) {
            Some(node) => {
                debug!("Removed {} node {}", node.node_type(), id);
                true
            }
            None => false,
        }
    }

    /// Depth-first pre-order lookup by id
    pub fn find_node_by_id(&self, id: NodeId) -> Option<&AstNode> {
        AstNode::find(&self.tree, id)
    }

    /// Drop the whole tree. Ids handed out so far are not reused.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    fn check_value(&self, operator: ComparisonOperator, value: &ConditionValue) -> Result<()> {
        if self.config.validate_values && !operator.accepts(value) {
            return Err(TransformError::InvalidValue {
                operator,
                value_type: value.type_name(),
            });
        }
        Ok(())
    }

    /// Resolve the target list first, then allocate the id and push, so a
    /// failed lookup consumes no id.
    fn attach(
        &mut self,
        parent_id: Option<NodeId>,
        build: impl FnOnce(NodeId) -> AstNode,
    ) -> Result<NodeId> {
        let target = match parent_id {
            None => &mut self.tree,
            Some(parent_id) => {
                let parent = AstNode::find_mut(&mut self.tree, parent_id)
                    .ok_or(TransformError::ParentNotFound { id: parent_id })?;
                let node_type = parent.node_type();
                parent
                    .children_mut()
                    .ok_or(TransformError::InvalidParentType {
                        id: parent_id,
                        node_type,
                    })?
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        let node = build(id);
        debug!("Adding {} node {} under {:?}", node.node_type(), id, parent_id);
        target.push(node);
        Ok(id)
    }
}
