//! Error types for condtree Core

use crate::ast::{ComparisonOperator, NodeId, NodeType};
use thiserror::Error;

/// Transformer error type
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Parent node not found: {id}")]
    ParentNotFound { id: NodeId },

    #[error("Node {id} cannot hold children: it is a {node_type} node")]
    InvalidParentType { id: NodeId, node_type: NodeType },

    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    #[error("Node {id} is a {node_type} node, expected a condition node")]
    InvalidNodeType { id: NodeId, node_type: NodeType },

    #[error("Operator {operator} does not accept a {value_type} value")]
    InvalidValue {
        operator: ComparisonOperator,
        value_type: &'static str,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TransformError>;
