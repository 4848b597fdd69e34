//! Abstract Syntax Tree (AST) definitions
//!
//! This module contains:
//! - Node types (condition, logical, embedded)
//! - Operators and key classification
//! - Condition values and the operator→value contract

pub mod node;
pub mod operator;
pub mod value;

pub use node::{AstNode, ConditionNode, EmbeddedNode, LogicalNode, NodeId, NodeType};
pub use operator::{classify_key, ComparisonOperator, EmbeddedOperator, KeyKind, LogicalOperator};
pub use value::ConditionValue;
