//! condtree Core - Editable AST for operator-keyed condition objects
//!
//! This crate converts MongoDB-style condition objects into an explicit,
//! addressable tree and back:
//! - AST node, operator and value definitions
//! - Serializer (condition object to AST)
//! - Deserializer (AST to condition object, with deep merge)
//! - Transformer, which owns a tree and edits it node by node
//! - Error and configuration types

pub mod ast;
pub mod config;
pub mod deserializer;
pub mod error;
pub mod serializer;
pub mod transformer;

// Re-export commonly used types
pub use ast::{
    AstNode, ComparisonOperator, ConditionNode, ConditionValue, EmbeddedNode, EmbeddedOperator,
    KeyKind, LogicalNode, LogicalOperator, NodeId, NodeType,
};
pub use config::TransformerConfig;
pub use error::{Result, TransformError};
pub use transformer::Transformer;
