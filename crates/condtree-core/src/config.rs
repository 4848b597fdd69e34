//! Transformer configuration
//!
//! ```rust
//! use condtree_core::TransformerConfig;
//!
//! let config = TransformerConfig::from_yaml_str("validate_values: true").unwrap();
//! assert!(config.validate_values);
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Transformer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Reject condition values that break the operator→value contract when
    /// adding or updating condition nodes. Serialization never rejects.
    pub validate_values: bool,
}

impl TransformerConfig {
    /// Configuration with value validation enabled
    pub fn strict() -> Self {
        Self {
            validate_values: true,
        }
    }

    /// Load a configuration from a YAML document. Missing keys take their
    /// default values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
