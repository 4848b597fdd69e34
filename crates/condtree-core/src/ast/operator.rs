//! Operators for condition objects
//!
//! Operators appear as `$`-prefixed object keys. They fall into three
//! families: comparison operators (leaves), logical operators (`$and`, `$or`,
//! `$not`) and embedded operators (`$some`, `$every`, `$none`), which apply a
//! sub-filter to the elements of an array field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leaf-level comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal (`$eq`)
    #[serde(rename = "$eq")]
    Eq,
    /// Not equal (`$ne`)
    #[serde(rename = "$ne")]
    Ne,
    /// Less than (`$lt`)
    #[serde(rename = "$lt")]
    Lt,
    /// Greater than (`$gt`)
    #[serde(rename = "$gt")]
    Gt,
    /// Less than or equal (`$lte`)
    #[serde(rename = "$lte")]
    Lte,
    /// Greater than or equal (`$gte`)
    #[serde(rename = "$gte")]
    Gte,
    /// Element matches (`$elemMatch`)
    #[serde(rename = "$elemMatch")]
    ElemMatch,
    /// Membership (`$in`)
    #[serde(rename = "$in")]
    In,
    /// Not in (`$nin`)
    #[serde(rename = "$nin")]
    Nin,
    /// Contains all (`$all`)
    #[serde(rename = "$all")]
    All,
    /// Case-insensitive pattern match (`$ilike`)
    #[serde(rename = "$ilike")]
    Ilike,
    /// Field presence (`$exists`)
    #[serde(rename = "$exists")]
    Exists,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 12] = [
        ComparisonOperator::Eq,
        ComparisonOperator::Ne,
        ComparisonOperator::Lt,
        ComparisonOperator::Gt,
        ComparisonOperator::Lte,
        ComparisonOperator::Gte,
        ComparisonOperator::ElemMatch,
        ComparisonOperator::In,
        ComparisonOperator::Nin,
        ComparisonOperator::All,
        ComparisonOperator::Ilike,
        ComparisonOperator::Exists,
    ];

    /// The key this operator is written as
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "$eq",
            ComparisonOperator::Ne => "$ne",
            ComparisonOperator::Lt => "$lt",
            ComparisonOperator::Gt => "$gt",
            ComparisonOperator::Lte => "$lte",
            ComparisonOperator::Gte => "$gte",
            ComparisonOperator::ElemMatch => "$elemMatch",
            ComparisonOperator::In => "$in",
            ComparisonOperator::Nin => "$nin",
            ComparisonOperator::All => "$all",
            ComparisonOperator::Ilike => "$ilike",
            ComparisonOperator::Exists => "$exists",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == key)
    }

    /// Returns true if this operator takes a list of values
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::In | ComparisonOperator::Nin | ComparisonOperator::All
        )
    }
}

/// Operators combining nested filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    /// All children must match (`$and`)
    #[serde(rename = "$and")]
    And,
    /// At least one child must match (`$or`)
    #[serde(rename = "$or")]
    Or,
    /// Negation of the merged children (`$not`)
    #[serde(rename = "$not")]
    Not,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "$and",
            LogicalOperator::Or => "$or",
            LogicalOperator::Not => "$not",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$and" => Some(LogicalOperator::And),
            "$or" => Some(LogicalOperator::Or),
            "$not" => Some(LogicalOperator::Not),
            _ => None,
        }
    }
}

/// Operators applying a sub-filter to elements of an array field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbeddedOperator {
    /// At least one element matches (`$some`)
    #[serde(rename = "$some")]
    Some,
    /// Every element matches (`$every`)
    #[serde(rename = "$every")]
    Every,
    /// No element matches (`$none`)
    #[serde(rename = "$none")]
    None,
}

impl EmbeddedOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddedOperator::Some => "$some",
            EmbeddedOperator::Every => "$every",
            EmbeddedOperator::None => "$none",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$some" => Some(EmbeddedOperator::Some),
            "$every" => Some(EmbeddedOperator::Every),
            "$none" => Some(EmbeddedOperator::None),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EmbeddedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a condition-object key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Logical(LogicalOperator),
    Comparison(ComparisonOperator),
    Embedded(EmbeddedOperator),
    /// Not an operator. At condition-object level this is a field name.
    Unknown,
}

/// Classify a key before any branching on its value
pub fn classify_key(key: &str) -> KeyKind {
    if !key.starts_with('$') {
        return KeyKind::Unknown;
    }
    if let Some(op) = LogicalOperator::from_key(key) {
        KeyKind::Logical(op)
    } else if let Some(op) = EmbeddedOperator::from_key(key) {
        KeyKind::Embedded(op)
    } else if let Some(op) = ComparisonOperator::from_key(key) {
        KeyKind::Comparison(op)
    } else {
        KeyKind::Unknown
    }
}
