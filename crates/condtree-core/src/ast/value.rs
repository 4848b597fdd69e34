//! Condition values
//!
//! `ConditionValue` tags the value a comparison operator is applied to, so the
//! operator→value contract can be checked without probing raw JSON.

use super::operator::ComparisonOperator;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Value carried by a condition node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (integer or float, as written)
    Number(Number),
    /// String value
    String(String),
    /// Homogeneous list of strings
    Strings(Vec<String>),
    /// Homogeneous list of numbers
    Numbers(Vec<Number>),
    /// Anything that fits no tag above (objects, mixed arrays).
    /// Kept as-is so serialization stays lossless.
    Other(Value),
}

impl ConditionValue {
    /// Tag a raw JSON value
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => ConditionValue::Null,
            Value::Bool(b) => ConditionValue::Bool(b),
            Value::Number(n) => ConditionValue::Number(n),
            Value::String(s) => ConditionValue::String(s),
            Value::Array(items) => Self::from_array(items),
            other => ConditionValue::Other(other),
        }
    }

    fn from_array(items: Vec<Value>) -> Self {
        if items.iter().all(Value::is_string) {
            ConditionValue::Strings(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )
        } else if items.iter().all(Value::is_number) {
            ConditionValue::Numbers(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Number(n) => Some(n),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            ConditionValue::Other(Value::Array(items))
        }
    }

    /// Convert back to raw JSON
    pub fn to_json(&self) -> Value {
        match self {
            ConditionValue::Null => Value::Null,
            ConditionValue::Bool(b) => Value::Bool(*b),
            ConditionValue::Number(n) => Value::Number(n.clone()),
            ConditionValue::String(s) => Value::String(s.clone()),
            ConditionValue::Strings(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            ConditionValue::Numbers(items) => {
                Value::Array(items.iter().cloned().map(Value::Number).collect())
            }
            ConditionValue::Other(v) => v.clone(),
        }
    }

    /// Short type name used in error messages and logs
    pub fn type_name(&self) -> &'static str {
        match self {
            ConditionValue::Null => "null",
            ConditionValue::Bool(_) => "boolean",
            ConditionValue::Number(_) => "number",
            ConditionValue::String(_) => "string",
            ConditionValue::Strings(_) => "string array",
            ConditionValue::Numbers(_) => "number array",
            ConditionValue::Other(Value::Array(_)) => "mixed array",
            ConditionValue::Other(_) => "object",
        }
    }
}

impl ComparisonOperator {
    /// Check a value against this operator's value contract
    pub fn accepts(&self, value: &ConditionValue) -> bool {
        use ConditionValue as V;

        match self {
            ComparisonOperator::Eq | ComparisonOperator::Ne => matches!(
                value,
                V::Null | V::Bool(_) | V::Number(_) | V::String(_)
            ),
            ComparisonOperator::Lt
            | ComparisonOperator::Gt
            | ComparisonOperator::Lte
            | ComparisonOperator::Gte
            | ComparisonOperator::ElemMatch => matches!(value, V::Number(_) | V::String(_)),
            ComparisonOperator::In | ComparisonOperator::Nin | ComparisonOperator::All => {
                matches!(value, V::Strings(_) | V::Numbers(_))
            }
            ComparisonOperator::Ilike => matches!(value, V::String(_)),
            ComparisonOperator::Exists => matches!(value, V::Bool(_)),
        }
    }
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        ConditionValue::from_json(value)
    }
}

impl From<bool> for ConditionValue {
    fn from(b: bool) -> Self {
        ConditionValue::Bool(b)
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Number(n.into())
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        // NaN and infinities have no JSON form
        Number::from_f64(n)
            .map(ConditionValue::Number)
            .unwrap_or(ConditionValue::Null)
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::String(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::String(s)
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(items: Vec<String>) -> Self {
        ConditionValue::Strings(items)
    }
}

impl From<Vec<i64>> for ConditionValue {
    fn from(items: Vec<i64>) -> Self {
        ConditionValue::Numbers(items.into_iter().map(Number::from).collect())
    }
}
