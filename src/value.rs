use std::collections::HashMap;

use crate::token::format_number;

/// A runtime value produced by replaying a token stream.
///
/// The model matches the expression dialect: one `f64` number type,
/// `null`/`undefined` collapsed into `Null`, and collections that convert
/// to and from JSON.
///
/// # Examples
///
/// ```
/// use cassia::Value;
/// use std::collections::HashMap;
///
/// let number = Value::Number(3.5);
/// let text = Value::Str("hello".to_string());
/// let list = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
///
/// let mut fields = HashMap::new();
/// fields.insert("name".to_string(), text);
/// let record = Value::Object(fields);
/// assert!(record.is_truthy());
/// assert!(!Value::Null.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// null or undefined
    Null,

    /// true / false
    Bool(bool),

    /// Numbers are always floating point
    Number(f64),

    /// UTF-8 string
    Str(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Truthiness for conditions and logical operators: `0`, `NaN`, the
    /// empty string, and `Null` are falsy; arrays and objects are always
    /// truthy, empty or not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Numeric coercion. Strings parse after trimming (an empty string is 0),
    /// booleans are 0/1, `Null` is 0, and collections are NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// String coercion (used by `+` concatenation).
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_string())
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
