// ABOUTME: Typed argument values shared by schemas, defaults, and parsed argument bundles
// ABOUTME: Converts between JSON documents and the scalar/list values modules consume

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ArgValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Convert a JSON value. Objects have no argument representation.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => Some(ArgValue::Null),
            JsonValue::Bool(b) => Some(ArgValue::Bool(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Some(ArgValue::Int(i)),
                None => n.as_f64().map(ArgValue::Float),
            },
            JsonValue::String(s) => Some(ArgValue::Str(s.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(ArgValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(ArgValue::List),
            JsonValue::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            ArgValue::Null => JsonValue::Null,
            ArgValue::Bool(b) => JsonValue::Bool(*b),
            ArgValue::Int(i) => JsonValue::from(*i),
            ArgValue::Float(f) => JsonValue::from(*f),
            ArgValue::Str(s) => JsonValue::String(s.clone()),
            ArgValue::List(items) => JsonValue::Array(items.iter().map(|v| v.to_json()).collect()),
        }
    }

    /// Command-line tokens for this value: one per list element, none for null
    pub fn tokens(&self) -> Vec<String> {
        match self {
            ArgValue::Null => Vec::new(),
            ArgValue::List(items) => items.iter().flat_map(|item| item.tokens()).collect(),
            other => vec![other.to_string()],
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Equality used for choice validation; ints and floats compare numerically
    pub fn matches_choice(&self, choice: &ArgValue) -> bool {
        match (self, choice) {
            (ArgValue::Int(_) | ArgValue::Float(_), ArgValue::Int(_) | ArgValue::Float(_)) => {
                self.as_f64() == choice.as_f64()
            }
            _ => self == choice,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => write!(f, "null"),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(x) => write!(f, "{}", x),
            ArgValue::Str(s) => write!(f, "{}", s),
            ArgValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        ArgValue::List(values.into_iter().map(Into::into).collect())
    }
}
