// ABOUTME: Normalized parameter descriptors produced by schema introspection
// ABOUTME: One descriptor per destination key, carrying kind, spellings, choices, and defaults

use serde::{Deserialize, Serialize};

use super::rule::{Nargs, ValueType};
use crate::args::ArgValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Flag,
    String,
    Int,
    Float,
    StringList,
    IntList,
    FloatList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub kind: ParameterKind,
    pub positional: bool,
    pub option_strings: Vec<String>,
    pub choices: Option<Vec<ArgValue>>,
    pub default: Option<ArgValue>,
    pub required: bool,
    pub nargs: Nargs,
    #[serde(default)]
    pub help: String,
}

impl ParameterKind {
    pub fn from_value_type(value_type: ValueType, list: bool) -> Self {
        match (value_type, list) {
            (ValueType::String, false) => ParameterKind::String,
            (ValueType::Int, false) => ParameterKind::Int,
            (ValueType::Float, false) => ParameterKind::Float,
            (ValueType::String, true) => ParameterKind::StringList,
            (ValueType::Int, true) => ParameterKind::IntList,
            (ValueType::Float, true) => ParameterKind::FloatList,
        }
    }

    /// Element type used for value conversion; flags have none
    pub fn element_type(&self) -> Option<ValueType> {
        match self {
            ParameterKind::Flag => None,
            ParameterKind::String | ParameterKind::StringList => Some(ValueType::String),
            ParameterKind::Int | ParameterKind::IntList => Some(ValueType::Int),
            ParameterKind::Float | ParameterKind::FloatList => Some(ValueType::Float),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ParameterKind::Flag)
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ParameterKind::StringList | ParameterKind::IntList | ParameterKind::FloatList
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Flag => "flag",
            ParameterKind::String => "string",
            ParameterKind::Int => "int",
            ParameterKind::Float => "float",
            ParameterKind::StringList => "list<string>",
            ParameterKind::IntList => "list<int>",
            ParameterKind::FloatList => "list<float>",
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ParameterDescriptor {
    /// First accepted spelling, used when materializing named values
    pub fn primary_option(&self) -> Option<&str> {
        self.option_strings.first().map(|s| s.as_str())
    }

    pub fn accepts_option(&self, spelling: &str) -> bool {
        self.option_strings.iter().any(|s| s == spelling)
    }

    /// Human readable label: the spellings for options, the name for positionals
    pub fn display_name(&self) -> String {
        if self.positional {
            self.name.clone()
        } else {
            self.option_strings.join("/")
        }
    }
}
