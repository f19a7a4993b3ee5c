// ABOUTME: Pipeline node definition: one configured invocation of a registered module
// ABOUTME: Holds stored parameters, the positional sub-map, and dependency references

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::args::{is_positional_key, POSITIONAL_KEY};

pub const UNKNOWN_MODULE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode")]
pub struct PipelineNode {
    pub name: String,
    pub module_name: String,
    pub params: IndexMap<String, JsonValue>,
    pub depends_on: Vec<String>,
}

/// On-disk shape, tolerant of older documents that omit identity fields
#[derive(Deserialize)]
struct RawNode {
    name: Option<String>,
    module_name: Option<String>,
    #[serde(default)]
    params: IndexMap<String, JsonValue>,
    #[serde(default)]
    depends_on: Vec<String>,
}

impl From<RawNode> for PipelineNode {
    fn from(raw: RawNode) -> Self {
        let (name, module_name) = match (raw.name, raw.module_name) {
            (Some(name), Some(module_name)) => (name, module_name),
            (Some(name), None) => (name.clone(), name),
            (None, Some(module_name)) => (module_name.clone(), module_name),
            (None, None) => (UNKNOWN_MODULE.to_string(), UNKNOWN_MODULE.to_string()),
        };

        Self {
            name,
            module_name,
            params: raw.params,
            depends_on: raw.depends_on,
        }
    }
}

impl PipelineNode {
    pub fn new(name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_name: module_name.into(),
            params: IndexMap::new(),
            depends_on: Vec::new(),
        }
    }

    /// Set a named parameter value
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set a positional parameter value under the reserved key
    pub fn with_positional(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let section = self
            .params
            .entry(POSITIONAL_KEY.to_string())
            .or_insert_with(|| JsonValue::Object(JsonMap::new()));
        if !section.is_object() {
            *section = JsonValue::Object(JsonMap::new());
        }
        if let JsonValue::Object(values) = section {
            values.insert(key.into(), value.into());
        }
        self
    }

    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.depends_on.push(dependency.into());
        self
    }

    /// Named parameters, excluding the positional section
    pub fn named_params(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.params.iter().filter(|(key, _)| !is_positional_key(key))
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.depends_on.iter().any(|d| d == name)
    }
}
