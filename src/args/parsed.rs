// ABOUTME: The resolved argument bundle handed to module execution callables
// ABOUTME: Ordered destination -> value map with typed accessors and default merging

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::ArgValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedArgs {
    values: IndexMap<String, ArgValue>,
}

impl ParsedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// True only when the destination holds boolean true
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(ArgValue::as_bool).unwrap_or(false)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_f64)
    }

    pub fn strings(&self, name: &str) -> Vec<String> {
        self.list(name)
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn ints(&self, name: &str) -> Vec<i64> {
        self.list(name).iter().filter_map(ArgValue::as_i64).collect()
    }

    pub fn floats(&self, name: &str) -> Vec<f64> {
        self.list(name).iter().filter_map(ArgValue::as_f64).collect()
    }

    fn list(&self, name: &str) -> &[ArgValue] {
        self.get(name).and_then(ArgValue::as_list).unwrap_or(&[])
    }

    /// Fill destinations that are absent or null; parsed values always win
    pub fn merge_defaults(&mut self, defaults: &IndexMap<String, ArgValue>) {
        for (name, value) in defaults {
            let missing = self.values.get(name).map(ArgValue::is_null).unwrap_or(true);
            if missing {
                self.values.insert(name.clone(), value.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
