// ABOUTME: Argument handling: typed values, materialization, parsing, and module defaults
// ABOUTME: Bridges stored pipeline parameters and the argument bundle modules execute with

pub mod defaults;
pub mod error;
pub mod materialize;
pub mod parsed;
pub mod parser;
pub mod value;

pub use defaults::ModuleDefaults;
pub use error::{ArgumentError, Result};
pub use materialize::{is_positional_key, materialize, POSITIONAL_KEY, POSITIONAL_KEY_ALIAS};
pub use parsed::ParsedArgs;
pub use parser::ArgumentParser;
pub use value::ArgValue;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::schema::ParameterDescriptor;

/// A concrete invocation: the tokens a node was given and what they parsed into
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub tokens: Vec<String>,
    pub args: ParsedArgs,
}

/// Materialize stored parameters and parse them back into an argument bundle
pub fn prepare(
    descriptors: &[ParameterDescriptor],
    params: &IndexMap<String, JsonValue>,
) -> Result<Invocation> {
    let tokens = materialize(descriptors, params)?;
    let args = ArgumentParser::new(descriptors).parse(&tokens)?;
    Ok(Invocation { tokens, args })
}
