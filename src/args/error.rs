// ABOUTME: Error types for argument materialization and parsing
// ABOUTME: Every variant names the parameter or tokens that caused the failure

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("Positional parameter '{name}' must be stored under '{key}'")]
    MisplacedPositional { name: String, key: String },

    #[error("Invalid value for '{name}': {value} (expected {expected})")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },

    #[error("Invalid choice for '{name}': {value} (choose from {choices})")]
    InvalidChoice {
        name: String,
        value: String,
        choices: String,
    },

    #[error("Option '{option}' expects a value")]
    MissingValue { option: String },

    #[error("Parameter '{name}' expects at least one value")]
    TooFewValues { name: String },

    #[error("Missing required parameters: {}", names.join(", "))]
    MissingRequired { names: Vec<String> },

    #[error("Unrecognized arguments: {}", tokens.join(" "))]
    UnrecognizedArguments { tokens: Vec<String> },

    #[error("Positional section '{key}' must be an object")]
    InvalidPositionalSection { key: String },
}

pub type Result<T> = std::result::Result<T, ArgumentError>;
