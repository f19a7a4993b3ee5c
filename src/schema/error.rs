// ABOUTME: Error types for module schema providers and introspection
// ABOUTME: A schema error degrades the affected module to "no declared parameters"

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Schema provider failed: {message}")]
    ProviderFailed { message: String },

    #[error("Duplicate parameter destination '{name}'")]
    DuplicateDestination { name: String },

    #[error("Option spelling '{option}' is declared more than once")]
    DuplicateOption { option: String },

    #[error("Invalid option spelling '{option}'")]
    InvalidOptionString { option: String },

    #[error("Invalid rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },

    #[error("Choice {choice} of '{name}' does not match the declared type {expected}")]
    ChoiceTypeMismatch {
        name: String,
        choice: String,
        expected: String,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
