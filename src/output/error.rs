// ABOUTME: Error types for output handling operations
// ABOUTME: Defines specific error types for formatting and writing pipeline results

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Formatter not found: {format}")]
    FormatterNotFound { format: String },

    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
