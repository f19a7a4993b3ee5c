// ABOUTME: Error types for pipeline document parsing and validation
// ABOUTME: Defines specific error types for parser module operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to read pipeline file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid pipeline format: {0}")]
    InvalidFormat(String),

    #[error("Pipeline file already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Circular dependency detected between nodes: {nodes:?}")]
    CircularDependency { nodes: Vec<String> },

    #[error("Node '{node}' depends on unknown node '{dependency}'")]
    UnknownDependency { node: String, dependency: String },

    #[error("Node '{node}' depends on itself")]
    SelfDependency { node: String },

    #[error("Duplicate node name: {node}")]
    DuplicateNode { node: String },

    #[error("Node at position {index} has an empty name")]
    EmptyNodeName { index: usize },

    #[error("Node '{node}' uses unknown module '{module}'. Available modules: {available:?}")]
    UnknownModule {
        node: String,
        module: String,
        available: Vec<String>,
    },

    #[error("Invalid parameters for node '{node}': {reason}")]
    InvalidParameters { node: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ParserError>;
