// ABOUTME: Error types for pipeline scheduling and execution
// ABOUTME: Only configuration and cycle errors live here; node failures are recorded as results

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Duplicate node name: {node}")]
    DuplicateNode { node: String },

    #[error("Node at position {index} has an empty name")]
    EmptyNodeName { index: usize },

    #[error("Node '{node}' depends on unknown node '{dependency}'")]
    UnknownDependency { node: String, dependency: String },

    #[error("Node '{node}' depends on itself")]
    SelfDependency { node: String },

    #[error("Circular dependency detected between nodes: {nodes:?}")]
    CircularDependency { nodes: Vec<String> },

    #[error("Execution order names unknown node '{node}'")]
    UnknownNode { node: String },
}

impl PipelineError {
    /// True for errors raised by the scheduler when no valid order exists
    pub fn is_cycle(&self) -> bool {
        matches!(self, PipelineError::CircularDependency { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
