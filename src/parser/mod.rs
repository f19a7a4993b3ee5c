// ABOUTME: Parser module for JSON pipeline documents
// ABOUTME: Exports pipeline loading, node definitions, and validation

pub mod error;
pub mod node;
pub mod pipeline;
pub mod validation;

pub use error::{ParserError, ValidationError};
pub use node::PipelineNode;
pub use pipeline::{Pipeline, PipelineParser};
pub use validation::{PipelineValidator, ValidationReport};
