// ABOUTME: Main library module for the gtools module registry and pipeline engine
// ABOUTME: Exports all core modules and provides the public API

pub mod args;
pub mod cli;
pub mod engine;
pub mod modules;
pub mod output;
pub mod parser;
pub mod registry;
pub mod schema;

// Re-export commonly used types
pub use args::{ArgValue, ArgumentError, ParsedArgs};
pub use cli::{App, Args, Config};
pub use engine::{
    build_order, estimate_order, ExecutionResult, ModuleContext, NodeStatus, PipelineError,
    PipelineExecutor, PipelineResult, PipelineStatus,
};
pub use output::OutputHandler;
pub use parser::{Pipeline, PipelineNode, PipelineParser, PipelineValidator};
pub use registry::{ModuleFunction, ModuleRegistry};
pub use schema::{ArgumentRule, ModuleSchema, SchemaError, SchemaProvider};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
