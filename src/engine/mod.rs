// ABOUTME: Pipeline engine module for the gtools module registry
// ABOUTME: Handles dependency scheduling, node execution, and result aggregation

pub mod context;
pub mod dependency;
pub mod error;
pub mod executor;
pub mod result;

pub use context::{ModuleContext, ModuleOutput};
pub use dependency::{build_order, estimate_order, DependencyGraph};
pub use error::{PipelineError, Result};
pub use executor::PipelineExecutor;
pub use result::{ExecutionResult, NodeStatus, PipelineResult, PipelineStatus, PipelineSummary};
