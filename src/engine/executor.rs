// ABOUTME: Pipeline executor running nodes sequentially in dependency order
// ABOUTME: Materializes arguments, invokes modules, and isolates per-node failures

use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use super::context::ModuleContext;
use super::dependency::build_order;
use super::error::{PipelineError, Result};
use super::result::{ExecutionResult, NodeStatus, PipelineResult};
use crate::args::{self, ModuleDefaults};
use crate::parser::{Pipeline, PipelineNode};
use crate::registry::ModuleRegistry;

pub struct PipelineExecutor {
    registry: Arc<ModuleRegistry>,
    defaults: Option<ModuleDefaults>,
    working_directory: Option<PathBuf>,
}

impl PipelineExecutor {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self {
            registry,
            defaults: None,
            working_directory: None,
        }
    }

    /// Merge per-module default files under each node's parsed arguments
    pub fn with_defaults(mut self, defaults: ModuleDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Working directory used when a pipeline document does not name one
    pub fn with_working_dir(mut self, working_directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(working_directory.into());
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Schedule strictly, then run every node. Fails only when the pipeline cannot start.
    #[instrument(skip(self, pipeline), fields(nodes = pipeline.modules.len()))]
    pub async fn execute_pipeline(&self, pipeline: &Pipeline) -> Result<PipelineResult> {
        let order = build_order(&pipeline.modules)?;
        info!("Execution order: {:?}", order);

        let working_directory = pipeline
            .working_directory
            .clone()
            .or_else(|| self.working_directory.clone());
        self.run_in(&pipeline.modules, &order, working_directory).await
    }

    /// Run nodes in the given order and return their results in that order
    pub async fn run(&self, nodes: &[PipelineNode], order: &[String]) -> Result<Vec<ExecutionResult>> {
        let result = self
            .run_in(nodes, order, self.working_directory.clone())
            .await?;
        Ok(result.results)
    }

    async fn run_in(
        &self,
        nodes: &[PipelineNode],
        order: &[String],
        working_directory: Option<PathBuf>,
    ) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        let mut by_name: HashMap<&str, &PipelineNode> = HashMap::new();
        for node in nodes {
            if by_name.insert(node.name.as_str(), node).is_some() {
                return Err(PipelineError::DuplicateNode {
                    node: node.name.clone(),
                });
            }
        }
        for name in order {
            if !by_name.contains_key(name.as_str()) {
                return Err(PipelineError::UnknownNode { node: name.clone() });
            }
        }

        info!("Starting pipeline run {} with {} node(s)", run_id, order.len());
        let mut pipeline_result = PipelineResult::new(run_id.clone(), order.to_vec());

        for name in order {
            let node = by_name[name.as_str()];
            pipeline_result.log(format!("▶ Executing: {}", node.name));

            let context = ModuleContext::new(node.name.clone(), node.module_name.clone())
                .with_run_id(run_id.clone())
                .with_working_directory(working_directory.clone());
            let result = self.run_node(node, context).await;

            match &result.error {
                None => pipeline_result.log(format!("✓ {} completed", node.name)),
                Some(message) => pipeline_result.log(format!("✗ {} failed: {}", node.name, message)),
            }
            pipeline_result.add_result(result);
        }

        pipeline_result.mark_completed();
        info!(
            "Pipeline run completed in {:?} with status: {} ({})",
            start_time.elapsed(),
            pipeline_result.status,
            pipeline_result.headline()
        );

        Ok(pipeline_result)
    }

    async fn run_node(&self, node: &PipelineNode, mut context: ModuleContext) -> ExecutionResult {
        let mut result = ExecutionResult::new(node.name.clone(), node.module_name.clone());
        info!("Executing node '{}' (module: {})", node.name, node.module_name);

        let Some(function) = self.registry.function(&node.module_name) else {
            let message = format!("Module '{}' not found in registry", node.module_name);
            error!("Node '{}': {}", node.name, message);
            result.mark_completed(NodeStatus::ModuleNotFound, String::new(), Some(message));
            return result;
        };

        let descriptors = self.registry.describe_module(&node.module_name);
        let invocation = match args::prepare(&descriptors, &node.params) {
            Ok(invocation) => invocation,
            Err(e) => {
                let message = format!("Argument error: {}", e);
                error!("Node '{}': {}", node.name, message);
                result.mark_completed(NodeStatus::ArgumentError, String::new(), Some(message));
                return result;
            }
        };
        result.args = invocation.tokens;

        let mut parsed = invocation.args;
        if let Some(defaults) = &self.defaults {
            parsed.merge_defaults(&defaults.load(&node.module_name).await);
        }
        debug!("Node '{}' arguments: {:?}", node.name, parsed);

        let outcome = AssertUnwindSafe(function.execute(&parsed, &mut context))
            .catch_unwind()
            .await;
        let output = context.take_output();

        match outcome {
            Ok(Ok(())) => {
                info!("Node '{}' completed", node.name);
                result.mark_completed(NodeStatus::Success, output, None);
            }
            Ok(Err(e)) => {
                let message = format!("{:#}", e);
                error!("Node '{}' failed: {}", node.name, message);
                result.mark_completed(NodeStatus::RuntimeError, output, Some(message));
            }
            Err(panic) => {
                let message = format!("module panicked: {}", panic_message(panic.as_ref()));
                error!("Node '{}' failed: {}", node.name, message);
                result.mark_completed(NodeStatus::RuntimeError, output, Some(message));
            }
        }

        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
