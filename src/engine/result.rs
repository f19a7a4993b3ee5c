// ABOUTME: Node execution result types and pipeline result aggregation
// ABOUTME: Defines per-node outcomes, run summaries, and the overall pipeline status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Success,
    ModuleNotFound,
    ArgumentError,
    RuntimeError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub name: String,
    pub module_name: String,
    pub status: NodeStatus,
    /// Materialized invocation tokens, empty when materialization never happened
    pub args: Vec<String>,
    /// Combined stdout/stderr captured for this node only
    pub output: String,
    pub error: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Success,
    PartialSuccess,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineSummary {
    pub total_nodes: usize,
    pub successful_nodes: usize,
    pub failed_nodes: usize,
    pub module_not_found: usize,
    pub argument_errors: usize,
    pub runtime_errors: usize,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub status: PipelineStatus,
    pub order: Vec<String>,
    pub results: Vec<ExecutionResult>,
    pub summary: PipelineSummary,
    /// Interleaved progress lines for the whole run
    pub global_log: Vec<String>,
}

impl ExecutionResult {
    pub fn new(name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_name: module_name.into(),
            status: NodeStatus::Success,
            args: Vec::new(),
            output: String::new(),
            error: None,
            start_time: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    pub fn mark_completed(&mut self, status: NodeStatus, output: String, error: Option<String>) {
        self.status = status;
        self.duration = (Utc::now() - self.start_time)
            .to_std()
            .unwrap_or(Duration::ZERO);
        self.output = output;
        self.error = error;
    }

    pub fn is_successful(&self) -> bool {
        self.status == NodeStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        !self.is_successful()
    }
}

impl PipelineResult {
    pub fn new(run_id: impl Into<String>, order: Vec<String>) -> Self {
        Self {
            run_id: run_id.into(),
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            status: PipelineStatus::Success,
            order,
            results: Vec::new(),
            summary: PipelineSummary::default(),
            global_log: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: ExecutionResult) {
        self.results.push(result);
        self.update_summary();
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.global_log.push(line.into());
    }

    pub fn mark_completed(&mut self) {
        self.end_time = Some(Utc::now());
        self.duration = Some(
            (Utc::now() - self.start_time)
                .to_std()
                .unwrap_or(Duration::ZERO),
        );
        self.update_summary();
        self.update_status();
    }

    pub fn get_result(&self, name: &str) -> Option<&ExecutionResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.is_failed())
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    /// "N/M nodes failed" style headline for reporters
    pub fn headline(&self) -> String {
        if self.summary.failed_nodes == 0 {
            format!("{} node(s) completed successfully", self.summary.total_nodes)
        } else {
            format!(
                "{}/{} nodes failed",
                self.summary.failed_nodes, self.summary.total_nodes
            )
        }
    }

    fn update_status(&mut self) {
        let has_failed = self.results.iter().any(|r| r.is_failed());
        let has_success = self.results.iter().any(|r| r.is_successful());

        self.status = match (has_failed, has_success) {
            (false, _) => PipelineStatus::Success,
            (true, true) => PipelineStatus::PartialSuccess,
            (true, false) => PipelineStatus::Failed,
        };
    }

    fn update_summary(&mut self) {
        let count = |status: NodeStatus| self.results.iter().filter(|r| r.status == status).count();

        let total = self.results.len();
        let successful = count(NodeStatus::Success);
        let module_not_found = count(NodeStatus::ModuleNotFound);
        let argument_errors = count(NodeStatus::ArgumentError);
        let runtime_errors = count(NodeStatus::RuntimeError);

        let success_rate = if total > 0 {
            (successful as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        self.summary = PipelineSummary {
            total_nodes: total,
            successful_nodes: successful,
            failed_nodes: total - successful,
            module_not_found,
            argument_errors,
            runtime_errors,
            success_rate,
        };
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Success => write!(f, "success"),
            NodeStatus::ModuleNotFound => write!(f, "module_not_found"),
            NodeStatus::ArgumentError => write!(f, "argument_error"),
            NodeStatus::RuntimeError => write!(f, "runtime_error"),
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStatus::Success => write!(f, "success"),
            PipelineStatus::PartialSuccess => write!(f, "partial_success"),
            PipelineStatus::Failed => write!(f, "failed"),
        }
    }
}
