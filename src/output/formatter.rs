// ABOUTME: Output formatters for pipeline results (text, JSON)
// ABOUTME: Handles serialization and presentation of per-node and whole-run results

use async_trait::async_trait;
use serde_json::{self, Value as JsonValue};

use super::config::OutputOptions;
use super::error::{OutputError, Result};
use crate::engine::{ExecutionResult, NodeStatus, PipelineResult};

#[async_trait]
pub trait OutputFormatter: Send + Sync {
    async fn format_pipeline_result(
        &self,
        result: &PipelineResult,
        options: &OutputOptions,
    ) -> Result<String>;

    async fn format_node_result(
        &self,
        result: &ExecutionResult,
        options: &OutputOptions,
    ) -> Result<String>;
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct TextFormatter;

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    fn render(&self, value: &JsonValue) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value).map_err(OutputError::SerializationError)
        } else {
            serde_json::to_string(value).map_err(OutputError::SerializationError)
        }
    }

    fn node_value(&self, result: &ExecutionResult, options: &OutputOptions) -> JsonValue {
        let mut node = serde_json::Map::new();
        node.insert("name".to_string(), JsonValue::String(result.name.clone()));
        node.insert(
            "module_name".to_string(),
            JsonValue::String(result.module_name.clone()),
        );
        node.insert(
            "status".to_string(),
            JsonValue::String(result.status.to_string()),
        );
        node.insert(
            "start_time".to_string(),
            JsonValue::String(result.start_time.to_rfc3339()),
        );
        if let Some(seconds) = serde_json::Number::from_f64(result.duration.as_secs_f64()) {
            node.insert("duration_seconds".to_string(), JsonValue::Number(seconds));
        }
        if options.include_args {
            node.insert(
                "args".to_string(),
                JsonValue::Array(result.args.iter().cloned().map(JsonValue::String).collect()),
            );
        }
        if options.include_node_output {
            node.insert(
                "output".to_string(),
                JsonValue::String(truncate(&result.output, options.max_output_length)),
            );
        }
        node.insert(
            "error".to_string(),
            result
                .error
                .clone()
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        );
        JsonValue::Object(node)
    }
}

#[async_trait]
impl OutputFormatter for JsonFormatter {
    async fn format_pipeline_result(
        &self,
        result: &PipelineResult,
        options: &OutputOptions,
    ) -> Result<String> {
        let mut output = serde_json::Map::new();

        output.insert(
            "run_id".to_string(),
            JsonValue::String(result.run_id.clone()),
        );
        output.insert(
            "status".to_string(),
            JsonValue::String(result.status.to_string()),
        );
        output.insert(
            "start_time".to_string(),
            JsonValue::String(result.start_time.to_rfc3339()),
        );
        if let Some(end_time) = result.end_time {
            output.insert(
                "end_time".to_string(),
                JsonValue::String(end_time.to_rfc3339()),
            );
        }
        if let Some(seconds) = result
            .duration
            .and_then(|d| serde_json::Number::from_f64(d.as_secs_f64()))
        {
            output.insert("duration_seconds".to_string(), JsonValue::Number(seconds));
        }
        output.insert("order".to_string(), serde_json::to_value(&result.order)?);
        output.insert("summary".to_string(), serde_json::to_value(&result.summary)?);

        let nodes: Vec<JsonValue> = result
            .results
            .iter()
            .map(|node| self.node_value(node, options))
            .collect();
        output.insert("results".to_string(), JsonValue::Array(nodes));

        if options.include_global_log {
            output.insert(
                "global_log".to_string(),
                serde_json::to_value(&result.global_log)?,
            );
        }

        self.render(&JsonValue::Object(output))
    }

    async fn format_node_result(
        &self,
        result: &ExecutionResult,
        options: &OutputOptions,
    ) -> Result<String> {
        self.render(&self.node_value(result, options))
    }
}

#[async_trait]
impl OutputFormatter for TextFormatter {
    async fn format_pipeline_result(
        &self,
        result: &PipelineResult,
        options: &OutputOptions,
    ) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str(&format!("Pipeline run: {}\n", result.run_id));
        output.push_str(&format!("Status: {}\n", result.status));
        if !result.order.is_empty() {
            output.push_str(&format!("Order: {}\n", result.order.join(" → ")));
        }
        if let Some(duration) = result.duration {
            output.push_str(&format!("Duration: {:.2}s\n", duration.as_secs_f64()));
        }

        // Summary
        output.push_str("\nSummary:\n");
        output.push_str(&format!("  Total nodes: {}\n", result.summary.total_nodes));
        output.push_str(&format!(
            "  Successful: {}\n",
            result.summary.successful_nodes
        ));
        output.push_str(&format!("  Failed: {}\n", result.summary.failed_nodes));
        output.push_str(&format!(
            "  Success rate: {:.1}%\n",
            result.summary.success_rate
        ));
        output.push_str(&format!("  {}\n", result.headline()));

        if !result.results.is_empty() {
            output.push_str("\nNodes:\n");
            for node in &result.results {
                let node_text = self.format_node_result(node, options).await?;
                for line in node_text.lines() {
                    output.push_str(&format!("  {}\n", line));
                }
            }
        }

        if options.include_global_log && !result.global_log.is_empty() {
            output.push_str("\nGlobal log:\n");
            for line in &result.global_log {
                output.push_str(&format!("  {}\n", line));
            }
        }

        Ok(output)
    }

    async fn format_node_result(
        &self,
        result: &ExecutionResult,
        options: &OutputOptions,
    ) -> Result<String> {
        let mut output = String::new();

        let status_icon = match result.status {
            NodeStatus::Success => "✓",
            NodeStatus::ModuleNotFound => "?",
            NodeStatus::ArgumentError | NodeStatus::RuntimeError => "✗",
        };

        output.push_str(&format!(
            "{} {} ({}) [{:.2}s]",
            status_icon,
            result.name,
            result.module_name,
            result.duration.as_secs_f64()
        ));
        if result.is_failed() {
            output.push_str(&format!(" {}", result.status));
        }

        if options.include_args && !result.args.is_empty() {
            output.push_str(&format!("\n    Args: {}", result.args.join(" ")));
        }

        if options.include_node_output {
            let display_output = truncate(result.output.trim_end(), options.max_output_length);
            if !display_output.is_empty() {
                output.push_str(&format!(
                    "\n    Output: {}",
                    display_output.replace('\n', "\n    ")
                ));
            }
        }

        if let Some(ref error) = result.error {
            output.push_str(&format!("\n    Error: {}", error));
        }

        Ok(output)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

fn truncate(text: &str, max_len: Option<usize>) -> String {
    match max_len {
        Some(max_len) if text.chars().count() > max_len => {
            let head: String = text.chars().take(max_len).collect();
            format!("{}... [truncated]", head)
        }
        _ => text.to_string(),
    }
}
