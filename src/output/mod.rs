// ABOUTME: Output handler module for pipeline result formatting and persistence
// ABOUTME: Handles text/JSON formatting and output to stdout or files

pub mod config;
pub mod error;
pub mod formatter;
pub mod writer;

use std::collections::HashMap;

pub use self::config::{OutputConfig, OutputDestination, OutputOptions};
pub use self::error::{OutputError, Result};
pub use self::formatter::{JsonFormatter, OutputFormatter, TextFormatter};
use crate::engine::PipelineResult;

pub struct OutputHandler {
    formatters: HashMap<String, Box<dyn OutputFormatter>>,
}

impl OutputHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            formatters: HashMap::new(),
        };

        // Register built-in formatters
        handler.register_formatter("json", Box::new(JsonFormatter::new()));
        handler.register_formatter("text", Box::new(TextFormatter::new()));
        handler.register_formatter("pretty", Box::new(JsonFormatter::new_pretty()));

        handler
    }

    pub fn register_formatter(&mut self, name: &str, formatter: Box<dyn OutputFormatter>) {
        self.formatters.insert(name.to_string(), formatter);
    }

    /// Format a pipeline result without writing it anywhere
    pub async fn render(&self, result: &PipelineResult, config: &OutputConfig) -> Result<String> {
        let formatter =
            self.formatters
                .get(&config.format)
                .ok_or_else(|| OutputError::FormatterNotFound {
                    format: config.format.clone(),
                })?;

        formatter
            .format_pipeline_result(result, &config.options)
            .await
    }

    pub async fn output_pipeline_result(
        &self,
        result: &PipelineResult,
        config: &OutputConfig,
    ) -> Result<()> {
        let formatted_output = self.render(result, config).await?;
        writer::writer_for(&config.destination)
            .write(&formatted_output)
            .await
    }

    pub fn list_formatters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(|k| k.as_str()).collect();
        names.sort();
        names
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
