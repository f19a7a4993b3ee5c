// ABOUTME: Configuration types for rendering pipeline results
// ABOUTME: Selects a formatter, a destination, and what each report includes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub destination: OutputDestination,
    #[serde(default)]
    pub options: OutputOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputDestination {
    #[default]
    Stdout,
    File {
        path: PathBuf,
        #[serde(default = "default_true")]
        create_dirs: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default = "default_true")]
    pub include_node_output: bool,
    #[serde(default)]
    pub include_global_log: bool,
    #[serde(default)]
    pub include_args: bool,
    #[serde(default)]
    pub max_output_length: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            destination: OutputDestination::Stdout,
            options: OutputOptions::default(),
        }
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            include_node_output: true,
            include_global_log: false,
            include_args: false,
            max_output_length: None,
        }
    }
}

impl OutputConfig {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn to_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = OutputDestination::File {
            path: path.into(),
            create_dirs: true,
        };
        self
    }
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}
