// ABOUTME: Pipeline document structure and JSON loading/saving
// ABOUTME: Defines the Pipeline struct, node editing helpers, and the async PipelineParser

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::{ParserError, Result};
use super::node::PipelineNode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default, alias = "working_dir")]
    pub working_directory: Option<PathBuf>,
    #[serde(default)]
    pub modules: Vec<PipelineNode>,
}

impl Pipeline {
    /// A fresh document with no nodes
    pub fn empty(working_directory: Option<PathBuf>) -> Self {
        Self {
            working_directory,
            modules: Vec::new(),
        }
    }

    /// Parse pipeline from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ParserError::IoError)?;
        Self::from_json(&content)
    }

    /// Parse pipeline from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(ParserError::InvalidFormat(
                "pipeline document must be a JSON object".to_string(),
            ));
        }
        let pipeline: Pipeline = serde_json::from_value(value)?;
        Ok(pipeline)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ParserError::JsonError)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).map_err(ParserError::IoError)?;
        Ok(())
    }

    pub fn node_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }

    pub fn node(&self, name: &str) -> Option<&PipelineNode> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.node(name).is_some()
    }

    pub fn add_node(&mut self, node: PipelineNode) {
        self.modules.push(node);
    }

    /// Remove a node and drop every reference to it from the remaining nodes
    pub fn remove_node(&mut self, name: &str) -> Option<PipelineNode> {
        let index = self.modules.iter().position(|m| m.name == name)?;
        let removed = self.modules.remove(index);
        for node in &mut self.modules {
            node.depends_on.retain(|d| d != name);
        }
        Some(removed)
    }

    /// Rename a node and rewrite dependency references to follow it
    pub fn rename_node(&mut self, old_name: &str, new_name: &str) -> bool {
        let Some(node) = self.modules.iter_mut().find(|m| m.name == old_name) else {
            return false;
        };
        node.name = new_name.to_string();

        for node in &mut self.modules {
            for dependency in &mut node.depends_on {
                if *dependency == old_name {
                    *dependency = new_name.to_string();
                }
            }
        }
        true
    }

    /// Nodes that list `name` in their dependencies
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.modules
            .iter()
            .filter(|m| m.has_dependency(name))
            .map(|m| m.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineParser;

impl PipelineParser {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Pipeline> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ParserError::IoError)?;
        self.parse_string(&content)
    }

    pub fn parse_string(&self, content: &str) -> Result<Pipeline> {
        Pipeline::from_json(content)
    }

    pub async fn save_file<P: AsRef<Path>>(&self, pipeline: &Pipeline, path: P) -> Result<()> {
        let json = pipeline.to_json()?;
        fs::write(path.as_ref(), json)
            .await
            .map_err(ParserError::IoError)
    }

    /// Write an empty document, refusing to replace an existing file
    pub async fn init_file<P: AsRef<Path>>(&self, path: P, working_directory: Option<PathBuf>) -> Result<Pipeline> {
        let path = path.as_ref();
        if path.exists() {
            return Err(ParserError::AlreadyExists(path.display().to_string()));
        }
        let pipeline = Pipeline::empty(working_directory);
        self.save_file(&pipeline, path).await?;
        Ok(pipeline)
    }
}

impl Default for PipelineParser {
    fn default() -> Self {
        Self::new()
    }
}
