// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides pipeline builders, fixture registries, and temp-dir environments

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

use gtools::engine::ModuleContext;
use gtools::schema::{ArgumentRule, ModuleSchema, Nargs, ValueType};
use gtools::{ModuleRegistry, ParsedArgs, Pipeline, PipelineNode};

/// Builds pipeline documents node by node
pub struct TestPipelineBuilder {
    working_directory: Option<PathBuf>,
    nodes: Vec<PipelineNode>,
}

impl TestPipelineBuilder {
    pub fn new() -> Self {
        Self {
            working_directory: None,
            nodes: Vec::new(),
        }
    }

    pub fn with_working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    pub fn with_node(mut self, node: PipelineNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn add_sum(mut self, name: &str, numbers: Value, depends_on: &[&str]) -> Self {
        let mut node = PipelineNode::new(name, "calculator")
            .with_positional("numbers", numbers)
            .with_param("operation", "add");
        for dependency in depends_on {
            node = node.depends_on(*dependency);
        }
        self.nodes.push(node);
        self
    }

    pub fn add_product(mut self, name: &str, numbers: Value, depends_on: &[&str]) -> Self {
        let mut node = PipelineNode::new(name, "calculator")
            .with_positional("numbers", numbers)
            .with_param("operation", "multiply");
        for dependency in depends_on {
            node = node.depends_on(*dependency);
        }
        self.nodes.push(node);
        self
    }

    pub fn add_module(mut self, name: &str, module_name: &str, depends_on: &[&str]) -> Self {
        let mut node = PipelineNode::new(name, module_name);
        for dependency in depends_on {
            node = node.depends_on(*dependency);
        }
        self.nodes.push(node);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            working_directory: self.working_directory,
            modules: self.nodes,
        }
    }

    pub async fn write_to_file(self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = self.build().to_json()?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for TestPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn pipeline_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.json", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_output.json", name))
    }

    pub fn configs_dir(&self) -> PathBuf {
        self.path().join("configs")
    }

    pub async fn create_pipeline_file(&self, name: &str, builder: TestPipelineBuilder) -> PathBuf {
        let pipeline_file = self.pipeline_file(name);
        builder
            .write_to_file(&pipeline_file)
            .await
            .expect("Failed to write pipeline file");
        pipeline_file
    }

    /// Write `<configs>/<module>/default.json`
    pub async fn write_module_defaults(&self, module_name: &str, defaults: Value) {
        let dir = self.configs_dir().join(module_name);
        fs::create_dir_all(&dir)
            .await
            .expect("Failed to create configs dir");
        fs::write(dir.join("default.json"), defaults.to_string())
            .await
            .expect("Failed to write module defaults");
    }
}

/// Built-ins plus fixture modules: `echo` (message option), `fail` (always errors),
/// `explode` (panics), and `function_only` (no schema)
pub fn fixture_registry() -> Arc<ModuleRegistry> {
    let mut registry = ModuleRegistry::with_builtins();

    registry.register_fn("echo", |args: &ParsedArgs, ctx: &mut ModuleContext| {
        ctx.out(args.string("message").unwrap_or("(none)"));
        Ok(())
    });
    registry.register_schema(
        "echo",
        Arc::new(
            ModuleSchema::new("Echo a message").argument(ArgumentRule::option(&["--message", "-m"])),
        ),
    );

    registry.register_fn("fail", |_: &ParsedArgs, ctx: &mut ModuleContext| {
        ctx.out("about to fail");
        anyhow::bail!("deliberate failure")
    });
    registry.register_schema("fail", Arc::new(ModuleSchema::new("Always fails")));

    registry.register_fn(
        "explode",
        |_: &ParsedArgs, _: &mut ModuleContext| -> anyhow::Result<()> { panic!("boom") },
    );
    registry.register_schema("explode", Arc::new(ModuleSchema::new("Always panics")));

    registry.register_fn("function_only", |_: &ParsedArgs, ctx: &mut ModuleContext| {
        ctx.out("no schema here");
        Ok(())
    });

    registry.register_fn("counter", |args: &ParsedArgs, ctx: &mut ModuleContext| {
        ctx.out(format!("counts: {:?}", args.ints("counts")));
        Ok(())
    });
    registry.register_schema(
        "counter",
        Arc::new(
            ModuleSchema::new("Print integer counts").argument(
                ArgumentRule::option(&["--counts"])
                    .nargs(Nargs::OneOrMore)
                    .value_type(ValueType::Int),
            ),
        ),
    );

    Arc::new(registry)
}

/// Example document from the calculator walkthrough
pub fn calculator_pipeline_json() -> Value {
    json!({
        "modules": [
            {
                "name": "sum",
                "module_name": "calculator",
                "params": {"_positional": {"numbers": [1, 2, 3]}, "operation": "add"},
                "depends_on": []
            },
            {
                "name": "double",
                "module_name": "calculator",
                "params": {"_positional": {"numbers": [2]}, "operation": "multiply"},
                "depends_on": ["sum"]
            }
        ]
    })
}

pub async fn read_json_output(
    file_path: &Path,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path).await?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_builder() {
        let pipeline = TestPipelineBuilder::new()
            .add_sum("sum", json!([1, 2]), &[])
            .add_product("double", json!([2]), &["sum"])
            .build();

        assert_eq!(pipeline.node_names(), vec!["sum", "double"]);
        assert!(pipeline.node("double").unwrap().has_dependency("sum"));
    }

    #[test]
    fn test_fixture_registry() {
        let registry = fixture_registry();
        assert!(registry.validate_module("echo"));
        assert!(registry.validate_module("calculator"));
        assert!(!registry.validate_module("function_only"));
    }
}
