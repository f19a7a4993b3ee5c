// ABOUTME: Pipeline validation logic and dependency checking
// ABOUTME: Reports structural errors, unknown modules, and parameters that would fail to materialize

use std::collections::HashSet;
use std::sync::Arc;

use super::error::ValidationError;
use super::pipeline::Pipeline;
use crate::args;
use crate::engine::DependencyGraph;
use crate::registry::ModuleRegistry;

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

pub struct PipelineValidator {
    registry: Option<Arc<ModuleRegistry>>,
}

impl PipelineValidator {
    pub fn new() -> Self {
        Self { registry: None }
    }

    /// Also check modules and parameters against a registry
    pub fn with_registry(mut self, registry: Arc<ModuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validate a complete pipeline
    pub fn validate(&self, pipeline: &Pipeline) -> ValidationReport {
        let mut report = ValidationReport::new();

        if pipeline.modules.is_empty() {
            report.warnings.push("Pipeline has no nodes".to_string());
        }

        self.validate_names(pipeline, &mut report);
        self.validate_dependencies(pipeline, &mut report);
        self.detect_cycles(pipeline, &mut report);

        if let Some(registry) = &self.registry {
            self.validate_modules(pipeline, registry, &mut report);
        }

        report.is_valid = report.errors.is_empty();
        report
    }

    fn validate_names(&self, pipeline: &Pipeline, report: &mut ValidationReport) {
        let mut seen = HashSet::new();
        for (index, node) in pipeline.modules.iter().enumerate() {
            if node.name.trim().is_empty() {
                report.errors.push(ValidationError::EmptyNodeName { index });
            } else if !seen.insert(node.name.as_str()) {
                report.errors.push(ValidationError::DuplicateNode {
                    node: node.name.clone(),
                });
            }
        }
    }

    fn validate_dependencies(&self, pipeline: &Pipeline, report: &mut ValidationReport) {
        let names: HashSet<&str> = pipeline.modules.iter().map(|m| m.name.as_str()).collect();

        for node in &pipeline.modules {
            for dependency in &node.depends_on {
                if *dependency == node.name {
                    report.errors.push(ValidationError::SelfDependency {
                        node: node.name.clone(),
                    });
                } else if !names.contains(dependency.as_str()) {
                    report.errors.push(ValidationError::UnknownDependency {
                        node: node.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
    }

    fn detect_cycles(&self, pipeline: &Pipeline, report: &mut ValidationReport) {
        let Some(graph) = DependencyGraph::lenient(&pipeline.modules) else {
            return;
        };
        let members = graph.cycle_members();
        if !members.is_empty() {
            report
                .errors
                .push(ValidationError::CircularDependency { nodes: members });
        }
    }

    fn validate_modules(
        &self,
        pipeline: &Pipeline,
        registry: &ModuleRegistry,
        report: &mut ValidationReport,
    ) {
        for node in &pipeline.modules {
            let info = registry.module_info(&node.module_name);

            if !info.has_function {
                report.errors.push(ValidationError::UnknownModule {
                    node: node.name.clone(),
                    module: node.module_name.clone(),
                    available: registry.functions().list_modules(),
                });
                continue;
            }

            if !info.has_schema {
                report.warnings.push(format!(
                    "Module '{}' used by node '{}' has no schema; it accepts no parameters",
                    node.module_name, node.name
                ));
            } else if let Some(Err(e)) = registry.module_schema(&node.module_name) {
                report.warnings.push(format!(
                    "Schema for module '{}' could not be described: {}",
                    node.module_name, e
                ));
            }

            let descriptors = registry.describe_module(&node.module_name);
            if let Err(e) = args::prepare(&descriptors, &node.params) {
                report.errors.push(ValidationError::InvalidParameters {
                    node: node.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for PipelineValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PipelineNode;
    use serde_json::json;

    fn pipeline(nodes: Vec<PipelineNode>) -> Pipeline {
        Pipeline {
            working_directory: None,
            modules: nodes,
        }
    }

    #[test]
    fn test_circular_dependency_detection() {
        let report = PipelineValidator::new().validate(&pipeline(vec![
            PipelineNode::new("task_a", "demo").depends_on("task_b"),
            PipelineNode::new("task_b", "demo").depends_on("task_a"),
        ]));

        assert!(report.has_errors());
        assert_eq!(
            report.errors[0],
            ValidationError::CircularDependency {
                nodes: vec!["task_a".to_string(), "task_b".to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_and_self_dependency() {
        let report = PipelineValidator::new().validate(&pipeline(vec![
            PipelineNode::new("task_a", "demo").depends_on("nonexistent_task"),
            PipelineNode::new("task_b", "demo").depends_on("task_b"),
        ]));

        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            report.errors[0],
            ValidationError::UnknownDependency { .. }
        ));
        assert!(matches!(
            report.errors[1],
            ValidationError::SelfDependency { .. }
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let report = PipelineValidator::new().validate(&pipeline(vec![
            PipelineNode::new("a", "demo"),
            PipelineNode::new("a", "demo"),
        ]));
        assert_eq!(
            report.errors,
            vec![ValidationError::DuplicateNode {
                node: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_registry_checks() {
        let registry = Arc::new(ModuleRegistry::with_builtins());
        let report = PipelineValidator::new()
            .with_registry(registry)
            .validate(&pipeline(vec![
                PipelineNode::new("sum", "calculator")
                    .with_positional("numbers", json!([1, 2, 3]))
                    .with_param("operation", "add"),
                PipelineNode::new("bad", "calculator")
                    .with_positional("numbers", json!([1]))
                    .with_param("operation", "divide"),
                PipelineNode::new("ghost", "nowhere"),
            ]));

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            &report.errors[0],
            ValidationError::InvalidParameters { node, .. } if node == "bad"
        ));
        assert!(matches!(
            &report.errors[1],
            ValidationError::UnknownModule { module, .. } if module == "nowhere"
        ));
    }

    #[test]
    fn test_valid_pipeline() {
        let report = PipelineValidator::new()
            .with_registry(Arc::new(ModuleRegistry::with_builtins()))
            .validate(&pipeline(vec![
                PipelineNode::new("first", "demo").with_param("verbose", true),
                PipelineNode::new("second", "demo").depends_on("first"),
            ]));

        assert!(!report.has_errors());
        assert!(!report.has_warnings());
        assert!(report.is_valid);
    }
}
