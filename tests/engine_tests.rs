// ABOUTME: Integration tests for the pipeline execution engine
// ABOUTME: Tests scheduling, per-node failure isolation, defaults merging, and result aggregation

use serde_json::json;

use gtools::args::ModuleDefaults;
use gtools::engine::{build_order, estimate_order, NodeStatus, PipelineError, PipelineStatus};
use gtools::{Pipeline, PipelineExecutor, PipelineNode};

mod common;
use common::{calculator_pipeline_json, fixture_registry, TestEnvironment, TestPipelineBuilder};

#[tokio::test]
async fn test_calculator_pipeline_end_to_end() {
    let pipeline = Pipeline::from_json(&calculator_pipeline_json().to_string()).unwrap();

    assert_eq!(build_order(&pipeline.modules).unwrap(), vec!["sum", "double"]);

    let executor = PipelineExecutor::new(fixture_registry());
    let result = executor.execute_pipeline(&pipeline).await.unwrap();

    assert_eq!(result.order, vec!["sum", "double"]);
    assert_eq!(result.status, PipelineStatus::Success);
    assert_eq!(result.results.len(), 2);

    let sum = result.get_result("sum").unwrap();
    assert_eq!(sum.status, NodeStatus::Success);
    assert_eq!(sum.args, vec!["1", "2", "3", "--operation", "add"]);
    assert!(sum.output.contains("1 + 2 + 3 = 6"));

    let double = result.get_result("double").unwrap();
    assert_eq!(double.status, NodeStatus::Success);
    assert!(double.output.contains("2 = 2"));
    assert!(!double.output.contains("1 + 2 + 3"));
}

#[tokio::test]
async fn test_runtime_error_does_not_stop_later_nodes() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("a", "echo", &[])
        .add_module("b", "fail", &["a"])
        .add_module("c", "echo", &["b"])
        .build();

    let result = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap();

    let statuses: Vec<NodeStatus> = result.results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![NodeStatus::Success, NodeStatus::RuntimeError, NodeStatus::Success]
    );

    let failed = result.get_result("b").unwrap();
    assert_eq!(failed.error.as_deref(), Some("deliberate failure"));
    assert_eq!(failed.output, "about to fail\n");

    assert_eq!(result.status, PipelineStatus::PartialSuccess);
    assert_eq!(result.summary.runtime_errors, 1);
    assert_eq!(result.headline(), "1/3 nodes failed");
    assert!(result
        .global_log
        .contains(&"✗ b failed: deliberate failure".to_string()));
    assert_eq!(result.global_log.first().unwrap(), "▶ Executing: a");
    assert_eq!(result.global_log.last().unwrap(), "✓ c completed");
}

#[tokio::test]
async fn test_panicking_module_is_a_runtime_error() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("boom", "explode", &[])
        .add_module("after", "echo", &[])
        .build();

    let result = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap();

    let boom = result.get_result("boom").unwrap();
    assert_eq!(boom.status, NodeStatus::RuntimeError);
    assert!(boom.error.as_deref().unwrap().contains("boom"));
    assert_eq!(result.get_result("after").unwrap().status, NodeStatus::Success);
}

#[tokio::test]
async fn test_missing_module_and_bad_arguments_are_recorded() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("ghost", "nowhere", &[])
        .with_node(PipelineNode::new("typo", "echo").with_param("mesage", "hi"))
        .with_node(PipelineNode::new("schemaless", "function_only").with_param("anything", 1))
        .with_node(PipelineNode::new("bad_choice", "calculator")
            .with_positional("numbers", json!([1]))
            .with_param("operation", "divide"))
        .add_module("fine", "function_only", &[])
        .build();

    let result = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap();

    assert_eq!(
        result.get_result("ghost").unwrap().status,
        NodeStatus::ModuleNotFound
    );
    for name in ["typo", "schemaless", "bad_choice"] {
        let node = result.get_result(name).unwrap();
        assert_eq!(node.status, NodeStatus::ArgumentError, "node {}", name);
        assert!(node.error.as_deref().unwrap().starts_with("Argument error"));
    }
    assert_eq!(result.get_result("fine").unwrap().status, NodeStatus::Success);

    assert_eq!(result.summary.module_not_found, 1);
    assert_eq!(result.summary.argument_errors, 3);
    assert_eq!(result.summary.successful_nodes, 1);
}

#[tokio::test]
async fn test_all_nodes_failing_is_failed_status() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("one", "fail", &[])
        .add_module("two", "nowhere", &[])
        .build();

    let result = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap();
    assert_eq!(result.status, PipelineStatus::Failed);
    assert_eq!(result.headline(), "2/2 nodes failed");
}

#[tokio::test]
async fn test_list_parameter_materializes_in_order() {
    let pipeline = TestPipelineBuilder::new()
        .with_node(PipelineNode::new("count", "counter").with_param("counts", json!([1, 2, 3])))
        .build();

    let result = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap();

    let count = result.get_result("count").unwrap();
    assert_eq!(count.args, vec!["--counts", "1", "2", "3"]);
    assert_eq!(count.output, "counts: [1, 2, 3]\n");
}

#[tokio::test]
async fn test_module_defaults_fill_absent_values() {
    let env = TestEnvironment::new();
    env.write_module_defaults("demo", json!({"items": ["x", "y"], "config_file": "ignored.json"}))
        .await;

    let pipeline = TestPipelineBuilder::new()
        .with_node(PipelineNode::new("demo", "demo").with_param("config_file", "mine.json"))
        .build();

    let result = PipelineExecutor::new(fixture_registry())
        .with_defaults(ModuleDefaults::new(env.configs_dir()))
        .execute_pipeline(&pipeline)
        .await
        .unwrap();

    let output = &result.get_result("demo").unwrap().output;
    assert!(output.contains("Items: x, y"));
    assert!(output.contains("Config file: mine.json"));
}

#[tokio::test]
async fn test_cycle_prevents_any_execution() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("first", "echo", &[])
        .add_module("a", "echo", &["b"])
        .add_module("b", "echo", &["a"])
        .build();

    let err = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::CircularDependency {
            nodes: vec!["a".to_string(), "b".to_string()]
        }
    );
    assert!(err.is_cycle());

    assert_eq!(estimate_order(&pipeline.modules), vec!["first", "a", "b"]);
}

#[tokio::test]
async fn test_unknown_dependency_prevents_start() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("a", "echo", &["missing"])
        .build();

    let err = PipelineExecutor::new(fixture_registry())
        .execute_pipeline(&pipeline)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnknownDependency { .. }));
}

#[test]
fn test_independent_nodes_keep_configuration_order() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("X", "echo", &[])
        .add_module("Y", "echo", &[])
        .build();
    assert_eq!(build_order(&pipeline.modules).unwrap(), vec!["X", "Y"]);
}

#[test]
fn test_diamond_dependencies() {
    let pipeline = TestPipelineBuilder::new()
        .add_module("join", "echo", &["left", "right"])
        .add_module("right", "echo", &["root"])
        .add_module("left", "echo", &["root"])
        .add_module("root", "echo", &[])
        .build();

    assert_eq!(
        build_order(&pipeline.modules).unwrap(),
        vec!["root", "right", "left", "join"]
    );
}

#[tokio::test]
async fn test_run_with_explicit_order() {
    let pipeline = TestPipelineBuilder::new()
        .with_node(PipelineNode::new("hello", "echo").with_param("message", "hi"))
        .with_node(PipelineNode::new("bye", "echo").with_param("message", "bye"))
        .build();

    let executor = PipelineExecutor::new(fixture_registry());
    let results = executor
        .run(&pipeline.modules, &["bye".to_string(), "hello".to_string()])
        .await
        .unwrap();

    assert_eq!(results[0].name, "bye");
    assert_eq!(results[0].output, "bye\n");
    assert_eq!(results[1].output, "hi\n");

    let err = executor
        .run(&pipeline.modules, &["nope".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnknownNode { .. }));
}
