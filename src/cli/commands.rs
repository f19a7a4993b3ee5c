// ABOUTME: Command implementations for the gtools CLI
// ABOUTME: Handles module listing and invocation plus pipeline run, order, validate, and init

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

use super::args::ReportFormat;
use super::config::Config;
use crate::args::{ArgumentParser, ModuleDefaults};
use crate::engine::{build_order, estimate_order, ModuleContext, PipelineExecutor};
use crate::output::{OutputConfig, OutputHandler};
use crate::parser::{PipelineParser, PipelineValidator, ValidationReport};
use crate::registry::ModuleRegistry;

/// The pipeline ran but at least one node failed
pub const EXIT_NODE_FAILURES: u8 = 2;

/// List every module known to either registry
pub fn list_modules(registry: &ModuleRegistry) -> Result<ExitCode> {
    let modules = registry.list_all_modules();

    println!("Available modules:");
    for name in &modules {
        let info = registry.module_info(name);
        if info.complete {
            println!("  ✓ {}", name);
        } else if info.has_function {
            println!("  ✗ {} (missing schema)", name);
        } else {
            println!("  ✗ {} (missing function)", name);
        }
    }
    println!("Total: {} module(s)", modules.len());

    Ok(ExitCode::SUCCESS)
}

/// Show registry state, default config location, and parameters for one module
pub fn module_info(registry: &ModuleRegistry, config: &Config, name: &str) -> Result<ExitCode> {
    let info = registry.module_info(name);
    if !info.has_function && !info.has_schema {
        return Err(anyhow!(
            "Module '{}' not found. Available: {}",
            name,
            registry.list_all_modules().join(", ")
        ));
    }

    let defaults = ModuleDefaults::new(&config.configs_dir);
    let default_path = defaults.path_for(name);

    println!("Module: {}", info.module_name);
    println!("  Function registered: {}", yes_no(info.has_function));
    println!("  Schema registered: {}", yes_no(info.has_schema));
    println!("  Complete: {}", yes_no(info.complete));
    println!(
        "  Default config: {} ({})",
        default_path.display(),
        if default_path.exists() { "found" } else { "not found" }
    );

    if let Some(Ok(schema)) = registry.module_schema(name) {
        if !schema.description.is_empty() {
            println!("  Description: {}", schema.description);
        }
    }

    let descriptors = registry.describe_module(name);
    if descriptors.is_empty() {
        println!("  Parameters: none");
    } else {
        println!("  Parameters:");
        for descriptor in &descriptors {
            let mut line = format!("    {} <{}>", descriptor.display_name(), descriptor.kind);
            if descriptor.required {
                line.push_str(" required");
            }
            if let Some(default) = &descriptor.default {
                line.push_str(&format!(" [default: {}]", default));
            }
            if let Some(choices) = &descriptor.choices {
                let rendered: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
                line.push_str(&format!(" {{{}}}", rendered.join(", ")));
            }
            if !descriptor.help.is_empty() {
                line.push_str(&format!("  {}", descriptor.help));
            }
            println!("{}", line);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Parse raw arguments against a module's schema and invoke it once
pub async fn run_module(
    registry: &ModuleRegistry,
    config: &Config,
    name: &str,
    raw_args: &[String],
) -> Result<ExitCode> {
    let function = registry.function(name).ok_or_else(|| {
        anyhow!(
            "Module '{}' not found. Available: {}",
            name,
            registry.functions().list_modules().join(", ")
        )
    })?;

    let descriptors = registry.describe_module(name);
    let mut args = ArgumentParser::new(&descriptors)
        .parse(raw_args)
        .with_context(|| format!("Invalid arguments for module '{}'", name))?;
    args.merge_defaults(&ModuleDefaults::new(&config.configs_dir).load(name).await);
    debug!("Invoking module '{}' with {:?}", name, args);

    let mut ctx = ModuleContext::new(name, name)
        .with_working_directory(std::env::current_dir().ok());
    let outcome = function.execute(&args, &mut ctx).await;

    print!("{}", ctx.take_output());
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("✗ {} failed: {:#}", name, e);
            Ok(ExitCode::from(EXIT_NODE_FAILURES))
        }
    }
}

/// Execute a pipeline document and report the result
pub async fn run_pipeline(
    registry: Arc<ModuleRegistry>,
    config: &Config,
    file: PathBuf,
    output: Option<PathBuf>,
    format: ReportFormat,
    dry_run: bool,
) -> Result<ExitCode> {
    info!("Loading pipeline: {}", file.display());
    let pipeline = PipelineParser::new()
        .parse_file(&file)
        .await
        .with_context(|| format!("Failed to load pipeline {}", file.display()))?;

    if dry_run {
        let report = PipelineValidator::new()
            .with_registry(registry)
            .validate(&pipeline);
        print_report(&report);
        if !report.is_valid {
            return Err(anyhow!("Pipeline validation failed"));
        }
        let order = build_order(&pipeline.modules)?;
        println!("Dry run: would execute {}", order.join(" → "));
        return Ok(ExitCode::SUCCESS);
    }

    let executor =
        PipelineExecutor::new(registry).with_defaults(ModuleDefaults::new(&config.configs_dir));
    let result = executor
        .execute_pipeline(&pipeline)
        .await
        .context("Pipeline could not start")?;

    let mut output_config = OutputConfig::new(format.formatter_name());
    if let Some(path) = output {
        output_config = output_config.to_file(path);
    }
    OutputHandler::new()
        .output_pipeline_result(&result, &output_config)
        .await?;

    if result.has_failures() && config.fail_on_node_error {
        Ok(ExitCode::from(EXIT_NODE_FAILURES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print the order a pipeline's nodes would run in
pub async fn pipeline_order(file: PathBuf, strict: bool) -> Result<ExitCode> {
    let pipeline = PipelineParser::new()
        .parse_file(&file)
        .await
        .with_context(|| format!("Failed to load pipeline {}", file.display()))?;

    let order = if strict {
        build_order(&pipeline.modules)?
    } else {
        estimate_order(&pipeline.modules)
    };

    for (position, name) in order.iter().enumerate() {
        println!("{}. {}", position + 1, name);
    }
    Ok(ExitCode::SUCCESS)
}

/// Validate a pipeline document against the registry
pub async fn validate_pipeline(registry: Arc<ModuleRegistry>, file: PathBuf) -> Result<ExitCode> {
    let pipeline = PipelineParser::new()
        .parse_file(&file)
        .await
        .with_context(|| format!("Failed to load pipeline {}", file.display()))?;

    let report = PipelineValidator::new()
        .with_registry(registry)
        .validate(&pipeline);
    print_report(&report);

    if report.is_valid {
        println!("✓ Pipeline is valid ({} node(s))", pipeline.modules.len());
        Ok(ExitCode::SUCCESS)
    } else {
        Err(anyhow!(
            "Pipeline has {} validation error(s)",
            report.errors.len()
        ))
    }
}

/// Create an empty pipeline document
pub async fn init_pipeline(file: PathBuf, working_dir: Option<PathBuf>) -> Result<ExitCode> {
    PipelineParser::new().init_file(&file, working_dir).await?;
    println!("Created pipeline document: {}", file.display());
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        println!("  ✗ {}", error);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
