// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and the module and pipeline subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gtools")]
#[command(about = "A registry of task modules composed into dependency-ordered pipelines")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every registered module
    List,

    /// Show registry details and parameters for one module
    Info {
        #[arg(help = "Module name")]
        module: String,
    },

    /// Invoke a single module directly with raw arguments
    Run {
        #[arg(help = "Module name")]
        module: String,

        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            help = "Arguments passed to the module"
        )]
        args: Vec<String>,
    },

    /// Work with pipeline documents
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum PipelineCommands {
    /// Execute a pipeline document
    Run {
        #[arg(help = "Path to pipeline JSON file")]
        file: PathBuf,

        #[arg(short, long, help = "Write the run report to this file")]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        #[arg(long, help = "Validate and show the execution order without running")]
        dry_run: bool,
    },

    /// Print the execution order of a pipeline
    Order {
        #[arg(help = "Path to pipeline JSON file")]
        file: PathBuf,

        #[arg(long, help = "Fail on cycles instead of falling back to document order")]
        strict: bool,
    },

    /// Validate a pipeline document against the registry
    Validate {
        #[arg(help = "Path to pipeline JSON file")]
        file: PathBuf,
    },

    /// Create an empty pipeline document
    Init {
        #[arg(help = "Path of the pipeline JSON file to create")]
        file: PathBuf,

        #[arg(short, long, help = "Working directory recorded in the document")]
        working_dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Pretty,
}

impl ReportFormat {
    /// Name of the output formatter rendering this format
    pub fn formatter_name(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Pretty => "pretty",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_keeps_hyphenated_module_args() {
        let args = Args::try_parse_from([
            "gtools",
            "run",
            "calculator",
            "1",
            "2",
            "-op",
            "multiply",
            "--show-details",
        ])
        .unwrap();

        match args.command {
            Commands::Run { module, args } => {
                assert_eq!(module, "calculator");
                assert_eq!(args, vec!["1", "2", "-op", "multiply", "--show-details"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_run_options() {
        let args = Args::try_parse_from([
            "gtools",
            "--verbose",
            "pipeline",
            "run",
            "flow.json",
            "--format",
            "json",
            "--dry-run",
        ])
        .unwrap();

        assert!(args.verbose);
        match args.command {
            Commands::Pipeline {
                command:
                    PipelineCommands::Run {
                        file,
                        output,
                        format,
                        dry_run,
                    },
            } => {
                assert_eq!(file, PathBuf::from("flow.json"));
                assert!(output.is_none());
                assert_eq!(format, ReportFormat::Json);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["gtools", "pipeline", "run", "f.json", "--format", "xml"]).is_err());
    }
}
