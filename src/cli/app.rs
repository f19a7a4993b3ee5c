// ABOUTME: Main application orchestration for the gtools CLI
// ABOUTME: Installs logging, builds the module registry, and dispatches subcommands

use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::args::PipelineCommands;
use super::commands;
use super::{Args, Commands, Config};
use crate::registry::ModuleRegistry;

pub struct App {
    config: Config,
    registry: Arc<ModuleRegistry>,
}

impl App {
    /// Create an application with the built-in modules registered
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, ModuleRegistry::with_builtins())
    }

    pub fn with_registry(config: Config, registry: ModuleRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match self.config.logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&self, args: Args) -> Result<ExitCode> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting gtools v{}", crate::VERSION);
        debug!("Configuration: {:?}", self.config);

        self.dispatch(args.command).await
    }

    /// Execute one subcommand without touching global logging state
    pub async fn dispatch(&self, command: Commands) -> Result<ExitCode> {
        match command {
            Commands::List => commands::list_modules(&self.registry),

            Commands::Info { module } => commands::module_info(&self.registry, &self.config, &module),

            Commands::Run { module, args } => {
                commands::run_module(&self.registry, &self.config, &module, &args).await
            }

            Commands::Pipeline { command } => match command {
                PipelineCommands::Run {
                    file,
                    output,
                    format,
                    dry_run,
                } => {
                    commands::run_pipeline(
                        self.registry.clone(),
                        &self.config,
                        file,
                        output,
                        format,
                        dry_run,
                    )
                    .await
                }
                PipelineCommands::Order { file, strict } => {
                    commands::pipeline_order(file, strict).await
                }
                PipelineCommands::Validate { file } => {
                    commands::validate_pipeline(self.registry.clone(), file).await
                }
                PipelineCommands::Init { file, working_dir } => {
                    commands::init_pipeline(file, working_dir).await
                }
            },
        }
    }
}
