// ABOUTME: Configuration management for the gtools application
// ABOUTME: Loads YAML settings from standard locations and applies environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIGS_DIR: &str = "configs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Root of the per-module default parameter files
    #[serde(default = "default_configs_dir")]
    pub configs_dir: PathBuf,

    /// Exit non-zero when a pipeline ran but some nodes failed
    #[serde(default = "default_fail_on_node_error")]
    pub fail_on_node_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            configs_dir: default_configs_dir(),
            fail_on_node_error: default_fail_on_node_error(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn default_configs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIGS_DIR)
}

fn default_fail_on_node_error() -> bool {
    true
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = match path.or_else(Self::find_config_file) {
            Some(config_path) if config_path.exists() => Self::from_file(&config_path)?,
            _ => Config::default(),
        };

        config.merge_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".gtools").join("config.yaml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        ["gtools.yaml", "gtools.yml", ".gtools.yaml", ".gtools.yml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn merge_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply GTOOLS_* overrides from any variable source
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("GTOOLS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GTOOLS_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(configs_dir) = lookup("GTOOLS_CONFIGS_DIR") {
            self.configs_dir = PathBuf::from(configs_dir);
        }
    }
}
