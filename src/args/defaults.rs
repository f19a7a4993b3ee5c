// ABOUTME: Loads per-module default parameter files from the configs directory
// ABOUTME: Missing or malformed files yield an empty map so invocation never fails on defaults

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::value::ArgValue;

pub const DEFAULT_CONFIG_FILE: &str = "default.json";

#[derive(Debug, Clone)]
pub struct ModuleDefaults {
    configs_dir: PathBuf,
}

impl ModuleDefaults {
    pub fn new(configs_dir: impl Into<PathBuf>) -> Self {
        Self {
            configs_dir: configs_dir.into(),
        }
    }

    pub fn configs_dir(&self) -> &Path {
        &self.configs_dir
    }

    /// `<configs_dir>/<module>/default.json`
    pub fn path_for(&self, module_name: &str) -> PathBuf {
        self.configs_dir.join(module_name).join(DEFAULT_CONFIG_FILE)
    }

    pub async fn load(&self, module_name: &str) -> IndexMap<String, ArgValue> {
        let path = self.path_for(module_name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return IndexMap::new(),
            Err(e) => {
                warn!("Failed to read default config {}: {}", path.display(), e);
                return IndexMap::new();
            }
        };

        let raw: IndexMap<String, JsonValue> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to parse default config {}: {}", path.display(), e);
                return IndexMap::new();
            }
        };

        let defaults: IndexMap<String, ArgValue> = raw
            .into_iter()
            .filter_map(|(key, value)| match ArgValue::from_json(&value) {
                Some(value) => Some((key, value)),
                None => {
                    warn!("Ignoring nested default '{}' in {}", key, path.display());
                    None
                }
            })
            .collect();

        debug!(
            "Loaded {} default(s) for module '{}' from {}",
            defaults.len(),
            module_name,
            path.display()
        );
        defaults
    }
}
