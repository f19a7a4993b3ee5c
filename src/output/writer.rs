// ABOUTME: Output writers for rendered pipeline reports (stdout, files)
// ABOUTME: Handles writing formatted results to the configured destination

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use super::config::OutputDestination;
use super::error::{OutputError, Result};

#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(&self, content: &str) -> Result<()>;
}

pub struct StdoutWriter;

pub struct FileWriter {
    path: std::path::PathBuf,
    create_dirs: bool,
}

/// Pick the writer for a destination
pub fn writer_for(destination: &OutputDestination) -> Box<dyn OutputWriter> {
    match destination {
        OutputDestination::Stdout => Box::new(StdoutWriter::new()),
        OutputDestination::File { path, create_dirs } => {
            Box::new(FileWriter::new(path).with_create_dirs(*create_dirs))
        }
    }
}

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputWriter for StdoutWriter {
    async fn write(&self, content: &str) -> Result<()> {
        println!("{}", content.trim_end());
        debug!("Output written to stdout ({} chars)", content.len());
        Ok(())
    }
}

impl FileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_dirs: true,
        }
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

#[async_trait]
impl OutputWriter for FileWriter {
    async fn write(&self, content: &str) -> Result<()> {
        if self.create_dirs {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| OutputError::WriteError {
                        message: format!("Failed to create directory {}: {}", parent.display(), e),
                    })?;
            }
        }

        fs::write(&self.path, content)
            .await
            .map_err(|e| OutputError::WriteError {
                message: format!("Failed to write file {}: {}", self.path.display(), e),
            })?;

        info!(
            "Output written to file: {} ({} bytes)",
            self.path.display(),
            content.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_writer_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("run.json");

        FileWriter::new(&path).write("{}").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_file_writer_without_create_dirs_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("run.json");

        let err = FileWriter::new(&path)
            .with_create_dirs(false)
            .write("{}")
            .await
            .unwrap_err();
        assert!(matches!(err, OutputError::WriteError { .. }));
    }
}
