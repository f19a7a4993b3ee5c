// ABOUTME: Per-node execution context handed to module callables
// ABOUTME: Carries node identity, working directory hint, and the captured output buffer

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Combined stdout/stderr capture for one node, kept in write order
#[derive(Debug, Clone, Default)]
pub struct ModuleOutput {
    buffer: String,
}

impl ModuleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line of standard output
    pub fn out(&mut self, line: impl AsRef<str>) {
        self.buffer.push_str(line.as_ref());
        self.buffer.push('\n');
    }

    /// Append a line of error output
    pub fn err(&mut self, line: impl AsRef<str>) {
        self.buffer.push_str(line.as_ref());
        self.buffer.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl fmt::Write for ModuleOutput {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl io::Write for ModuleOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub node_name: String,
    pub module_name: String,
    pub run_id: String,
    pub working_directory: Option<PathBuf>,
    pub start_time: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
    pub output: ModuleOutput,
}

impl ModuleContext {
    pub fn new(node_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            module_name: module_name.into(),
            run_id: uuid::Uuid::new_v4().to_string(),
            working_directory: None,
            start_time: Utc::now(),
            metadata: HashMap::new(),
            output: ModuleOutput::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn with_working_directory(mut self, working_directory: Option<PathBuf>) -> Self {
        self.working_directory = working_directory;
        self
    }

    pub fn add_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    pub fn get_metadata(&self, key: &str) -> Option<&String> {
        self.metadata.get(key)
    }

    /// Resolve a path against the working directory hint, if any
    pub fn resolve_path(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        match &self.working_directory {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }

    pub fn out(&mut self, line: impl AsRef<str>) {
        self.output.out(line);
    }

    pub fn err(&mut self, line: impl AsRef<str>) {
        self.output.err(line);
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output).into_string()
    }
}
