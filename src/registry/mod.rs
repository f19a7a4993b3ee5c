// ABOUTME: Module registry mapping module names to execution callables and schema providers
// ABOUTME: Two independent name tables; a module is complete only when present in both

pub mod module;

pub use module::{FnModule, ModuleFunction};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::args::ParsedArgs;
use crate::engine::ModuleContext;
use crate::schema::{self, ModuleSchema, ParameterDescriptor, SchemaProvider};

/// A named table of registered entries. Last registration under a name wins.
pub struct Registry<T> {
    name: String,
    entries: HashMap<String, T>,
}

impl<T> Registry<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, module_name: impl Into<String>, entry: T) {
        let module_name = module_name.into();
        if self.entries.contains_key(&module_name) {
            warn!(
                "{} already registered in {}, overwriting",
                module_name, self.name
            );
        }
        debug!("Registered '{}' in {}", module_name, self.name);
        self.entries.insert(module_name, entry);
    }

    pub fn get(&self, module_name: &str) -> Option<&T> {
        self.entries.get(module_name)
    }

    pub fn has(&self, module_name: &str) -> bool {
        self.entries.contains_key(module_name)
    }

    /// Registered names, sorted
    pub fn list_modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub module_name: String,
    pub has_function: bool,
    pub has_schema: bool,
    pub complete: bool,
}

pub struct ModuleRegistry {
    functions: Registry<Arc<dyn ModuleFunction>>,
    schemas: Registry<Arc<dyn SchemaProvider>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            functions: Registry::new("function_registry"),
            schemas: Registry::new("config_registry"),
        }
    }

    /// Registry pre-populated with the bundled modules
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::modules::register_builtins(&mut registry);
        registry
    }

    pub fn register_function(&mut self, module_name: impl Into<String>, function: Arc<dyn ModuleFunction>) {
        self.functions.register(module_name, function);
    }

    /// Register a synchronous closure as a module's execution callable
    pub fn register_fn<F>(&mut self, module_name: impl Into<String>, func: F)
    where
        F: Fn(&ParsedArgs, &mut ModuleContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_function(module_name, Arc::new(FnModule::new(func)));
    }

    pub fn register_schema(&mut self, module_name: impl Into<String>, provider: Arc<dyn SchemaProvider>) {
        self.schemas.register(module_name, provider);
    }

    /// Register both halves of a module at once
    pub fn register_module<M>(&mut self, module_name: &str, module: M)
    where
        M: ModuleFunction + SchemaProvider + 'static,
    {
        let module = Arc::new(module);
        self.functions.register(module_name, module.clone() as Arc<dyn ModuleFunction>);
        self.schemas.register(module_name, module as Arc<dyn SchemaProvider>);
    }

    pub fn function(&self, module_name: &str) -> Option<Arc<dyn ModuleFunction>> {
        self.functions.get(module_name).cloned()
    }

    pub fn schema_provider(&self, module_name: &str) -> Option<Arc<dyn SchemaProvider>> {
        self.schemas.get(module_name).cloned()
    }

    pub fn has_function(&self, module_name: &str) -> bool {
        self.functions.has(module_name)
    }

    pub fn has_schema(&self, module_name: &str) -> bool {
        self.schemas.has(module_name)
    }

    pub fn functions(&self) -> &Registry<Arc<dyn ModuleFunction>> {
        &self.functions
    }

    pub fn schemas(&self) -> &Registry<Arc<dyn SchemaProvider>> {
        &self.schemas
    }

    pub fn module_info(&self, module_name: &str) -> ModuleInfo {
        let has_function = self.has_function(module_name);
        let has_schema = self.has_schema(module_name);
        ModuleInfo {
            module_name: module_name.to_string(),
            has_function,
            has_schema,
            complete: has_function && has_schema,
        }
    }

    /// Sorted union of names across both registries
    pub fn list_all_modules(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .functions
            .list_modules()
            .into_iter()
            .chain(self.schemas.list_modules())
            .collect();
        names.into_iter().collect()
    }

    pub fn validate_module(&self, module_name: &str) -> bool {
        self.module_info(module_name).complete
    }

    /// Raw schema for a module, if it has a provider and the provider succeeds
    pub fn module_schema(&self, module_name: &str) -> Option<schema::Result<ModuleSchema>> {
        self.schemas.get(module_name).map(|provider| provider.schema())
    }

    /// Parameter descriptors for a module; a missing or failing schema yields none
    pub fn describe_module(&self, module_name: &str) -> Vec<ParameterDescriptor> {
        match self.schemas.get(module_name) {
            Some(provider) => schema::describe_or_empty(module_name, provider.as_ref()),
            None => Vec::new(),
        }
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
