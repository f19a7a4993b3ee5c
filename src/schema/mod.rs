// ABOUTME: Parameter schema module: declarative rules, descriptors, and introspection
// ABOUTME: Defines the schema provider contract every task module implements

pub mod descriptor;
pub mod error;
pub mod introspect;
pub mod rule;

pub use descriptor::{ParameterDescriptor, ParameterKind};
pub use error::{Result, SchemaError};
pub use introspect::{describe, describe_or_empty, describe_schema};
pub use rule::{ArgumentRule, ModuleSchema, Nargs, RuleAction, ValueType};

/// Produces a module's declared parameter rules on demand. Must be idempotent.
pub trait SchemaProvider: Send + Sync {
    fn schema(&self) -> Result<ModuleSchema>;
}

impl<F> SchemaProvider for F
where
    F: Fn() -> Result<ModuleSchema> + Send + Sync,
{
    fn schema(&self) -> Result<ModuleSchema> {
        self()
    }
}

impl SchemaProvider for ModuleSchema {
    fn schema(&self) -> Result<ModuleSchema> {
        Ok(self.clone())
    }
}
