// ABOUTME: Built-in modules shipped with the tool
// ABOUTME: Each module supplies both an execution callable and a parameter schema

pub mod calculator;
pub mod demo;

pub use calculator::Calculator;
pub use demo::Demo;

use crate::registry::ModuleRegistry;

/// Register every built-in module under its canonical name
pub fn register_builtins(registry: &mut ModuleRegistry) {
    registry.register_module(calculator::MODULE_NAME, Calculator);
    registry.register_module(demo::MODULE_NAME, Demo);
}
