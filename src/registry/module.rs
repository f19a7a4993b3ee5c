// ABOUTME: The execution contract every task module implements
// ABOUTME: Async module trait plus an adapter that turns plain closures into modules

use async_trait::async_trait;

use crate::args::ParsedArgs;
use crate::engine::ModuleContext;

#[async_trait]
pub trait ModuleFunction: Send + Sync {
    /// Perform the module's effect. Output goes to `ctx`; failure is an error return.
    async fn execute(&self, args: &ParsedArgs, ctx: &mut ModuleContext) -> anyhow::Result<()>;
}

/// Wraps a synchronous closure as a module
pub struct FnModule<F> {
    func: F,
}

impl<F> FnModule<F>
where
    F: Fn(&ParsedArgs, &mut ModuleContext) -> anyhow::Result<()> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> ModuleFunction for FnModule<F>
where
    F: Fn(&ParsedArgs, &mut ModuleContext) -> anyhow::Result<()> + Send + Sync,
{
    async fn execute(&self, args: &ParsedArgs, ctx: &mut ModuleContext) -> anyhow::Result<()> {
        (self.func)(args, ctx)
    }
}
