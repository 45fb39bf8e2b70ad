//! Middleware pipeline over one terminal provider.

use crate::middleware::{Middleware, Next};
use parking_lot::RwLock;
use std::sync::Arc;
use toolgate_core::{
    Arguments, ExecutionContext, ExecutionResult, Result, ToolDescriptor, ToolMap,
};
use toolgate_provider::ToolProvider;

/// Runs an ordered list of [`Middleware`] around a provider's `execute`.
///
/// The first middleware added is the outermost layer. For `[A, B]` the
/// observed order is `A.before, B.before, terminal, B.after, A.after`.
///
/// Discovery (`list_tools`, `get_tool`) is not intercepted; only
/// execution runs through the chain.
pub struct MiddlewarePipeline {
    provider: Arc<dyn ToolProvider>,
    middleware: RwLock<Arc<[Arc<dyn Middleware>]>>,
}

impl MiddlewarePipeline {
    /// Create an empty pipeline over `provider`.
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider,
            middleware: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Append a middleware as the new innermost layer.
    pub fn add<M>(&self, middleware: M) -> &Self
    where
        M: Middleware + 'static,
    {
        self.add_arc(Arc::new(middleware))
    }

    /// Append an already shared middleware.
    pub fn add_arc(&self, middleware: Arc<dyn Middleware>) -> &Self {
        let mut guard = self.middleware.write();
        let mut list: Vec<Arc<dyn Middleware>> = guard.iter().cloned().collect();
        list.push(middleware);
        *guard = Arc::from(list);
        self
    }

    /// Number of middleware layers.
    pub fn count(&self) -> usize {
        self.middleware.read().len()
    }

    /// Remove every middleware layer.
    pub fn clear(&self) {
        *self.middleware.write() = Arc::from(Vec::new());
    }

    /// The terminal provider.
    pub fn provider(&self) -> &Arc<dyn ToolProvider> {
        &self.provider
    }

    /// Run `name` through the chain.
    ///
    /// A default context is created when `context` is `None`. The chain is
    /// snapshotted at call time, so a concurrent `add` or `clear` does not
    /// affect calls already in flight.
    pub fn dispatch(
        &self,
        name: &str,
        args: &Arguments,
        context: Option<&ExecutionContext>,
    ) -> Result<ExecutionResult> {
        let chain = Arc::clone(&*self.middleware.read());
        let default_context;
        let context = match context {
            Some(ctx) => ctx,
            None => {
                default_context = ExecutionContext::new();
                &default_context
            }
        };
        tracing::trace!(tool = %name, layers = chain.len(), "dispatching through pipeline");
        Next::new(&chain, self.provider.as_ref()).run(name, args, context)
    }
}

impl ToolProvider for MiddlewarePipeline {
    fn name(&self) -> &str {
        "pipeline"
    }

    fn list_tools(&self) -> Result<ToolMap> {
        self.provider.list_tools()
    }

    fn get_tool(&self, name: &str) -> Result<Option<ToolDescriptor>> {
        self.provider.get_tool(name)
    }

    fn execute(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        self.dispatch(name, args, Some(context))
    }
}

impl std::fmt::Debug for MiddlewarePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewarePipeline")
            .field("provider", &self.provider.name())
            .field("middleware", &self.count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
