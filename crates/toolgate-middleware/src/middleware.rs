//! The middleware contract.
//!
//! A [`Middleware`] receives the call plus a [`Next`] handle. It either
//! calls [`Next::run`] (optionally with different arguments or context) to
//! continue the chain, or returns its own result to short-circuit it.
//!
//! # Example
//!
//! ```rust,ignore
//! struct RequireScope(&'static str);
//!
//! impl Middleware for RequireScope {
//!     fn handle(&self, name: &str, args: &Arguments, ctx: &ExecutionContext, next: Next<'_>)
//!         -> Result<ExecutionResult>
//!     {
//!         if !ctx.has_scope(self.0) {
//!             return Ok(ExecutionResult::failure("Forbidden"));
//!         }
//!         next.run(name, args, ctx)
//!     }
//! }
//! ```

use std::sync::Arc;
use toolgate_core::{Arguments, ExecutionContext, ExecutionResult, Result};
use toolgate_provider::ToolProvider;

/// A composable wrapper around tool execution.
pub trait Middleware: Send + Sync {
    /// Handle one call. Call `next.run(..)` to continue the chain.
    fn handle(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
        next: Next<'_>,
    ) -> Result<ExecutionResult>;
}

impl<F> Middleware for F
where
    F: Fn(&str, &Arguments, &ExecutionContext, Next<'_>) -> Result<ExecutionResult> + Send + Sync,
{
    fn handle(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
        next: Next<'_>,
    ) -> Result<ExecutionResult> {
        self(name, args, context, next)
    }
}

/// The remainder of the chain, ending at the terminal provider.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    terminal: &'a dyn ToolProvider,
}

impl<'a> Next<'a> {
    /// Start a chain over `chain`, ending at `terminal`.
    ///
    /// `chain[0]` is the outermost layer: it runs first on the way in and
    /// last on the way out.
    pub fn new(chain: &'a [Arc<dyn Middleware>], terminal: &'a dyn ToolProvider) -> Self {
        Self { chain, terminal }
    }

    /// Invoke the next layer, or the terminal provider if none is left.
    pub fn run(
        self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        match self.chain.split_first() {
            Some((layer, rest)) => layer.handle(
                name,
                args,
                context,
                Next {
                    chain: rest,
                    terminal: self.terminal,
                },
            ),
            None => self.terminal.execute(name, args, context),
        }
    }

    /// Number of middleware layers still ahead.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }
}
