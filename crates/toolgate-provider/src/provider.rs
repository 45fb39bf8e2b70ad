//! The provider capability contract.
//!
//! Registries, composites, caches, and pipelines all expose their tools
//! through [`ToolProvider`], so they can be stacked in any order.
//!
//! # Example
//!
//! ```rust,ignore
//! struct MyTools { /* ... */ }
//!
//! impl ToolProvider for MyTools {
//!     fn list_tools(&self) -> Result<ToolMap> {
//!         Ok(ToolMap::from([("ping".into(), ToolDescriptor::new("ping"))]))
//!     }
//!
//!     fn execute(&self, name: &str, _args: &Arguments, _ctx: &ExecutionContext)
//!         -> Result<ExecutionResult>
//!     {
//!         match name {
//!             "ping" => Ok(ExecutionResult::ok("pong")),
//!             _ => Err(Error::not_found(name)),
//!         }
//!     }
//! }
//! ```

use std::sync::Arc;
use toolgate_core::{
    Arguments, ExecutionContext, ExecutionResult, Result, ToolDescriptor, ToolMap,
};

/// List, look up, and execute tools.
///
/// `execute` fails with [`toolgate_core::Error::ToolNotFound`] for an
/// unknown name and with [`toolgate_core::Error::ExecutionFailed`] when a
/// handler fails. No other failure kind originates from a handler.
pub trait ToolProvider: Send + Sync {
    /// Short name used to derive a namespace key when this provider is
    /// added to a composite without an explicit key.
    fn name(&self) -> &str {
        "provider"
    }

    /// All tools exposed by this provider, keyed by name.
    fn list_tools(&self) -> Result<ToolMap>;

    /// Look up one tool.
    fn get_tool(&self, name: &str) -> Result<Option<ToolDescriptor>> {
        Ok(self.list_tools()?.remove(name))
    }

    /// Execute a tool by name.
    fn execute(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult>;

    /// Returns the number of exposed tools.
    fn tool_count(&self) -> Result<usize> {
        Ok(self.list_tools()?.len())
    }

    /// Check if a tool exists by name.
    fn has_tool(&self, name: &str) -> Result<bool> {
        Ok(self.get_tool(name)?.is_some())
    }
}

impl<P: ToolProvider + ?Sized> ToolProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_tools(&self) -> Result<ToolMap> {
        (**self).list_tools()
    }

    fn get_tool(&self, name: &str) -> Result<Option<ToolDescriptor>> {
        (**self).get_tool(name)
    }

    fn execute(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        (**self).execute(name, args, context)
    }

    fn tool_count(&self) -> Result<usize> {
        (**self).tool_count()
    }

    fn has_tool(&self, name: &str) -> Result<bool> {
        (**self).has_tool(name)
    }
}

// ============================================================================
// Tests
// ============================================================================
