//! In-memory tool registry.
//!
//! [`BasicProvider`] maps names to `(descriptor, handler)` pairs. It is the
//! only place where handler return values are normalized and where raw
//! handler failures (panics included) are re-wrapped into
//! [`Error::ExecutionFailed`](toolgate_core::Error::ExecutionFailed).
//!
//! # Example
//!
//! ```rust
//! use toolgate_core::{ExecutionContext, HandlerError, ToolDescriptor};
//! use toolgate_provider::{BasicProvider, ToolProvider};
//! use serde_json::json;
//!
//! let provider = BasicProvider::named("math");
//! provider.register(ToolDescriptor::new("add").read_only(true), |args, _ctx| {
//!     let a = args.get("a").and_then(|v| v.as_i64()).unwrap_or(0);
//!     let b = args.get("b").and_then(|v| v.as_i64()).unwrap_or(0);
//!     Ok::<_, HandlerError>(json!({ "message": format!("Result: {}", a + b), "result": a + b }))
//! });
//!
//! let args = json!({"a": 2, "b": 3}).as_object().cloned().unwrap_or_default();
//! let result = provider.execute("add", &args, &ExecutionContext::new()).unwrap();
//! assert_eq!(result.message(), "Result: 5");
//! ```

use crate::provider::ToolProvider;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use toolgate_core::{
    handler, Arguments, Error, ExecutionContext, ExecutionResult, Handler, HandlerError, Result,
    ToolDescriptor, ToolMap, ToolOutput,
};

struct Registration {
    descriptor: ToolDescriptor,
    handler: Handler,
}

/// In-memory name → (descriptor, handler) registry.
///
/// Registration is expected during setup. Concurrent `execute` calls
/// against a stable registry only take the read lock.
pub struct BasicProvider {
    name: String,
    entries: RwLock<BTreeMap<String, Registration>>,
}

impl std::fmt::Debug for BasicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicProvider")
            .field("name", &self.name)
            .field("tools", &self.entries.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BasicProvider {
    /// Create an empty provider named `"basic"`.
    pub fn new() -> Self {
        Self::named("basic")
    }

    /// Create an empty provider with a custom name.
    ///
    /// The name becomes the namespace key when this provider is added to a
    /// composite without an explicit key.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a tool, replacing both descriptor and handler if the name is
    /// already taken. Returns `self` for chaining.
    pub fn register<F, O>(&self, descriptor: ToolDescriptor, f: F) -> &Self
    where
        F: Fn(&Arguments, &ExecutionContext) -> std::result::Result<O, HandlerError>
            + Send
            + Sync
            + 'static,
        O: Into<ToolOutput>,
    {
        self.register_handler(descriptor, handler(f))
    }

    /// Register an already boxed [`Handler`].
    pub fn register_handler(&self, descriptor: ToolDescriptor, handler: Handler) -> &Self {
        let name = descriptor.name().to_string();
        let replaced = self
            .entries
            .write()
            .insert(
                name.clone(),
                Registration {
                    descriptor,
                    handler,
                },
            )
            .is_some();
        if replaced {
            tracing::debug!(provider = %self.name, tool = %name, "Replaced tool registration");
        }
        self
    }

    /// Replace the handler of an already registered tool, keeping its
    /// descriptor.
    pub fn set_handler<F, O>(&self, name: &str, f: F) -> Result<&Self>
    where
        F: Fn(&Arguments, &ExecutionContext) -> std::result::Result<O, HandlerError>
            + Send
            + Sync
            + 'static,
        O: Into<ToolOutput>,
    {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(name).ok_or_else(|| Error::not_found(name))?;
        entry.handler = handler(f);
        drop(entries);
        Ok(self)
    }

    /// Remove a tool. Returns `true` if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }
}

impl Default for BasicProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolProvider for BasicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tools(&self) -> Result<ToolMap> {
        Ok(self
            .entries
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.descriptor.clone()))
            .collect())
    }

    fn get_tool(&self, name: &str) -> Result<Option<ToolDescriptor>> {
        Ok(self
            .entries
            .read()
            .get(name)
            .map(|entry| entry.descriptor.clone()))
    }

    fn execute(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        // Clone the handler out so the lock is not held while it runs.
        let handler = self
            .entries
            .read()
            .get(name)
            .map(|entry| entry.handler.clone())
            .ok_or_else(|| Error::not_found(name))?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(args, context)))
            .map_err(|payload| panicked(name, payload.as_ref()))?;

        match outcome {
            Ok(output) => Ok(output.into_result()),
            Err(err) => {
                tracing::debug!(tool = %name, error = %err, kind = err.kind(), "Handler failed");
                Err(err.into_error(name))
            }
        }
    }

    fn tool_count(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    fn has_tool(&self, name: &str) -> Result<bool> {
        Ok(self.entries.read().contains_key(name))
    }
}

/// Convert a handler panic payload into an execution failure.
fn panicked(tool: &str, payload: &(dyn Any + Send)) -> Error {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(tool = %tool, error = %message, "Handler panicked");

    let mut context = Map::new();
    context.insert("error_class".into(), Value::String("panic".into()));
    context.insert("error_code".into(), Value::Null);
    Error::execution_with_context(tool, message, context)
}

// ============================================================================
// Tests
// ============================================================================
