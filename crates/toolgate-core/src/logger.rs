//! Leveled logger contract used by the logging middleware.

use serde_json::{Map, Value};

/// Tracing target used by [`TracingLogger`].
pub const EXECUTION_TARGET: &str = "toolgate::execution";

/// Leveled, structured logger.
pub trait ToolLogger: Send + Sync {
    /// Informational record.
    fn info(&self, message: &str, context: &Map<String, Value>);
    /// Something went wrong but the call completed.
    fn warning(&self, message: &str, context: &Map<String, Value>);
    /// The call failed.
    fn error(&self, message: &str, context: &Map<String, Value>);
}

/// Forwards records to `tracing` under [`EXECUTION_TARGET`].
///
/// The context map is attached as a single `context` field rendered as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl ToolLogger for TracingLogger {
    fn info(&self, message: &str, context: &Map<String, Value>) {
        let context = Value::Object(context.clone());
        tracing::info!(target: EXECUTION_TARGET, context = %context, "{message}");
    }

    fn warning(&self, message: &str, context: &Map<String, Value>) {
        let context = Value::Object(context.clone());
        tracing::warn!(target: EXECUTION_TARGET, context = %context, "{message}");
    }

    fn error(&self, message: &str, context: &Map<String, Value>) {
        let context = Value::Object(context.clone());
        tracing::error!(target: EXECUTION_TARGET, context = %context, "{message}");
    }
}
