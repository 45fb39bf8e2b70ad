//! Execution logging.

use crate::middleware::{Middleware, Next};
use crate::sanitize::sanitize_arguments;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use toolgate_core::{
    Arguments, ExecutionContext, ExecutionResult, Result, ToolLogger, TracingLogger,
};

/// Logs the start and outcome of every execution through a [`ToolLogger`].
///
/// Failures are logged and re-raised unchanged; this layer never recovers.
pub struct LoggingMiddleware {
    logger: Arc<dyn ToolLogger>,
    log_arguments: bool,
}

impl LoggingMiddleware {
    /// Log through `logger`, without arguments.
    pub fn new(logger: Arc<dyn ToolLogger>) -> Self {
        Self {
            logger,
            log_arguments: false,
        }
    }

    /// Include sanitized arguments in the start record.
    pub fn log_arguments(mut self, enabled: bool) -> Self {
        self.log_arguments = enabled;
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(Arc::new(TracingLogger))
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    let ms = start.elapsed().as_secs_f64() * 1000.0;
    (ms * 100.0).round() / 100.0
}

impl Middleware for LoggingMiddleware {
    fn handle(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
        next: Next<'_>,
    ) -> Result<ExecutionResult> {
        let request_id = context.request_id_or_unknown();

        let mut start = Map::new();
        start.insert("tool".to_string(), json!(name));
        start.insert("request_id".to_string(), json!(request_id));
        if self.log_arguments {
            start.insert(
                "arguments".to_string(),
                Value::Object(sanitize_arguments(args)),
            );
        }
        self.logger.info("Tool execution started", &start);

        let started = Instant::now();
        let outcome = next.run(name, args, context);

        let mut done = Map::new();
        done.insert("tool".to_string(), json!(name));
        done.insert("request_id".to_string(), json!(request_id));
        done.insert("duration_ms".to_string(), json!(elapsed_ms(started)));

        match &outcome {
            Ok(result) => {
                done.insert("success".to_string(), json!(result.is_success()));
                if result.is_success() {
                    self.logger.info("Tool execution completed", &done);
                } else {
                    done.insert("error".to_string(), json!(result.message()));
                    self.logger.warning("Tool execution returned failure", &done);
                }
            }
            Err(err) => {
                done.insert("error".to_string(), json!(err.to_string()));
                done.insert("error_class".to_string(), json!(err.kind()));
                self.logger.error("Tool execution failed", &done);
            }
        }
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
