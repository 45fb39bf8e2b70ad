//! Lifecycle event emission.

use crate::middleware::{Middleware, Next};
use chrono::Utc;
use std::sync::Arc;
use toolgate_core::{
    Arguments, EventDispatcher, ExecutionContext, ExecutionResult, FailureInfo, Result, ToolEvent,
    ToolExecutionFailed, ToolExecutionStarted, ToolExecutionSucceeded,
};

/// Emits a started event, then exactly one succeeded or failed event.
pub struct EventMiddleware {
    dispatcher: Arc<dyn EventDispatcher>,
}

impl EventMiddleware {
    /// Emit through `dispatcher`.
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl Middleware for EventMiddleware {
    fn handle(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
        next: Next<'_>,
    ) -> Result<ExecutionResult> {
        let start_time = Utc::now();
        self.dispatcher
            .dispatch(&ToolEvent::Started(ToolExecutionStarted {
                tool_name: name.to_string(),
                arguments: args.clone(),
                context: context.clone(),
                timestamp: start_time,
            }));

        let outcome = next.run(name, args, context);
        let end_time = Utc::now();

        let event = match &outcome {
            Ok(result) if result.is_success() => ToolEvent::Succeeded(ToolExecutionSucceeded {
                tool_name: name.to_string(),
                arguments: args.clone(),
                result: result.clone(),
                context: context.clone(),
                start_time,
                end_time,
            }),
            Ok(result) => ToolEvent::Failed(ToolExecutionFailed {
                tool_name: name.to_string(),
                arguments: args.clone(),
                error: result.message().to_string(),
                context: context.clone(),
                start_time,
                end_time,
                exception: None,
            }),
            Err(err) => ToolEvent::Failed(ToolExecutionFailed {
                tool_name: name.to_string(),
                arguments: args.clone(),
                error: err.to_string(),
                context: context.clone(),
                start_time,
                end_time,
                exception: Some(FailureInfo::from_error(err)),
            }),
        };
        self.dispatcher.dispatch(&event);
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
