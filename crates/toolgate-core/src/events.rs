//! Execution lifecycle events.
//!
//! Emitted by the event middleware through an [`EventDispatcher`]. Post
//! events carry both the start and end timestamp so consumers can derive
//! the duration without measuring it themselves.

use crate::context::ExecutionContext;
use crate::handler::Arguments;
use crate::result::ExecutionResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tool execution is about to run.
#[derive(Clone, Debug, Serialize)]
pub struct ToolExecutionStarted {
    /// Requested tool name.
    pub tool_name: String,
    /// Arguments as received by the middleware.
    pub arguments: Arguments,
    /// Context as received by the middleware.
    pub context: ExecutionContext,
    /// When the execution started.
    pub timestamp: DateTime<Utc>,
}

/// A tool execution returned a successful result.
#[derive(Clone, Debug, Serialize)]
pub struct ToolExecutionSucceeded {
    /// Requested tool name.
    pub tool_name: String,
    /// Arguments as received by the middleware.
    pub arguments: Arguments,
    /// The successful result.
    pub result: ExecutionResult,
    /// Context as received by the middleware.
    pub context: ExecutionContext,
    /// When the execution started.
    pub start_time: DateTime<Utc>,
    /// When the execution finished.
    pub end_time: DateTime<Utc>,
}

/// Details of a raised failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureInfo {
    /// Stable failure kind (see [`crate::Error::kind`]).
    pub kind: String,
    /// Failure message.
    pub message: String,
}

impl FailureInfo {
    /// Capture kind and message of an error.
    pub fn from_error(err: &crate::Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// A tool execution failed, either by returning an unsuccessful result or
/// by raising.
#[derive(Clone, Debug, Serialize)]
pub struct ToolExecutionFailed {
    /// Requested tool name.
    pub tool_name: String,
    /// Arguments as received by the middleware.
    pub arguments: Arguments,
    /// Failure message.
    pub error: String,
    /// Context as received by the middleware.
    pub context: ExecutionContext,
    /// When the execution started.
    pub start_time: DateTime<Utc>,
    /// When the execution finished.
    pub end_time: DateTime<Utc>,
    /// Present only when the execution raised.
    pub exception: Option<FailureInfo>,
}

/// Any execution lifecycle event.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ToolEvent {
    /// See [`ToolExecutionStarted`].
    Started(ToolExecutionStarted),
    /// See [`ToolExecutionSucceeded`].
    Succeeded(ToolExecutionSucceeded),
    /// See [`ToolExecutionFailed`].
    Failed(ToolExecutionFailed),
}

impl ToolEvent {
    /// The tool the event is about.
    pub fn tool_name(&self) -> &str {
        match self {
            Self::Started(e) => &e.tool_name,
            Self::Succeeded(e) => &e.tool_name,
            Self::Failed(e) => &e.tool_name,
        }
    }

    /// Elapsed time for post-execution events.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match self {
            Self::Started(_) => None,
            Self::Succeeded(e) => Some(e.end_time - e.start_time),
            Self::Failed(e) => Some(e.end_time - e.start_time),
        }
    }
}

/// Receives lifecycle events. Fire-and-forget from the pipeline's view.
pub trait EventDispatcher: Send + Sync {
    /// Deliver one event.
    fn dispatch(&self, event: &ToolEvent);
}

impl<F> EventDispatcher for F
where
    F: Fn(&ToolEvent) + Send + Sync,
{
    fn dispatch(&self, event: &ToolEvent) {
        self(event)
    }
}

// ============================================================================
// Tests
// ============================================================================
