//! External result shape returned by every gateway operation.

use serde::Serialize;
use serde_json::{Map, Value};
use toolgate_core::{Error, ExecutionResult, Result};

/// A JSON object payload plus the transport-level error flag.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GatewayResponse {
    /// The payload handed to the transport.
    pub content: Map<String, Value>,
    /// Whether the transport should flag the payload as an error.
    pub is_error: bool,
}

impl GatewayResponse {
    /// A successful payload. `success: true` is added.
    pub fn ok(mut content: Map<String, Value>) -> Self {
        content.insert("success".into(), Value::Bool(true));
        Self {
            content,
            is_error: false,
        }
    }

    /// `{success: false, error}` flagged as an error.
    pub fn failure(error: impl Into<String>) -> Self {
        let mut content = Map::new();
        content.insert("success".into(), Value::Bool(false));
        content.insert("error".into(), Value::String(error.into()));
        Self {
            content,
            is_error: true,
        }
    }

    /// `{success: false, error: "Unknown tool: {name}"}`.
    pub fn unknown_tool(name: &str) -> Self {
        Self::failure(Error::not_found(name).to_string())
    }

    /// Render an execution result: its flattened map, with `is_error`
    /// taken from the result.
    pub fn from_result(result: &ExecutionResult) -> Self {
        Self {
            content: result.to_flat_map(),
            is_error: result.is_error(),
        }
    }

    /// Translate a raised failure from an execute call on `tool`.
    ///
    /// A not-found failure always names `tool`, even when a nested
    /// provider reported a different name.
    ///
    /// Context data of an execution failure is merged in, but never
    /// replaces `success`, `error`, or `tool`.
    pub fn from_error(tool: &str, err: &Error) -> Self {
        match err {
            Error::ToolNotFound { .. } => Self::unknown_tool(tool),
            Error::ExecutionFailed {
                message, context, ..
            } => {
                let mut response = Self::failure(message.clone());
                response
                    .content
                    .insert("tool".into(), Value::String(tool.to_string()));
                for (key, value) in context {
                    response
                        .content
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
                response
            }
            other => {
                let mut response = Self::failure(format!("Tool execution failed: {other}"));
                response
                    .content
                    .insert("tool".into(), Value::String(tool.to_string()));
                response
            }
        }
    }

    /// Whether the payload reports success.
    pub fn success(&self) -> bool {
        self.content
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Look up one payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.content.get(key)
    }

    /// The payload as the transport's text content.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.content)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
