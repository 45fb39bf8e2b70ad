//! Execution outcome value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one tool execution.
///
/// Build it through [`ExecutionResult::success`] or
/// [`ExecutionResult::error`] so that `is_error == !success` holds for
/// everything produced inside the dispatch layer. Only the rendering step
/// at the gateway may decouple the two via [`ExecutionResult::with_is_error`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    success: bool,
    message: String,
    #[serde(default)]
    data: Map<String, Value>,
    is_error: bool,
}

impl ExecutionResult {
    /// A successful outcome.
    pub fn success(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            is_error: false,
        }
    }

    /// A successful outcome with no data.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::success(message, Map::new())
    }

    /// A failed outcome carrying context data.
    pub fn error(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
            is_error: true,
        }
    }

    /// A failed outcome with no data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::error(message, Map::new())
    }

    /// Override the transport-level error flag.
    pub fn with_is_error(mut self, is_error: bool) -> Self {
        self.is_error = is_error;
        self
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Whether the transport should flag the payload as an error.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured data.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Look up one data entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Consume the result, returning its data.
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    /// Flatten into `{success, message, ...data}`.
    ///
    /// `success` and `message` are written last so data keys can never
    /// shadow them.
    pub fn to_flat_map(&self) -> Map<String, Value> {
        let mut out = self.data.clone();
        out.insert("success".into(), Value::Bool(self.success));
        out.insert("message".into(), Value::String(self.message.clone()));
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
