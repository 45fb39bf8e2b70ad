//! Handler signature and return-value normalization.
//!
//! Handlers are plain closures `(arguments, context) -> Result<O, HandlerError>`
//! where `O` is anything convertible into [`ToolOutput`]. The provider that
//! owns the handler normalizes the output into an [`ExecutionResult`] exactly
//! once; layers above it only ever see canonical results.

use crate::context::ExecutionContext;
use crate::error::Error;
use crate::result::ExecutionResult;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Tool arguments: a JSON object.
pub type Arguments = Map<String, Value>;

/// Boxed handler closure stored by providers.
pub type Handler =
    Arc<dyn Fn(&Arguments, &ExecutionContext) -> Result<ToolOutput, HandlerError> + Send + Sync>;

/// Wrap a closure into a [`Handler`], erasing its output type.
///
/// ```rust
/// use toolgate_core::{handler, ExecutionContext, HandlerError};
/// use serde_json::Map;
///
/// let h = handler(|_args, _ctx| Ok::<_, HandlerError>("pong"));
/// let out = h(&Map::new(), &ExecutionContext::new()).unwrap().into_result();
/// assert_eq!(out.message(), "pong");
/// ```
pub fn handler<F, O>(f: F) -> Handler
where
    F: Fn(&Arguments, &ExecutionContext) -> Result<O, HandlerError> + Send + Sync + 'static,
    O: Into<ToolOutput>,
{
    Arc::new(move |args, ctx| f(args, ctx).map(Into::into))
}

// ============================================================================
// ToolOutput
// ============================================================================

/// The raw shapes a handler may return.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolOutput {
    /// Already canonical; passes through unchanged.
    Result(ExecutionResult),
    /// `{success?: bool = true, message?: string, ...rest}`; `rest` becomes data.
    Map(Map<String, Value>),
    /// Success message with empty data.
    Text(String),
    /// Anything else; wrapped as `success("OK", {result: value})`.
    Value(Value),
}

impl ToolOutput {
    /// Normalize into the canonical result.
    pub fn into_result(self) -> ExecutionResult {
        match self {
            Self::Result(result) => result,
            Self::Text(text) => ExecutionResult::ok(text),
            Self::Map(mut map) => {
                let success = map
                    .remove("success")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(true);
                let message = match map.remove("message") {
                    Some(Value::String(s)) => s,
                    Some(Value::Null) | None if success => "OK".to_string(),
                    Some(Value::Null) | None => "Tool reported failure".to_string(),
                    Some(other) => other.to_string(),
                };
                if success {
                    ExecutionResult::success(message, map)
                } else {
                    ExecutionResult::error(message, map)
                }
            }
            Self::Value(value) => {
                let mut data = Map::new();
                data.insert("result".into(), value);
                ExecutionResult::success("OK", data)
            }
        }
    }
}

impl From<ExecutionResult> for ToolOutput {
    fn from(value: ExecutionResult) -> Self {
        Self::Result(value)
    }
}

impl From<Map<String, Value>> for ToolOutput {
    fn from(value: Map<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(map),
            Value::String(text) => Self::Text(text),
            other => Self::Value(other),
        }
    }
}

macro_rules! scalar_output {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ToolOutput {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

scalar_output!(bool, i32, i64, u32, u64, f64);

// ============================================================================
// HandlerError
// ============================================================================

/// Failure raised by a handler.
///
/// Any `std::error::Error` converts into a `HandlerError` via `?`, recording
/// its message and Rust type name. Use [`HandlerError::execution`] to raise
/// the execution-failure kind directly with caller-chosen context data.
///
/// Deliberately does not implement `std::error::Error`, which is what makes
/// the blanket `From` conversion possible.
pub struct HandlerError {
    message: String,
    kind: String,
    code: Option<Value>,
    context: Map<String, Value>,
    direct: bool,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerError {
    /// Raise the execution-failure kind directly. Context data is kept as-is.
    pub fn execution(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: String::new(),
            code: None,
            context: Map::new(),
            direct: true,
            source: None,
        }
    }

    /// An ad-hoc failure with a message and no underlying error type.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: "message".to_string(),
            code: None,
            context: Map::new(),
            direct: false,
            source: None,
        }
    }

    /// Attach a failure code.
    pub fn with_code(mut self, code: impl Into<Value>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Type name of the underlying error (empty for direct execution failures).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Failure code, if any.
    pub fn code(&self) -> Option<&Value> {
        self.code.as_ref()
    }

    /// The wrapped error, if this was converted from one.
    pub fn source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Convert into an [`Error::ExecutionFailed`] for `tool`.
    ///
    /// Direct execution failures keep their context verbatim. Every other
    /// failure gets `error_class` and `error_code` added to its context.
    pub fn into_error(self, tool: &str) -> Error {
        let mut context = self.context;
        if !self.direct {
            context.insert("error_class".into(), Value::String(self.kind));
            context.insert("error_code".into(), self.code.unwrap_or(Value::Null));
        } else if let Some(code) = self.code {
            context.entry("error_code").or_insert(code);
        }
        Error::ExecutionFailed {
            tool: tool.to_string(),
            message: self.message,
            context,
        }
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        let kind = std::any::type_name::<E>().to_string();
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        match boxed.downcast::<Error>() {
            Ok(inner) => match *inner {
                Error::ExecutionFailed {
                    message, context, ..
                } => Self {
                    message,
                    kind: String::new(),
                    code: None,
                    context,
                    direct: true,
                    source: None,
                },
                other => Self {
                    message: other.to_string(),
                    kind: other.kind().to_string(),
                    code: None,
                    context: Map::new(),
                    direct: false,
                    source: Some(Box::new(other)),
                },
            },
            Err(boxed) => Self {
                message: boxed.to_string(),
                kind,
                code: None,
                context: Map::new(),
                direct: false,
                source: Some(boxed),
            },
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("code", &self.code)
            .field("direct", &self.direct)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
