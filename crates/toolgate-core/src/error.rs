//! Error types for the Toolgate dispatch layer.
//!
//! Only [`Error::ToolNotFound`] and [`Error::ExecutionFailed`] are expected
//! to cross a provider boundary. Everything a handler raises is re-wrapped
//! into `ExecutionFailed` before it leaves the provider that owns it.

use serde_json::{Map, Value};

/// Errors raised by providers, middleware, and the gateway.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No registered handler for the requested name anywhere in the chain.
    #[error("Unknown tool: {name}")]
    ToolNotFound {
        /// The name that was requested
        name: String,
    },

    /// A handler ran and failed.
    #[error("{message}")]
    ExecutionFailed {
        /// Name of the tool whose handler failed
        tool: String,
        /// Human-readable failure message
        message: String,
        /// Structured context attached by the handler or the provider
        context: Map<String, Value>,
    },

    /// A collaborator or configuration value is unusable.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What configuration is problematic
        message: String,
    },

    /// The cache store failed to read, write, or delete an entry.
    #[error("Cache error: {message}")]
    Cache {
        /// What went wrong
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (config file loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type alias for Toolgate operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a tool-not-found error.
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Error::ToolNotFound { name: name.into() }
    }

    /// Creates an execution failure with no context data.
    pub fn execution<T, M>(tool: T, message: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Error::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
            context: Map::new(),
        }
    }

    /// Creates an execution failure carrying structured context data.
    pub fn execution_with_context<T, M>(tool: T, message: M, context: Map<String, Value>) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Error::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
            context,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new cache store error.
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Error::Cache {
            message: message.into(),
        }
    }

    /// Stable snake_case identifier for the failure kind.
    ///
    /// Used as the failure "class" in events and log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ToolNotFound { .. } => "tool_not_found",
            Error::ExecutionFailed { .. } => "execution_failed",
            Error::Configuration { .. } => "configuration",
            Error::Cache { .. } => "cache",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }

    /// Returns `true` for [`Error::ToolNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ToolNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
