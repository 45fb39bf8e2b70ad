//! Toolgate Core — value types, collaborator contracts, and errors.
//!
//! This crate provides the foundational types used across all Toolgate
//! crates. It has no internal Toolgate dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`descriptor`]: Tool descriptors and behavioural hints
//! - [`context`]: Immutable request-scoped execution context
//! - [`result`]: Canonical execution outcome
//! - [`handler`]: Handler signature and return-value normalization
//! - [`error`]: Error types and Result alias
//! - [`validator`], [`logger`], [`events`], [`cache`]: contracts for the
//!   external collaborators (schema validation, logging, event bus, cache store)

pub mod cache;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod handler;
pub mod logger;
pub mod result;
pub mod validator;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};

pub use cache::{CacheStore, InMemoryCacheStore, PRUNE_THRESHOLD};
pub use context::{ExecutionContext, RequestId};
pub use descriptor::{
    ToolAnnotations, ToolDescriptor, ToolMap, META_ORIGINAL_NAME, META_SOURCE_PROVIDER,
};
pub use events::{
    EventDispatcher, FailureInfo, ToolEvent, ToolExecutionFailed, ToolExecutionStarted,
    ToolExecutionSucceeded,
};
pub use handler::{handler, Arguments, Handler, HandlerError, ToolOutput};
pub use logger::{ToolLogger, TracingLogger};
pub use result::ExecutionResult;
pub use validator::{SchemaValidator, ValidationIssue, ValidationOutcome};
