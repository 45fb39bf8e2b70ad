//! Middleware pipeline for Toolgate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MiddlewarePipeline                       │
//! │                                                             │
//! │   LoggingMiddleware ─▶ EventMiddleware ─▶ Validating ─▶ ┐   │
//! │          ▲                   ▲                 ▲         │   │
//! │          └───────────────────┴─────────────────┴── ToolProvider
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first middleware added is the outermost layer. Each layer either
//! calls [`Next::run`] or returns its own result to short-circuit.
//!
//! ```rust,ignore
//! let pipeline = MiddlewarePipeline::new(provider.clone());
//! pipeline
//!     .add(LoggingMiddleware::default())
//!     .add(ValidatingMiddleware::new(provider, validator));
//!
//! let result = pipeline.dispatch("add", &args, None)?;
//! ```

pub mod event;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod sanitize;
pub mod validating;

// Re-exports — contract
pub use middleware::{Middleware, Next};
pub use pipeline::MiddlewarePipeline;

// Re-exports — built-in middleware
pub use event::EventMiddleware;
pub use logging::LoggingMiddleware;
pub use sanitize::{sanitize_arguments, REDACTED};
pub use validating::{ValidatingMiddleware, VALIDATION_ERRORS_KEY};
