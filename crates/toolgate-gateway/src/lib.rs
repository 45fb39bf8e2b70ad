//! Gateway façade for Toolgate.
//!
//! Exposes any [`ToolProvider`](toolgate_provider::ToolProvider) through
//! three stable operations, so an agent-facing transport only ever
//! registers `discover`, `describe`, and `execute`:
//!
//! ```text
//! transport ──▶ ToolGateway ──▶ MiddlewarePipeline ──▶ [CachingProvider] ──▶ provider
//!                 │
//!                 └─ every failure rendered as {success: false, error, ...}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let gateway = GatewayBuilder::new(Arc::new(tools))
//!     .config(GatewayConfig::from_toml_str(CONFIG)?)
//!     .validator(Arc::new(my_validator))
//!     .build()?;
//!
//! for op in gateway.registrations() {
//!     transport.register(op.name.clone(), op.input_schema.clone(), op);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod gateway;
pub mod registration;
pub mod response;

pub use builder::GatewayBuilder;
pub use config::{
    CacheSection, EventsSection, GatewayConfig, GatewaySection, LoggingSection,
    ValidationSection,
};
pub use gateway::ToolGateway;
pub use registration::{GatewayOperation, OperationHandler, DESCRIBE, DISCOVER, EXECUTE};
pub use response::GatewayResponse;
