//! Tool providers for Toolgate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    toolgate-provider                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ToolProvider trait — list / get / execute                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BasicProvider — in-memory name → (descriptor, handler)     │
//! │  CompositeProvider — namespaced merge of N providers        │
//! │  CachingProvider — discovery + read-only result caching     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every provider satisfies the same contract, so they layer in any order:
//!
//! ```rust,ignore
//! let composite = CompositeProvider::new();
//! composite
//!     .add_provider("math", Arc::new(math_tools))?
//!     .add_provider("search", Arc::new(search_tools))?;
//!
//! let cached = CachingProvider::new(Arc::new(composite), store);
//! ```

pub mod basic;
pub mod cache_key;
pub mod caching;
pub mod composite;
pub mod provider;

// Re-exports — contract
pub use provider::ToolProvider;

// Re-exports — providers
pub use basic::BasicProvider;
pub use caching::{CacheOptions, CachingProvider, MAX_TTL};
pub use composite::{CompositeProvider, NAMESPACE_SEPARATOR};
