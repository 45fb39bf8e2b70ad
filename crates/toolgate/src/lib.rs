//! Toolgate dynamic tool-dispatch gateway — umbrella crate.
//!
//! This crate re-exports all Toolgate components for convenience.
//! Use feature flags to enable specific functionality.

#![doc = include_str!("../README.md")]

pub use toolgate_core as core;
pub use toolgate_provider as provider;

#[cfg(feature = "middleware")]
pub use toolgate_middleware as middleware;

#[cfg(feature = "gateway")]
pub use toolgate_gateway as gateway;
