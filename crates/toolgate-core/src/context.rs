//! Request-scoped execution context.
//!
//! An [`ExecutionContext`] is created once per inbound request and threaded
//! through every middleware layer and provider. It is never mutated in
//! place: every `with_*` method returns a new context, so an attribute added
//! by one layer is only visible to the calls it passes that copy to.
//!
//! # Usage
//!
//! ```rust
//! use toolgate_core::ExecutionContext;
//!
//! let base = ExecutionContext::new().with_user_id("alice");
//! let scoped = base.with_scope("tools:write");
//!
//! assert!(scoped.has_scope("tools:write"));
//! assert!(!base.has_scope("tools:write"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Request identifier supplied by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request id (JSON-RPC style).
    Number(i64),
    /// Opaque string request id.
    Text(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Immutable identity, authorization, and trace data for one call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default)]
    scopes: Vec<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl ExecutionContext {
    /// Create an empty context with no identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context carrying a freshly generated (uuid v4) request id.
    pub fn for_request() -> Self {
        Self::new().with_request_id(uuid::Uuid::new_v4().to_string())
    }

    /// The request id, if the transport supplied one.
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// The calling user, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Granted scopes in the order they were added.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// All attributes.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Look up one attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns `true` if `scope` has been granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Returns a copy with `key` set to `value`.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.attributes.insert(key.into(), value.into());
        next
    }

    /// Returns a copy with the given request id.
    pub fn with_request_id(&self, request_id: impl Into<RequestId>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            ..self.clone()
        }
    }

    /// Returns a copy with the given user id.
    pub fn with_user_id(&self, user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..self.clone()
        }
    }

    /// Returns a copy with `scope` granted. Granting twice is a no-op.
    pub fn with_scope(&self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        let mut next = self.clone();
        if !next.has_scope(&scope) {
            next.scopes.push(scope);
        }
        next
    }

    /// Returns a copy with every scope in `scopes` granted.
    pub fn with_scopes<I, S>(&self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        scopes
            .into_iter()
            .fold(self.clone(), |ctx, scope| ctx.with_scope(scope))
    }

    /// Request id rendered for log lines, `"unknown"` when absent.
    pub fn request_id_or_unknown(&self) -> String {
        self.request_id
            .as_ref()
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_with_returns_new_instance() {
        let base = ExecutionContext::new();
        let extended = base.with("tenant", "acme");

        assert!(base.attribute("tenant").is_none());
        assert_eq!(extended.attribute("tenant"), Some(&json!("acme")));
    }

    #[test]
    fn test_with_overwrites_in_copy_only() {
        let first = ExecutionContext::new().with("k", 1);
        let second = first.with("k", 2);
        assert_eq!(first.attribute("k"), Some(&json!(1)));
        assert_eq!(second.attribute("k"), Some(&json!(2)));
    }

    #[test]
    fn test_scopes_dedup_and_keep_order() {
        let ctx = ExecutionContext::new().with_scopes(["b", "a", "b", "c"]);
        assert_eq!(ctx.scopes(), ["b", "a", "c"]);
        assert!(ctx.has_scope("a"));
        assert!(!ctx.has_scope("d"));
    }

    #[test]
    fn test_request_id_or_unknown() {
        assert_eq!(ExecutionContext::new().request_id_or_unknown(), "unknown");
        let ctx = ExecutionContext::new().with_request_id(42_i64);
        assert_eq!(ctx.request_id_or_unknown(), "42");
        let ctx = ExecutionContext::new().with_request_id("req-7");
        assert_eq!(ctx.request_id_or_unknown(), "req-7");
    }

    #[test]
    fn test_for_request_generates_uuid() {
        let a = ExecutionContext::for_request();
        let b = ExecutionContext::for_request();
        let Some(RequestId::Text(id)) = a.request_id() else {
            unreachable!("Expected a text request id");
        };
        assert_eq!(id.len(), 36);
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_serialization_preserves_scope_order() {
        let ctx = ExecutionContext::new()
            .with_request_id(7_i64)
            .with_user_id("alice")
            .with_scopes(["write", "read"]);
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["request_id"], json!(7));
        assert_eq!(value["user_id"], json!("alice"));
        assert_eq!(value["scopes"], json!(["write", "read"]));

        let back: ExecutionContext = serde_json::from_value(value).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExecutionContext>();
    }

    proptest! {
        #[test]
        fn prop_with_never_mutates_receiver(
            keys in proptest::collection::vec("[a-z]{1,4}", 1..8)
        ) {
            let mut ctx = ExecutionContext::new();
            for (i, key) in keys.iter().enumerate() {
                let before = ctx.clone();
                let next = ctx.with(key.clone(), i as i64);
                prop_assert_eq!(&ctx, &before);
                prop_assert_eq!(next.attribute(key), Some(&json!(i as i64)));
                ctx = next;
            }
        }
    }
}
