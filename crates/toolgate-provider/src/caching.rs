//! Caching decorator.
//!
//! [`CachingProvider`] memoizes discovery in an external [`CacheStore`] and,
//! for tools whose read-only hint is explicitly `true`, memoizes successful
//! execution results. Failed results are never cached, and tools without
//! the read-only hint bypass the result cache entirely (no read, no write).
//!
//! Nothing is invalidated implicitly. Whoever owns both this layer and the
//! wrapped provider calls [`CachingProvider::clear_discovery_cache`] or
//! [`CachingProvider::clear_result_cache`] when the wrapped provider changes.

use crate::cache_key::{discovery_key, result_key};
use crate::provider::ToolProvider;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use toolgate_core::{
    Arguments, CacheStore, Error, ExecutionContext, ExecutionResult, Result, ToolDescriptor,
    ToolMap,
};

/// Longest TTL [`CacheOptions::validate`] accepts (one year).
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// TTLs and key namespace for a [`CachingProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    /// How long the discovery projection stays cached.
    pub discovery_ttl: Duration,
    /// How long a read-only result stays cached.
    pub result_ttl: Duration,
    /// Prefix for every key this layer writes.
    pub key_prefix: String,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            discovery_ttl: Duration::from_secs(300),
            result_ttl: Duration::from_secs(60),
            key_prefix: "toolgate".to_string(),
        }
    }
}

impl CacheOptions {
    /// Reject zero TTLs, TTLs above [`MAX_TTL`], and an empty key prefix.
    pub fn validate(&self) -> Result<()> {
        for (label, ttl) in [("discovery", self.discovery_ttl), ("result", self.result_ttl)] {
            if ttl.is_zero() {
                return Err(Error::config(format!("{label} TTL must be greater than zero")));
            }
            if ttl > MAX_TTL {
                return Err(Error::config(format!(
                    "{label} TTL must not exceed {} seconds",
                    MAX_TTL.as_secs()
                )));
            }
        }
        if self.key_prefix.trim().is_empty() {
            return Err(Error::config("cache key prefix must not be empty"));
        }
        Ok(())
    }
}

/// Provider decorator backed by an external cache store.
pub struct CachingProvider {
    inner: Arc<dyn ToolProvider>,
    store: Arc<dyn CacheStore>,
    options: CacheOptions,
}

impl CachingProvider {
    /// Wrap `inner` with default options.
    pub fn new(inner: Arc<dyn ToolProvider>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            inner,
            store,
            options: CacheOptions::default(),
        }
    }

    /// Replace the options after validating them.
    pub fn with_options(mut self, options: CacheOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Active options.
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &Arc<dyn ToolProvider> {
        &self.inner
    }

    /// Key under which the discovery projection is stored.
    pub fn discovery_cache_key(&self) -> String {
        discovery_key(&self.options.key_prefix)
    }

    /// Key under which the result of `name(args)` is stored.
    pub fn result_cache_key(&self, name: &str, args: &Arguments) -> String {
        result_key(&self.options.key_prefix, name, &Value::Object(args.clone()))
    }

    /// Delete the cached discovery projection.
    pub fn clear_discovery_cache(&self) -> Result<()> {
        self.store.delete(&self.discovery_cache_key())
    }

    /// Delete one cached result.
    pub fn clear_result_cache(&self, name: &str, args: &Arguments) -> Result<()> {
        self.store.delete(&self.result_cache_key(name, args))
    }

    fn cached_tools(&self, key: &str) -> Result<Option<ToolMap>> {
        let Some(value) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_value::<Vec<ToolDescriptor>>(value) {
            Ok(descriptors) => Ok(Some(
                descriptors
                    .into_iter()
                    .map(|d| (d.name().to_string(), d))
                    .collect(),
            )),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable discovery cache entry");
                Ok(None)
            }
        }
    }

    fn cached_result(&self, key: &str) -> Result<Option<ExecutionResult>> {
        let Some(value) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_value::<ExecutionResult>(value) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable result cache entry");
                Ok(None)
            }
        }
    }
}

impl ToolProvider for CachingProvider {
    fn name(&self) -> &str {
        "caching"
    }

    fn list_tools(&self) -> Result<ToolMap> {
        let key = self.discovery_cache_key();
        if let Some(tools) = self.cached_tools(&key)? {
            tracing::debug!(key = %key, "Discovery cache hit");
            return Ok(tools);
        }

        let tools = self.inner.list_tools()?;
        let projection = serde_json::to_value(tools.values().collect::<Vec<_>>())?;
        self.store.set(&key, projection, self.options.discovery_ttl)?;
        Ok(tools)
    }

    fn execute(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        let read_only = self
            .get_tool(name)?
            .is_some_and(|descriptor| descriptor.is_read_only());
        if !read_only {
            return self.inner.execute(name, args, context);
        }

        let key = self.result_cache_key(name, args);
        if let Some(result) = self.cached_result(&key)? {
            tracing::debug!(tool = %name, "Result cache hit");
            return Ok(result);
        }

        let result = self.inner.execute(name, args, context)?;
        if result.is_success() {
            self.store
                .set(&key, serde_json::to_value(&result)?, self.options.result_ttl)?;
        }
        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::basic::BasicProvider;
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use toolgate_core::{HandlerError, InMemoryCacheStore};

    struct Fixture {
        calls: Arc<AtomicUsize>,
        inner: Arc<BasicProvider>,
        store: Arc<InMemoryCacheStore>,
        caching: CachingProvider,
    }

    fn fixture(read_only: Option<bool>, succeed: bool) -> Fixture {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut descriptor = ToolDescriptor::new("lookup");
        if let Some(flag) = read_only {
            descriptor = descriptor.read_only(flag);
        }
        let inner = Arc::new(BasicProvider::new());
        inner.register(descriptor, move |args, _| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let key = args.get("key").cloned().unwrap_or(Value::Null);
            Ok::<_, HandlerError>(json!({"success": succeed, "message": "looked up", "key": key, "call": n}))
        });
        let store = Arc::new(InMemoryCacheStore::new());
        let caching = CachingProvider::new(inner.clone(), store.clone());
        Fixture {
            calls,
            inner,
            store,
            caching,
        }
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_read_only_result_is_cached() {
        let f = fixture(Some(true), true);
        let ctx = ExecutionContext::new();
        let first = f.caching.execute("lookup", &args(json!({"key": "a"})), &ctx).unwrap();
        let second = f.caching.execute("lookup", &args(json!({"key": "a"})), &ctx).unwrap();

        assert_eq!(first.message(), second.message());
        assert_eq!(first.data(), second.data());
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_different_args_miss() {
        let f = fixture(Some(true), true);
        let ctx = ExecutionContext::new();
        f.caching.execute("lookup", &args(json!({"key": "a"})), &ctx).unwrap();
        f.caching.execute("lookup", &args(json!({"key": "b"})), &ctx).unwrap();
        assert_eq!(f.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_read_only_result_not_cached() {
        let f = fixture(Some(true), false);
        let ctx = ExecutionContext::new();
        for _ in 0..3 {
            let r = f.caching.execute("lookup", &Map::new(), &ctx).unwrap();
            assert!(!r.is_success());
        }
        assert_eq!(f.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_non_read_only_bypasses_cache() {
        for hint in [None, Some(false)] {
            let f = fixture(hint, true);
            let ctx = ExecutionContext::new();
            f.caching.execute("lookup", &Map::new(), &ctx).unwrap();
            f.caching.execute("lookup", &Map::new(), &ctx).unwrap();
            assert_eq!(f.calls.load(Ordering::SeqCst), 2);
            // Only the discovery entry was written.
            assert_eq!(f.store.len(), 1);
        }
    }

    #[test]
    fn test_clear_result_cache() {
        let f = fixture(Some(true), true);
        let ctx = ExecutionContext::new();
        let a = args(json!({"key": "a"}));
        f.caching.execute("lookup", &a, &ctx).unwrap();
        f.caching.clear_result_cache("lookup", &a).unwrap();
        let again = f.caching.execute("lookup", &a, &ctx).unwrap();
        assert_eq!(again.get("call"), Some(&json!(2)));
    }

    #[test]
    fn test_discovery_is_cached_until_cleared() {
        let f = fixture(Some(true), true);
        assert_eq!(f.caching.tool_count().unwrap(), 1);
        assert!(f.store.contains(&f.caching.discovery_cache_key()));

        f.inner
            .register(ToolDescriptor::new("extra"), |_, _| Ok::<_, HandlerError>("x"));
        assert_eq!(f.caching.tool_count().unwrap(), 1);

        f.caching.clear_discovery_cache().unwrap();
        assert_eq!(f.caching.tool_count().unwrap(), 2);
    }

    #[test]
    fn test_discovery_hit_round_trips_descriptors() {
        let f = fixture(Some(true), true);
        let live = f.caching.list_tools().unwrap();
        let cached = f.caching.list_tools().unwrap();
        assert_eq!(live, cached);
        assert!(cached["lookup"].is_read_only());
    }

    #[test]
    fn test_unknown_tool_is_not_found() {
        let f = fixture(Some(true), true);
        let err = f
            .caching
            .execute("missing", &Map::new(), &ExecutionContext::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_corrupt_entry_treated_as_miss() {
        let f = fixture(Some(true), true);
        let a = args(json!({"key": "a"}));
        let key = f.caching.result_cache_key("lookup", &a);
        f.store.set(&key, json!("garbage"), Duration::from_secs(60)).unwrap();
        let r = f.caching.execute("lookup", &a, &ExecutionContext::new()).unwrap();
        assert!(r.is_success());
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_store_failure_propagates() {
        struct BrokenStore;
        impl CacheStore for BrokenStore {
            fn get(&self, _key: &str) -> Result<Option<Value>> {
                Err(Error::cache("connection refused"))
            }
            fn set(&self, _key: &str, _value: Value, _ttl: Duration) -> Result<()> {
                Err(Error::cache("connection refused"))
            }
            fn delete(&self, _key: &str) -> Result<()> {
                Err(Error::cache("connection refused"))
            }
        }

        let f = fixture(Some(true), true);
        let caching = CachingProvider::new(f.inner.clone(), Arc::new(BrokenStore));
        let err = caching.list_tools().unwrap_err();
        assert_eq!(err.kind(), "cache");
        assert_eq!(f.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_options_validation() {
        let f = fixture(None, true);
        let err = f
            .caching
            .with_options(CacheOptions {
                result_ttl: Duration::ZERO,
                ..CacheOptions::default()
            })
            .err()
            .unwrap();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_options_reject_ttl_above_ceiling() {
        let options = CacheOptions {
            discovery_ttl: Duration::from_secs(i64::MAX as u64),
            ..CacheOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("discovery TTL must not exceed"));

        let at_ceiling = CacheOptions {
            result_ttl: MAX_TTL,
            ..CacheOptions::default()
        };
        assert!(at_ceiling.validate().is_ok());
    }
}
