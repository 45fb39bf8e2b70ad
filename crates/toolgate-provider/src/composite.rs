//! Namespacing composite provider.
//!
//! [`CompositeProvider`] presents several providers as one. Each wrapped
//! provider lives under a namespace key; by default its tools are exposed as
//! `"{key}/{name}"`. Every merged descriptor records the original name and
//! the owning key in its metadata, and `execute` routes on that metadata
//! rather than re-parsing the effective name.
//!
//! # Example
//!
//! ```rust,ignore
//! let composite = CompositeProvider::new();
//! composite
//!     .add_provider("content", Arc::new(content_tools))?
//!     .add_provider("search", Arc::new(search_tools))?;
//!
//! assert!(composite.has_tool("search/query")?);
//! ```
//!
//! # Memoization
//!
//! The merged descriptor map is computed lazily and memoized. Adding or
//! removing a provider drops the memo entirely and bumps a generation
//! counter; a merge computed against an older generation is returned to its
//! caller but never stored, so the memo can never be partially stale.
//! Call [`CompositeProvider::clear_cache`] after changing a wrapped
//! provider's tool set behind the composite's back.

use crate::provider::ToolProvider;
use parking_lot::RwLock;
use std::sync::Arc;
use toolgate_core::{
    Arguments, Error, ExecutionContext, ExecutionResult, Result, ToolDescriptor, ToolMap,
    META_ORIGINAL_NAME, META_SOURCE_PROVIDER,
};

/// Separator between namespace key and original name.
pub const NAMESPACE_SEPARATOR: char = '/';

struct CompositeState {
    providers: Vec<(String, Arc<dyn ToolProvider>)>,
    generation: u64,
    merged: Option<Arc<ToolMap>>,
}

/// A provider that combines multiple namespaced sub-providers.
pub struct CompositeProvider {
    prefixed: bool,
    state: RwLock<CompositeState>,
}

impl std::fmt::Debug for CompositeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("CompositeProvider")
            .field("prefixed", &self.prefixed)
            .field(
                "providers",
                &state.providers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("generation", &state.generation)
            .finish()
    }
}

impl CompositeProvider {
    /// Create an empty, prefixing composite.
    pub fn new() -> Self {
        Self {
            prefixed: true,
            state: RwLock::new(CompositeState {
                providers: Vec::new(),
                generation: 0,
                merged: None,
            }),
        }
    }

    /// Build from explicit `(key, provider)` pairs, in order.
    pub fn from_providers<I, K>(providers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Arc<dyn ToolProvider>)>,
        K: Into<String>,
    {
        let composite = Self::new();
        for (key, provider) in providers {
            composite.add_provider(key, provider)?;
        }
        Ok(composite)
    }

    /// Build from a bare list; keys are derived from each provider's
    /// [`ToolProvider::name`], with `_1`, `_2`, … appended to duplicates.
    pub fn from_list<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ToolProvider>>,
    {
        let composite = Self::new();
        for provider in providers {
            composite.push(provider);
        }
        composite
    }

    /// Expose bare original names instead of `"{key}/{name}"`.
    ///
    /// When two providers expose the same name, the provider added later
    /// shadows the earlier one.
    pub fn unprefixed(mut self) -> Self {
        self.prefixed = false;
        self
    }

    /// Whether effective names carry the namespace key.
    pub fn is_prefixed(&self) -> bool {
        self.prefixed
    }

    /// Add a provider under `key`.
    ///
    /// Re-adding an existing key replaces that provider in place (last
    /// write wins, position kept). Invalidates the merged memo.
    pub fn add_provider(
        &self,
        key: impl Into<String>,
        provider: Arc<dyn ToolProvider>,
    ) -> Result<&Self> {
        let key = key.into();
        validate_key(&key)?;

        let mut state = self.state.write();
        match state.providers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                tracing::debug!(key = %key, "Replacing provider under existing key");
                slot.1 = provider;
            }
            None => state.providers.push((key, provider)),
        }
        invalidate(&mut state);
        Ok(self)
    }

    /// Add a provider under a key derived from its name. Returns the key.
    pub fn push(&self, provider: Arc<dyn ToolProvider>) -> String {
        let mut state = self.state.write();
        let base = derive_key(provider.name());
        let key = unique_key(&base, &state.providers);
        state.providers.push((key.clone(), provider));
        invalidate(&mut state);
        key
    }

    /// Remove the provider under `key`. Returns `true` if one was removed.
    pub fn remove_provider(&self, key: &str) -> bool {
        let mut state = self.state.write();
        let before = state.providers.len();
        state.providers.retain(|(k, _)| k != key);
        let removed = state.providers.len() != before;
        if removed {
            invalidate(&mut state);
        }
        removed
    }

    /// Drop the merged memo so the next discovery call recomputes it.
    pub fn clear_cache(&self) {
        invalidate(&mut self.state.write());
    }

    /// Namespace keys in insertion order.
    pub fn provider_keys(&self) -> Vec<String> {
        self.state
            .read()
            .providers
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// The provider registered under `key`.
    pub fn provider(&self, key: &str) -> Option<Arc<dyn ToolProvider>> {
        self.state
            .read()
            .providers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.clone())
    }

    fn merged(&self) -> Result<Arc<ToolMap>> {
        let (providers, generation) = {
            let state = self.state.read();
            if let Some(merged) = &state.merged {
                return Ok(merged.clone());
            }
            (state.providers.clone(), state.generation)
        };

        // Sub-providers may be slow (cache stores); merge without the lock.
        let merged = Arc::new(self.merge(&providers)?);

        let mut state = self.state.write();
        if state.generation == generation && state.merged.is_none() {
            state.merged = Some(merged.clone());
        }
        Ok(merged)
    }

    fn merge(&self, providers: &[(String, Arc<dyn ToolProvider>)]) -> Result<ToolMap> {
        let mut merged = ToolMap::new();
        for (key, provider) in providers {
            for (name, descriptor) in provider.list_tools()? {
                let effective = if self.prefixed {
                    format!("{key}{NAMESPACE_SEPARATOR}{name}")
                } else {
                    name.clone()
                };
                let descriptor = namespaced(&descriptor, &effective, &name, key);
                if let Some(shadowed) = merged.insert(effective.clone(), descriptor) {
                    tracing::warn!(
                        tool = %effective,
                        shadowed = shadowed.source_provider_key().unwrap_or_default(),
                        winner = %key,
                        "Tool name collision; later provider wins"
                    );
                }
            }
        }
        Ok(merged)
    }
}

impl Default for CompositeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolProvider for CompositeProvider {
    fn name(&self) -> &str {
        "composite"
    }

    fn list_tools(&self) -> Result<ToolMap> {
        Ok(self.merged()?.as_ref().clone())
    }

    fn get_tool(&self, name: &str) -> Result<Option<ToolDescriptor>> {
        Ok(self.merged()?.get(name).cloned())
    }

    fn execute(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
    ) -> Result<ExecutionResult> {
        let merged = self.merged()?;
        let descriptor = merged.get(name).ok_or_else(|| Error::not_found(name))?;
        let (Some(key), Some(original)) =
            (descriptor.source_provider_key(), descriptor.original_name())
        else {
            return Err(Error::not_found(name));
        };
        let provider = self.provider(key).ok_or_else(|| Error::not_found(name))?;
        provider.execute(original, args, context)
    }

    fn tool_count(&self) -> Result<usize> {
        Ok(self.merged()?.len())
    }

    fn has_tool(&self, name: &str) -> Result<bool> {
        Ok(self.merged()?.contains_key(name))
    }
}

fn invalidate(state: &mut CompositeState) {
    state.merged = None;
    state.generation = state.generation.wrapping_add(1);
}

fn namespaced(
    descriptor: &ToolDescriptor,
    effective: &str,
    original: &str,
    key: &str,
) -> ToolDescriptor {
    descriptor
        .renamed(effective)
        .with_source_provider(key)
        .with_metadata(META_ORIGINAL_NAME, original)
        .with_metadata(META_SOURCE_PROVIDER, key)
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::config("namespace key must not be empty"));
    }
    if key.contains(NAMESPACE_SEPARATOR) {
        return Err(Error::config(format!(
            "namespace key '{key}' must not contain '{NAMESPACE_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Lowercase snake_case key from a provider name.
fn derive_key(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let key = key.trim_matches('_');
    if key.is_empty() {
        "provider".to_string()
    } else {
        key.to_string()
    }
}

fn unique_key(base: &str, providers: &[(String, Arc<dyn ToolProvider>)]) -> String {
    let taken = |candidate: &str| providers.iter().any(|(k, _)| k == candidate);
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

// ============================================================================
// Tests
// ============================================================================
