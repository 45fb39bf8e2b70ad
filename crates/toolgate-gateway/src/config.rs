//! Gateway configuration.
//!
//! Loaded from TOML; every field has a default, so an empty file is a
//! valid configuration.
//!
//! ```toml
//! [gateway]
//! tool_prefix = "tools_"
//!
//! [cache]
//! enabled = true
//! result_ttl_secs = 30
//!
//! [logging]
//! log_arguments = true
//!
//! [validation]
//! strict = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use toolgate_core::{Error, Result};
use toolgate_provider::CacheOptions;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Façade settings.
    pub gateway: GatewaySection,
    /// Caching layer settings.
    pub cache: CacheSection,
    /// Logging middleware settings.
    pub logging: LoggingSection,
    /// Validating middleware settings.
    pub validation: ValidationSection,
    /// Event middleware settings.
    pub events: EventsSection,
}

/// `[gateway]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySection {
    /// Prefix for the three registered operation names.
    #[serde(default)]
    pub tool_prefix: String,

    /// Generate a request id for calls that arrive without a context.
    #[serde(default = "default_true")]
    pub assign_request_ids: bool,
}

/// `[cache]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSection {
    /// Wrap the provider in a caching layer. Requires a cache store.
    #[serde(default)]
    pub enabled: bool,

    /// Discovery projection TTL in seconds. At most one year.
    #[serde(default = "default_discovery_ttl")]
    pub discovery_ttl_secs: u64,

    /// Read-only result TTL in seconds. At most one year.
    #[serde(default = "default_result_ttl")]
    pub result_ttl_secs: u64,

    /// Prefix for every cache key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// `[logging]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Add the logging middleware.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Include sanitized arguments in start records.
    #[serde(default)]
    pub log_arguments: bool,
}

/// `[validation]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSection {
    /// Add the validating middleware when a validator is supplied.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Forbid undeclared properties on object schemas.
    #[serde(default)]
    pub strict: bool,
}

/// `[events]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsSection {
    /// Add the event middleware when a dispatcher is supplied.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_discovery_ttl() -> u64 {
    300
}

fn default_result_ttl() -> u64 {
    60
}

fn default_key_prefix() -> String {
    "toolgate".to_string()
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            tool_prefix: String::new(),
            assign_request_ids: true,
        }
    }
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: false,
            discovery_ttl_secs: default_discovery_ttl(),
            result_ttl_secs: default_result_ttl(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            log_arguments: false,
        }
    }
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            enabled: true,
            strict: false,
        }
    }
}

impl Default for EventsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CacheSection {
    /// Convert into provider-level cache options.
    pub fn options(&self) -> CacheOptions {
        CacheOptions {
            discovery_ttl: Duration::from_secs(self.discovery_ttl_secs),
            result_ttl: Duration::from_secs(self.result_ttl_secs),
            key_prefix: self.key_prefix.clone(),
        }
    }
}

impl GatewayConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse gateway config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded gateway config");
        Ok(config)
    }

    /// Reject values the gateway cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.tool_prefix.chars().any(char::is_whitespace) {
            return Err(Error::config(format!(
                "tool_prefix must not contain whitespace: {:?}",
                self.gateway.tool_prefix
            )));
        }
        self.cache.options().validate()
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = GatewayConfig::from_toml_str("").unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert!(config.gateway.assign_request_ids);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.discovery_ttl_secs, 300);
        assert_eq!(config.cache.result_ttl_secs, 60);
        assert_eq!(config.cache.key_prefix, "toolgate");
        assert!(config.logging.enabled);
        assert!(!config.logging.log_arguments);
        assert!(config.validation.enabled);
        assert!(!config.validation.strict);
        assert!(config.events.enabled);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = GatewayConfig::from_toml_str(
            r#"
            [gateway]
            tool_prefix = "tools_"

            [cache]
            enabled = true
            result_ttl_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.gateway.tool_prefix, "tools_");
        assert!(config.gateway.assign_request_ids);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.result_ttl_secs, 5);
        assert_eq!(config.cache.discovery_ttl_secs, 300);
    }

    #[test]
    fn test_cache_options_conversion() {
        let options = CacheSection::default().options();
        assert_eq!(options.discovery_ttl, Duration::from_secs(300));
        assert_eq!(options.result_ttl, Duration::from_secs(60));
        assert_eq!(options.key_prefix, "toolgate");
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let err = GatewayConfig::from_toml_str("[cache]\nresult_ttl_secs = 0").unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_rejects_oversized_ttl() {
        let err = GatewayConfig::from_toml_str(
            "[cache]\nenabled = true\ndiscovery_ttl_secs = 9223372036854775807",
        )
        .unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_rejects_whitespace_prefix() {
        let err = GatewayConfig::from_toml_str("[gateway]\ntool_prefix = \"my tools\"").unwrap_err();
        assert!(err.to_string().contains("tool_prefix"));
    }

    #[test]
    fn test_rejects_empty_key_prefix() {
        let err = GatewayConfig::from_toml_str("[cache]\nkey_prefix = \"\"").unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_malformed_toml() {
        let err = GatewayConfig::from_toml_str("[cache\nenabled = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[validation]\nstrict = true").unwrap();
        let config = GatewayConfig::load(file.path()).unwrap();
        assert!(config.validation.strict);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = GatewayConfig::load("/definitely/not/here.toml").unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = GatewayConfig::default();
        config.gateway.tool_prefix = "x_".into();
        let text = config.to_toml_string().unwrap();
        assert_eq!(GatewayConfig::from_toml_str(&text).unwrap(), config);
    }
}
