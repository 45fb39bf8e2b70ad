//! Tool descriptors.
//!
//! A [`ToolDescriptor`] describes one operation: identity, input schema,
//! behavioural hints, and free-form metadata. Descriptors are built once
//! and then only copied; the builder methods consume `self`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Metadata key holding a tool's pre-namespacing name.
pub const META_ORIGINAL_NAME: &str = "original_name";

/// Metadata key holding the namespace key of the owning provider.
pub const META_SOURCE_PROVIDER: &str = "source_provider";

/// Descriptor set keyed by effective tool name.
pub type ToolMap = BTreeMap<String, ToolDescriptor>;

/// Behavioural hints. `None` means "unknown", never "false".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// The tool has no side effects.
    #[serde(default)]
    pub read_only: Option<bool>,
    /// The tool may irreversibly modify its environment.
    #[serde(default)]
    pub destructive: Option<bool>,
    /// Repeating a call with the same arguments has no further effect.
    #[serde(default)]
    pub idempotent: Option<bool>,
    /// The tool interacts with entities outside the host.
    #[serde(default)]
    pub open_world: Option<bool>,
}

impl ToolAnnotations {
    /// Known discovery hints (read_only, destructive, idempotent) as a map,
    /// omitting every hint whose value is unknown.
    pub fn known_hints(&self) -> Map<String, Value> {
        [
            ("read_only", self.read_only),
            ("destructive", self.destructive),
            ("idempotent", self.idempotent),
        ]
        .into_iter()
        .filter_map(|(key, hint)| hint.map(|v| (key.to_string(), Value::Bool(v))))
        .collect()
    }
}

/// Immutable description of one tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    name: String,
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input_schema: Value,
    #[serde(default)]
    annotations: ToolAnnotations,
    #[serde(default)]
    source_provider: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl ToolDescriptor {
    /// Create a descriptor whose label defaults to its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            description: String::new(),
            input_schema: Value::Object(Map::new()),
            annotations: ToolAnnotations::default(),
            source_provider: None,
            metadata: Map::new(),
        }
    }

    /// Set the human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the JSON schema for the tool's arguments.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Replace all annotations.
    pub fn with_annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Set the read-only hint.
    pub fn read_only(mut self, value: bool) -> Self {
        self.annotations.read_only = Some(value);
        self
    }

    /// Set the destructive hint.
    pub fn destructive(mut self, value: bool) -> Self {
        self.annotations.destructive = Some(value);
        self
    }

    /// Set the idempotent hint.
    pub fn idempotent(mut self, value: bool) -> Self {
        self.annotations.idempotent = Some(value);
        self
    }

    /// Set the open-world hint.
    pub fn open_world(mut self, value: bool) -> Self {
        self.annotations.open_world = Some(value);
        self
    }

    /// Record which provider exposes this tool.
    pub fn with_source_provider(mut self, provider: impl Into<String>) -> Self {
        self.source_provider = Some(provider.into());
        self
    }

    /// Set one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Copy under a different effective name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Tool name, unique within its provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Argument schema.
    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Behavioural hints.
    pub fn annotations(&self) -> &ToolAnnotations {
        &self.annotations
    }

    /// Owning provider, when known.
    pub fn source_provider(&self) -> Option<&str> {
        self.source_provider.as_deref()
    }

    /// Free-form metadata.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns `true` only when the read-only hint is explicitly set.
    pub fn is_read_only(&self) -> bool {
        self.annotations.read_only == Some(true)
    }

    /// Pre-namespacing name recorded by a composite provider.
    pub fn original_name(&self) -> Option<&str> {
        self.metadata.get(META_ORIGINAL_NAME).and_then(Value::as_str)
    }

    /// Namespace key recorded by a composite provider.
    pub fn source_provider_key(&self) -> Option<&str> {
        self.metadata
            .get(META_SOURCE_PROVIDER)
            .and_then(Value::as_str)
    }

    /// Returns `true` if `query` (already lowercased) occurs in the
    /// concatenation of name, label, and description.
    pub fn matches_query(&self, query: &str) -> bool {
        let haystack = format!("{}{}{}", self.name, self.label, self.description).to_lowercase();
        haystack.contains(query)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_defaults_to_name() {
        let tool = ToolDescriptor::new("add");
        assert_eq!(tool.label(), "add");
        assert_eq!(tool.input_schema(), &json!({}));
    }

    #[test]
    fn test_builder_sets_hints() {
        let tool = ToolDescriptor::new("lookup")
            .read_only(true)
            .idempotent(true);
        assert!(tool.is_read_only());
        assert_eq!(tool.annotations().destructive, None);
    }

    #[test]
    fn test_known_hints_omit_unknown() {
        let annotations = ToolAnnotations {
            read_only: Some(true),
            destructive: None,
            idempotent: Some(false),
            open_world: Some(true),
        };
        let hints = annotations.known_hints();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints["read_only"], json!(true));
        assert_eq!(hints["idempotent"], json!(false));
        assert!(!hints.contains_key("destructive"));
        assert!(!hints.contains_key("open_world"));
    }

    #[test]
    fn test_renamed_keeps_everything_else() {
        let tool = ToolDescriptor::new("search")
            .with_label("Search")
            .with_metadata("owner", "fts");
        let renamed = tool.renamed("content/search");
        assert_eq!(renamed.name(), "content/search");
        assert_eq!(renamed.label(), "Search");
        assert_eq!(renamed.metadata()["owner"], json!("fts"));
        assert_eq!(tool.name(), "search");
    }

    #[test]
    fn test_original_name_from_metadata() {
        let tool = ToolDescriptor::new("math/add")
            .with_metadata(META_ORIGINAL_NAME, "add")
            .with_metadata(META_SOURCE_PROVIDER, "math");
        assert_eq!(tool.original_name(), Some("add"));
        assert_eq!(tool.source_provider_key(), Some("math"));
    }

    #[test]
    fn test_matches_query_across_fields() {
        let tool = ToolDescriptor::new("add")
            .with_label("Adder")
            .with_description("Sum two Numbers");
        assert!(tool.matches_query("numbers"));
        assert!(tool.matches_query("adder"));
        // Concatenation boundary: "add" + "Adder"
        assert!(tool.matches_query("dadd"));
        assert!(!tool.matches_query("multiply"));
    }

    #[test]
    fn test_serde_round_trip_keeps_unknown_hint_null() {
        let tool = ToolDescriptor::new("t").read_only(true);
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["annotations"]["destructive"], Value::Null);
        let back: ToolDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(back, tool);
    }
}
