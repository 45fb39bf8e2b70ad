//! Schema validation contract.
//!
//! Toolgate does not validate schemas itself. Plug in any engine by
//! implementing [`SchemaValidator`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One validation problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON-pointer-ish location of the problem; empty for the root.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// Machine-readable error code.
    pub code: String,
}

impl ValidationIssue {
    /// Create an issue.
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: code.into(),
        }
    }

    /// `"{path}: {message}"`, or just the message when the path is empty.
    pub fn render(&self) -> String {
        if self.path.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.path, self.message)
        }
    }
}

/// Result of validating one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    errors: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn valid() -> Self {
        Self::default()
    }

    /// A failing outcome with the given issues.
    pub fn invalid(errors: Vec<ValidationIssue>) -> Self {
        Self { errors }
    }

    /// Returns `true` when no issue was reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every reported issue.
    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }
}

/// Validates a JSON document against a JSON schema.
pub trait SchemaValidator: Send + Sync {
    /// Validate `data` against `schema`.
    fn validate(&self, data: &Value, schema: &Value) -> ValidationOutcome;
}

impl<F> SchemaValidator for F
where
    F: Fn(&Value, &Value) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, data: &Value, schema: &Value) -> ValidationOutcome {
        self(data, schema)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_with_and_without_path() {
        assert_eq!(
            ValidationIssue::new("a", "must be a number", "type").render(),
            "a: must be a number"
        );
        assert_eq!(
            ValidationIssue::new("", "unexpected document", "type").render(),
            "unexpected document"
        );
    }

    #[test]
    fn test_closure_is_validator() {
        let always_fails = |_: &Value, _: &Value| {
            ValidationOutcome::invalid(vec![ValidationIssue::new("x", "bad", "custom")])
        };
        let outcome = always_fails.validate(&json!({}), &json!({}));
        assert!(!outcome.is_valid());
        assert_eq!(outcome.errors().len(), 1);
    }
}
