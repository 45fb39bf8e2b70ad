//! Input schema validation.

use crate::middleware::{Middleware, Next};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use toolgate_core::{
    Arguments, ExecutionContext, ExecutionResult, Result, SchemaValidator, ValidationIssue,
};
use toolgate_provider::ToolProvider;

/// Data key holding the list of `{path, message, code}` issues.
pub const VALIDATION_ERRORS_KEY: &str = "validation_errors";

/// Validates arguments against the target tool's input schema before
/// execution.
///
/// Unknown tools and tools with an empty schema pass through untouched.
/// On failure the chain is short-circuited with an error result.
pub struct ValidatingMiddleware {
    provider: Arc<dyn ToolProvider>,
    validator: Arc<dyn SchemaValidator>,
    strict: bool,
}

impl ValidatingMiddleware {
    /// Validate against descriptors from `provider` using `validator`.
    pub fn new(provider: Arc<dyn ToolProvider>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self {
            provider,
            validator,
            strict: false,
        }
    }

    /// In strict mode, object schemas forbid properties they do not declare.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether strict mode is on.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn effective_schema(&self, schema: &Value) -> Value {
        let mut schema = schema.clone();
        if self.strict
            && let Value::Object(map) = &mut schema
            && map.get("type").and_then(Value::as_str) == Some("object")
        {
            map.insert("additionalProperties".to_string(), Value::Bool(false));
        }
        schema
    }
}

fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Render a validation failure as an error result.
pub fn validation_failure(issues: &[ValidationIssue]) -> ExecutionResult {
    let message = issues
        .iter()
        .map(ValidationIssue::render)
        .collect::<Vec<_>>()
        .join("; ");
    let listed: Vec<Value> = issues
        .iter()
        .map(|i| json!({"path": i.path, "message": i.message, "code": i.code}))
        .collect();
    let mut data = Map::new();
    data.insert(VALIDATION_ERRORS_KEY.to_string(), Value::Array(listed));
    ExecutionResult::error(message, data)
}

impl Middleware for ValidatingMiddleware {
    fn handle(
        &self,
        name: &str,
        args: &Arguments,
        context: &ExecutionContext,
        next: Next<'_>,
    ) -> Result<ExecutionResult> {
        let Some(descriptor) = self.provider.get_tool(name)? else {
            return next.run(name, args, context);
        };
        if is_empty_schema(descriptor.input_schema()) {
            return next.run(name, args, context);
        }

        let schema = self.effective_schema(descriptor.input_schema());
        let outcome = self
            .validator
            .validate(&Value::Object(args.clone()), &schema);
        if outcome.is_valid() {
            return next.run(name, args, context);
        }

        tracing::debug!(
            tool = %name,
            issues = outcome.errors().len(),
            "Rejected arguments failing schema validation"
        );
        Ok(validation_failure(outcome.errors()))
    }
}

impl std::fmt::Debug for ValidatingMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatingMiddleware")
            .field("provider", &self.provider.name())
            .field("strict", &self.strict)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
