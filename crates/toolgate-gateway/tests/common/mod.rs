//! Common test utilities for gateway integration tests.

use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use toolgate_core::{
    Arguments, ExecutionResult, HandlerError, SchemaValidator, ToolDescriptor, ValidationIssue,
    ValidationOutcome,
};
use toolgate_provider::BasicProvider;

/// Counts handler invocations across clones.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Build an argument map from a JSON object literal.
pub fn args(value: Value) -> Arguments {
    value.as_object().cloned().unwrap_or_else(Map::new)
}

/// `math` provider: read-only integer `add`, and `flaky` which always
/// reports failure.
pub fn math_provider(counter: &CallCounter) -> Arc<BasicProvider> {
    let provider = BasicProvider::named("math");
    let add_counter = counter.clone();
    let flaky_counter = counter.clone();
    provider
        .register(
            ToolDescriptor::new("add")
                .with_label("Add")
                .with_description("Add two numbers")
                .with_input_schema(json!({
                    "type": "object",
                    "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                    "required": ["a", "b"]
                }))
                .read_only(true)
                .idempotent(true),
            move |args, _ctx| {
                add_counter.hit();
                let a = args.get("a").and_then(Value::as_i64).unwrap_or(0);
                let b = args.get("b").and_then(Value::as_i64).unwrap_or(0);
                let mut data = Map::new();
                data.insert("result".to_string(), json!(a + b));
                Ok::<_, HandlerError>(ExecutionResult::success(format!("Result: {}", a + b), data))
            },
        )
        .register(
            ToolDescriptor::new("flaky")
                .with_description("Upstream lookup that is currently down")
                .read_only(true),
            move |_args, _ctx| {
                flaky_counter.hit();
                Ok::<_, HandlerError>(json!({"success": false, "message": "upstream down"}))
            },
        );
    Arc::new(provider)
}

/// Validator that checks `required` fields are present and numeric.
pub struct RequiredNumbers;

impl SchemaValidator for RequiredNumbers {
    fn validate(&self, data: &Value, schema: &Value) -> ValidationOutcome {
        let mut issues = Vec::new();
        for field in schema["required"].as_array().into_iter().flatten() {
            let Some(field) = field.as_str() else { continue };
            match data.get(field) {
                None => issues.push(ValidationIssue::new(field, "is required", "required")),
                Some(v) if !v.is_number() => {
                    issues.push(ValidationIssue::new(field, "must be a number", "type"))
                }
                Some(_) => {}
            }
        }
        if let Some(props) = schema["properties"].as_object()
            && schema["additionalProperties"] == json!(false)
            && let Some(data) = data.as_object()
        {
            for key in data.keys().filter(|k| !props.contains_key(*k)) {
                issues.push(ValidationIssue::new(
                    key.as_str(),
                    "is not allowed",
                    "additional_properties",
                ));
            }
        }
        if issues.is_empty() {
            ValidationOutcome::valid()
        } else {
            ValidationOutcome::invalid(issues)
        }
    }
}
