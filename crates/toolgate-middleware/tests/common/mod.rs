//! Common test utilities for middleware integration tests.

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use toolgate_core::{
    Arguments, ExecutionResult, HandlerError, SchemaValidator, ToolDescriptor, ToolLogger,
    ValidationIssue, ValidationOutcome,
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

/// A provider with an integer `add` tool requiring numeric `a` and `b`.
pub fn add_provider(counter: &CallCounter) -> Arc<BasicProvider> {
    let provider = BasicProvider::named("math");
    let counter = counter.clone();
    provider.register(
        ToolDescriptor::new("add")
            .with_description("Add two integers")
            .with_input_schema(json!({
                "type": "object",
                "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                "required": ["a", "b"]
            }))
            .read_only(true),
        move |args, _ctx| {
            counter.hit();
            let a = args.get("a").and_then(Value::as_i64).unwrap_or(0);
            let b = args.get("b").and_then(Value::as_i64).unwrap_or(0);
            let mut data = Map::new();
            data.insert("result".to_string(), json!(a + b));
            Ok::<_, HandlerError>(ExecutionResult::success(format!("Result: {}", a + b), data))
        },
    );
    Arc::new(provider)
}

/// Checks that every `required` property is present and numeric.
///
/// Just enough of a schema engine to drive the validating middleware.
pub struct NumericFields;

impl SchemaValidator for NumericFields {
    fn validate(&self, data: &Value, schema: &Value) -> ValidationOutcome {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let issues: Vec<ValidationIssue> = required
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|field| match data.get(field) {
                None => Some(ValidationIssue::new(field, "is required", "required")),
                Some(v) if !v.is_number() => {
                    Some(ValidationIssue::new(field, "must be a number", "type"))
                }
                Some(_) => None,
            })
            .collect();
        if issues.is_empty() {
            ValidationOutcome::valid()
        } else {
            ValidationOutcome::invalid(issues)
        }
    }
}

/// Logger that keeps `(level, message)` pairs.
#[derive(Default)]
pub struct RecordingLogger {
    pub records: Mutex<Vec<(String, String)>>,
}

impl ToolLogger for RecordingLogger {
    fn info(&self, message: &str, _context: &Map<String, Value>) {
        self.records.lock().push(("info".into(), message.into()));
    }

    fn warning(&self, message: &str, _context: &Map<String, Value>) {
        self.records.lock().push(("warning".into(), message.into()));
    }

    fn error(&self, message: &str, _context: &Map<String, Value>) {
        self.records.lock().push(("error".into(), message.into()));
    }
}
