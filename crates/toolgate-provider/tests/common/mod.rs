//! Common test utilities for provider integration tests.

use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use toolgate_core::{Arguments, ExecutionResult, HandlerError, ToolDescriptor};
use toolgate_provider::BasicProvider;

/// Counts handler invocations across clones.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

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

/// A `math` provider exposing read-only `add` and side-effecting `record`.
pub fn math_provider(counter: &CallCounter) -> Arc<BasicProvider> {
    let provider = BasicProvider::named("math");
    let add_counter = counter.clone();
    let record_counter = counter.clone();
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
                .read_only(true),
            move |args, _ctx| {
                add_counter.hit();
                let a = args.get("a").and_then(Value::as_f64).unwrap_or(0.0);
                let b = args.get("b").and_then(Value::as_f64).unwrap_or(0.0);
                let sum = a + b;
                Ok::<_, HandlerError>(ExecutionResult::success(
                    format!("Result: {sum}"),
                    args_map("result", json!(sum)),
                ))
            },
        )
        .register(
            ToolDescriptor::new("record")
                .with_description("Append a value to the ledger")
                .destructive(false),
            move |_args, _ctx| {
                record_counter.hit();
                Ok::<_, HandlerError>("recorded")
            },
        );
    Arc::new(provider)
}

fn args_map(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}
