//! Argument redaction for log output.

use serde_json::{Map, Value};

/// Replacement written over sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// Case-insensitive key substrings whose values are redacted.
pub const SENSITIVE_SUBSTRINGS: &[&str] = &[
    "password",
    "pass",
    "secret",
    "token",
    "key",
    "api_key",
    "credential",
    "auth",
];

/// Returns `true` if `key` contains any sensitive substring.
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_SUBSTRINGS.iter().any(|s| lower.contains(s))
}

/// Copy of `args` with sensitive values replaced by [`REDACTED`].
///
/// Recurses into nested objects, including objects inside arrays.
pub fn sanitize_arguments(args: &Map<String, Value>) -> Map<String, Value> {
    let mut cloned = args.clone();
    redact_object(&mut cloned);
    cloned
}

fn redact_in_place(value: &mut Value) {
    match value {
        Value::Object(map) => redact_object(map),
        Value::Array(items) => {
            for item in items {
                redact_in_place(item);
            }
        }
        _ => {}
    }
}

fn redact_object(map: &mut Map<String, Value>) {
    for (key, val) in map {
        if is_sensitive_key(key) {
            *val = Value::String(REDACTED.to_string());
        } else {
            redact_in_place(val);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
