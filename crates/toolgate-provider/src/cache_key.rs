//! Deterministic cache keys for execution results.
//!
//! Arguments are canonicalized (object keys sorted at every depth) before
//! hashing, so two logically equal argument maps always share a key no
//! matter how they were built.

use serde_json::Value;
use std::fmt::Write as _;

/// Serialize `value` with object keys sorted recursively.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(v) = map.get(key) {
                    write_canonical(v, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

/// `{prefix}:result:{blake3(name)}:{blake3(canonical args)}`.
pub fn result_key(prefix: &str, tool: &str, args: &Value) -> String {
    let name_hash = blake3::hash(tool.as_bytes());
    let args_hash = blake3::hash(canonical_json(args).as_bytes());
    format!("{prefix}:result:{}:{}", name_hash.to_hex(), args_hash.to_hex())
}

/// `{prefix}:discovery`.
pub fn discovery_key(prefix: &str) -> String {
    format!("{prefix}:discovery")
}

// ============================================================================
// Tests
// ============================================================================
