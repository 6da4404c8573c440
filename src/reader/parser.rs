//! Lenient newline-delimited JSON decoding
//!
//! A body is decoded line by line. Lines that are not JSON objects are
//! skipped and counted instead of failing the file. A body that opens an
//! array, or has any line that fails, is first tried as a single JSON
//! document (pretty-printed object or an array of objects). The document
//! result wins whenever it parses.

use crate::types::{JsonObject, JsonValue};
use serde_json::Value;

/// Objects decoded from one file body
#[derive(Debug, Default)]
pub struct DecodedBody {
    /// Decoded objects, in file order
    pub objects: Vec<JsonObject>,
    /// Lines that could not be decoded into an object
    pub skipped_lines: usize,
}

/// Decode a newline-delimited JSON body into objects
pub fn decode_body(body: &str) -> DecodedBody {
    let decoded = decode_lines(body);

    if decoded.skipped_lines > 0 || body.trim_start().starts_with('[') {
        if let Some(objects) = decode_document(body) {
            return DecodedBody {
                objects,
                skipped_lines: 0,
            };
        }
    }

    decoded
}

fn decode_lines(body: &str) -> DecodedBody {
    let mut decoded = DecodedBody::default();

    for (line_num, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(obj)) => decoded.objects.push(obj),
            Ok(other) => {
                tracing::debug!(
                    "Skipping line {}: expected JSON object, got {}",
                    line_num + 1,
                    json_kind(&other)
                );
                decoded.skipped_lines += 1;
            }
            Err(e) => {
                tracing::debug!("Skipping line {}: {e}", line_num + 1);
                decoded.skipped_lines += 1;
            }
        }
    }

    decoded
}

/// Decode a whole body as one JSON document
fn decode_document(body: &str) -> Option<Vec<JsonObject>> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(obj) => Some(vec![obj]),
        Value::Array(items) => {
            let objects: Vec<JsonObject> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => Some(obj),
                    _ => None,
                })
                .collect();
            (!objects.is_empty()).then_some(objects)
        }
        _ => None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Typed field access
// ============================================================================

/// Read a string field; numbers are rendered, anything else is `None`
pub fn get_string(obj: &JsonObject, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a float field; numeric strings are parsed
pub fn get_f64(obj: &JsonObject, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Read an integer field; integral floats and numeric strings are accepted
#[allow(clippy::cast_precision_loss)]
pub fn get_i64(obj: &JsonObject, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

/// Convert a float to i64 when it holds an exact integer in range
#[allow(clippy::cast_precision_loss)]
pub fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
