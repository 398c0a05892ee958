//! JSON serialization of the value model.
//!
//! Encoding is total. Strings escape only backslash and double quote;
//! control characters such as newline are written through unescaped.

use super::value::{Object, Value};

/// Serialize a value to JSON text.
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    encode_into(value, &mut out);
    out
}

/// Serialize a value, appending to `out`.
pub fn encode_into(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Integer(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::String(s) => encode_string(s, out),
        Value::Sequence(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                encode_into(item, out);
            }
            out.push(']');
        }
        Value::Object(object) => encode_object(object, out),
    }
}

fn encode_object(object: &Object, out: &mut String) {
    out.push('{');
    for (idx, (key, value)) in object.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        encode_string(key, out);
        out.push(':');
        encode_into(value, out);
    }
    out.push('}');
}

fn encode_string(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('"');
    out.push_str(&escape(s));
    out.push('"');
}

/// Escape `\` and `"` for embedding in a JSON string literal.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

/// Textual form of a float. Finite values always carry a decimal point or
/// exponent; NaN and infinities have no JSON form and render as `null`.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() {
        format!("{:?}", f)
    } else {
        "null".to_string()
    }
}
