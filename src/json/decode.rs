//! Decoder for flat JSON objects.
//!
//! The decoder splits the object body on top-level commas and each field
//! on its first top-level colon, tracking double-quoted strings and
//! backslash escapes along the way. It does not track nesting, so any
//! unquoted brace or bracket inside the body is rejected rather than
//! misread.

use thiserror::Error;

use super::value::{Object, Value};

/// Reasons a request body is not a decodable flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedJson {
    #[error("JSON must be an object starting with {{ and ending with }}")]
    NotAnObject,

    #[error("nested objects and arrays are not supported")]
    NestedValue,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("empty field")]
    EmptyField,

    #[error("missing ':' in field `{0}`")]
    MissingColon(String),

    #[error("field name must be a quoted string, got `{0}`")]
    UnquotedKey(String),

    #[error("missing value for field \"{0}\"")]
    MissingValue(String),
}

/// Decode a flat JSON object.
///
/// `{}` decodes to an empty [`Object`]; rejecting it is the caller's call.
/// Duplicate keys keep their first position and take the last value.
pub fn decode(text: &str) -> Result<Object, MalformedJson> {
    let trimmed = text.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('{') || !trimmed.ends_with('}') {
        return Err(MalformedJson::NotAnObject);
    }

    let body = trimmed[1..trimmed.len() - 1].trim();
    let mut object = Object::new();
    if body.is_empty() {
        return Ok(object);
    }

    for field in split_fields(body)? {
        let (key_text, value_text) = split_key_value(field)?;
        let key = parse_key(key_text.trim())?;
        let value = parse_value(value_text.trim())
            .ok_or_else(|| MalformedJson::MissingValue(key.clone()))?;
        object.insert(key, value);
    }

    Ok(object)
}

/// Quote/escape tracking shared by both scans.
#[derive(Default)]
struct Scanner {
    in_quotes: bool,
    escaped: bool,
}

impl Scanner {
    /// Advance over `ch`. Returns `true` when `ch` is structural, i.e.
    /// outside any string and not consumed by an escape.
    fn step(&mut self, ch: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        match ch {
            '\\' => {
                self.escaped = true;
                false
            }
            '"' => {
                self.in_quotes = !self.in_quotes;
                false
            }
            _ => !self.in_quotes,
        }
    }
}

fn split_fields(body: &str) -> Result<Vec<&str>, MalformedJson> {
    let mut fields = Vec::new();
    let mut scanner = Scanner::default();
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        if !scanner.step(ch) {
            continue;
        }
        match ch {
            '{' | '}' | '[' | ']' => return Err(MalformedJson::NestedValue),
            ',' => {
                fields.push(non_empty(&body[start..idx])?);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if scanner.in_quotes {
        return Err(MalformedJson::UnterminatedString);
    }
    fields.push(non_empty(&body[start..])?);
    Ok(fields)
}

fn non_empty(field: &str) -> Result<&str, MalformedJson> {
    let field = field.trim();
    if field.is_empty() {
        Err(MalformedJson::EmptyField)
    } else {
        Ok(field)
    }
}

fn split_key_value(field: &str) -> Result<(&str, &str), MalformedJson> {
    let mut scanner = Scanner::default();
    for (idx, ch) in field.char_indices() {
        if scanner.step(ch) && ch == ':' {
            return Ok((&field[..idx], &field[idx + 1..]));
        }
    }
    Err(MalformedJson::MissingColon(field.to_string()))
}

fn parse_key(text: &str) -> Result<String, MalformedJson> {
    unquote(text).ok_or_else(|| MalformedJson::UnquotedKey(text.to_string()))
}

/// Classify a value: `null`, booleans, quoted strings, integers, floats,
/// and finally the raw text as a string. `None` only for empty text.
fn parse_value(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    let value = match text {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Some(s) = unquote(text) {
                Value::String(s)
            } else if let Ok(i) = text.parse::<i64>() {
                Value::Integer(i)
            } else if let Some(f) = parse_float(text) {
                Value::Float(f)
            } else {
                Value::String(text.to_string())
            }
        }
    };
    Some(value)
}

fn parse_float(text: &str) -> Option<f64> {
    // `str::parse::<f64>` also accepts words like "inf" and "NaN".
    let numeric = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'));
    if !numeric {
        return None;
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn unquote(text: &str) -> Option<String> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        Some(unescape(&text[1..text.len() - 1]))
    } else {
        None
    }
}

/// Only `\"` and `\\` are recognised; any other backslash is kept as is.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_scalars() {
        let obj = decode(r#"{"a":1,"b":2.5,"c":"x","d":true,"e":null}"#).unwrap();

        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(obj.get("a"), Some(&Value::Integer(1)));
        assert_eq!(obj.get("b"), Some(&Value::Float(2.5)));
        assert_eq!(obj.get("c"), Some(&Value::String("x".into())));
        assert_eq!(obj.get("d"), Some(&Value::Bool(true)));
        assert_eq!(obj.get("e"), Some(&Value::Null));
    }

    #[test]
    fn test_numeric_classification() {
        let obj = decode(r#"{"i":1,"f":1.0,"neg":-3,"big":99999999999999999999,"raw":12abc}"#).unwrap();

        assert_eq!(obj.get("i"), Some(&Value::Integer(1)));
        assert_eq!(obj.get("f"), Some(&Value::Float(1.0)));
        assert_eq!(obj.get("neg"), Some(&Value::Integer(-3)));
        assert_eq!(obj.get("big"), Some(&Value::Float(1e20)));
        assert_eq!(obj.get("raw"), Some(&Value::String("12abc".into())));
    }

    #[test]
    fn test_words_are_not_floats() {
        let obj = decode(r#"{"a":NaN,"b":inf}"#).unwrap();
        assert_eq!(obj.get("a"), Some(&Value::String("NaN".into())));
        assert_eq!(obj.get("b"), Some(&Value::String("inf".into())));
    }

    #[test]
    fn test_string_unescaping() {
        let obj = decode(r#"{"s":"a\"b\\c"}"#).unwrap();
        assert_eq!(obj.get("s"), Some(&Value::String("a\"b\\c".into())));
        assert_eq!(obj.get("s").and_then(Value::as_str).map(str::len), Some(5));
    }

    #[test]
    fn test_unknown_escapes_kept_verbatim() {
        let obj = decode(r#"{"s":"tab\there"}"#).unwrap();
        assert_eq!(obj.get("s"), Some(&Value::String("tab\\there".into())));
    }

    #[test]
    fn test_separators_inside_strings() {
        let obj = decode(r#"{"a,b":"x:y, z","c":"{not nested}"}"#).unwrap();
        assert_eq!(obj.get("a,b"), Some(&Value::String("x:y, z".into())));
        assert_eq!(obj.get("c"), Some(&Value::String("{not nested}".into())));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let obj = decode("  {\n  \"a\" :  1 ,\n  \"b\":\"two\"\n}  ").unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("a"), Some(&Value::Integer(1)));
        assert_eq!(obj.get("b"), Some(&Value::String("two".into())));
    }

    #[test]
    fn test_empty_object() {
        assert!(decode("{}").unwrap().is_empty());
        assert!(decode("{   }").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_keys_last_value_first_position() {
        let obj = decode(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(obj.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(decode("[1,2]"), Err(MalformedJson::NotAnObject));
        assert_eq!(decode("\"a\""), Err(MalformedJson::NotAnObject));
        assert_eq!(decode("{"), Err(MalformedJson::NotAnObject));
        assert_eq!(decode(""), Err(MalformedJson::NotAnObject));
    }

    #[test]
    fn test_nested_values_rejected() {
        assert_eq!(decode(r#"{"a":{"b":1}}"#), Err(MalformedJson::NestedValue));
        assert_eq!(decode(r#"{"a":[1,2]}"#), Err(MalformedJson::NestedValue));
    }

    #[test]
    fn test_missing_colon() {
        assert!(matches!(decode(r#"{"a" 1}"#), Err(MalformedJson::MissingColon(_))));
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(decode(r#"{"a":1,}"#), Err(MalformedJson::EmptyField));
        assert_eq!(decode(r#"{"a":1,,"b":2}"#), Err(MalformedJson::EmptyField));
    }

    #[test]
    fn test_unquoted_key() {
        assert_eq!(decode("{a:1}"), Err(MalformedJson::UnquotedKey("a".into())));
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(decode(r#"{"a": }"#), Err(MalformedJson::MissingValue("a".into())));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(decode(r#"{"a":"open}"#), Err(MalformedJson::UnterminatedString));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MalformedJson::NotAnObject.to_string(),
            "JSON must be an object starting with { and ending with }"
        );
        assert_eq!(
            MalformedJson::MissingValue("age".into()).to_string(),
            "missing value for field \"age\""
        );
    }
}
