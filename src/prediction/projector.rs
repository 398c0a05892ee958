//! Projection of a decoded request onto the engine's input record.

use crate::json::Object;
use crate::scoring::InputRecord;

/// Render every non-null field of `object` to text, in input order.
///
/// Null fields are dropped: the engine treats an absent field as unknown,
/// which is what an explicit null means here.
pub fn project(object: &Object) -> InputRecord {
    let mut record = InputRecord::new();
    for (key, value) in object {
        if !value.is_null() {
            record.insert(key, value.to_text());
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::decode;

    #[test]
    fn test_nulls_are_dropped() {
        let object = decode(r#"{"a":1,"b":2.5,"c":"x","d":true,"e":null}"#).unwrap();
        let record = project(&object);

        assert_eq!(record.names().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), Some("2.5"));
        assert_eq!(record.get("c"), Some("x"));
        assert_eq!(record.get("d"), Some("true"));
        assert_eq!(record.get("e"), None);
    }

    #[test]
    fn test_textual_forms() {
        let object = decode(r#"{"f":1.0,"neg":-4,"s":"say \"hi\"","raw":abc}"#).unwrap();
        let record = project(&object);

        assert_eq!(record.get("f"), Some("1.0"));
        assert_eq!(record.get("neg"), Some("-4"));
        assert_eq!(record.get("s"), Some("say \"hi\""));
        assert_eq!(record.get("raw"), Some("abc"));
    }

    #[test]
    fn test_all_null_projects_to_empty() {
        let object = decode(r#"{"a":null}"#).unwrap();
        assert!(project(&object).is_empty());
    }
}
