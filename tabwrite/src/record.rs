//! The [Record] trait, the seam through which by-name field lookup reaches
//! the caller's objects.

use std::collections::{BTreeMap, HashMap};

use crate::datavalues::Value;

/// Trait for objects that expose their data as named fields. Implementing it
/// lets columns be declared by field name instead of by evaluator function.
///
/// Lookup is by-value: implementations hand out a fresh [Value] per call and
/// return `None` for names they do not know, which the writer reports as a
/// field-not-found error.
pub trait Record {
    /// Return the value of the field with the given name, or `None` if this
    /// record has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_object()
            .and_then(|members| members.get(name))
            .map(|member| Value::from(member.clone()))
    }
}

impl<V: Clone + Into<Value>> Record for HashMap<String, V> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

impl<V: Clone + Into<Value>> Record for BTreeMap<String, V> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use test_log::test;

    #[test]
    fn json_object_lookup() {
        let student = json!({"student_id": "abcd123", "test_1": 78.5});
        assert_eq!(
            student.field("student_id"),
            Some(Value::String("abcd123".to_string()))
        );
        assert_eq!(student.field("test_1"), Some(Value::Float(78.5)));
        assert_eq!(student.field("test_3"), None);
    }

    #[test]
    fn non_object_json_has_no_fields() {
        assert_eq!(json!([1, 2, 3]).field("0"), None);
        assert_eq!(json!(42).field("value"), None);
    }

    #[test]
    fn map_lookup() {
        let mut map = HashMap::new();
        map.insert("score".to_string(), 12_i64);
        assert_eq!(map.field("score"), Some(Value::Integer(12)));
        assert_eq!(map.field("missing"), None);
    }
}
