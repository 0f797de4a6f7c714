//! This module defines the dynamic [Value] type that carries raw cell data
//! through the row pipeline, and the [ValueDomain]s used to classify values
//! in error reports and format-compatibility checks.

use std::fmt::{Display, Formatter, Result as FmtResult};

use strum_macros::{Display as StrumDisplay, EnumIter};

/// Enum of the value domains distinguished by this crate. Cell values are
/// untyped as far as column declarations are concerned, but formatting and
/// aggregation need to distinguish some basic domains and treat values
/// accordingly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, StrumDisplay, EnumIter)]
pub enum ValueDomain {
    /// Domain of the single absent value.
    #[strum(serialize = "null")]
    Null,
    /// Domain of the two truth values.
    #[strum(serialize = "boolean")]
    Boolean,
    /// Domain of all signed 64bit integer numbers.
    #[strum(serialize = "integer")]
    Integer,
    /// Domain of all 64bit floating point numbers.
    #[strum(serialize = "float")]
    Float,
    /// Domain of all strings of Unicode glyphs.
    #[strum(serialize = "string")]
    String,
    /// Domain of all finite sequences of values.
    #[strum(serialize = "list")]
    List,
}

/// A single raw cell value, produced by an evaluator and consumed by
/// formatting and aggregation. Lists only occur as the resolved value of
/// fan-out columns, which unpack them into independent cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absent value; renders as the empty string.
    Null,
    /// A truth value; renders as `true` or `false`.
    Boolean(bool),
    /// A signed 64bit integer number.
    Integer(i64),
    /// A 64bit floating point number; renders as the shortest string that
    /// parses back to the same number.
    Float(f64),
    /// A string of Unicode glyphs; renders as itself.
    String(String),
    /// A finite sequence of values.
    List(Vec<Value>),
}

impl Value {
    /// Return the [ValueDomain] of this value.
    pub fn domain(&self) -> ValueDomain {
        match self {
            Value::Null => ValueDomain::Null,
            Value::Boolean(_) => ValueDomain::Boolean,
            Value::Integer(_) => ValueDomain::Integer,
            Value::Float(_) => ValueDomain::Float,
            Value::String(_) => ValueDomain::String,
            Value::List(_) => ValueDomain::List,
        }
    }

    /// Return the number this value represents, if it is in one of the
    /// numeric domains.
    pub(crate) fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Return true if this value is in one of the numeric domains.
    pub(crate) fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(d) => write!(f, "{d}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

macro_rules! value_from_integer {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::Integer(i64::from(value))
            }
        }
    )*};
}
value_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        // usize cells come from counts and indices, which fit comfortably
        Value::Integer(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(values: Vec<V>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            // objects have no domain of their own; keep their JSON text
            object @ serde_json::Value::Object(_) => Value::String(object.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;
    use test_log::test;

    #[test]
    fn canonical_text() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Integer(-42).to_string(), "-42");
        assert_eq!(Value::Float(78.5).to_string(), "78.5");
        assert_eq!(Value::Float(88.0).to_string(), "88");
        assert_eq!(Value::String("abcd123".to_string()).to_string(), "abcd123");
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::String("a".to_string())]).to_string(),
            "[1, a]"
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(7_i32), Value::Integer(7));
        assert_eq!(Value::from(0.5_f64), Value::Float(0.5));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::Integer(3));
        assert_eq!(
            Value::from(vec![1_i64, 2, 3]),
            Value::List(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ])
        );
    }

    #[test]
    fn from_json() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(12)), Value::Integer(12));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(
            Value::from(json!(["a", 1])),
            Value::List(vec![Value::String("a".to_string()), Value::Integer(1)])
        );
    }

    #[test]
    fn domains_are_disjoint() {
        let values = [
            Value::Null,
            Value::Boolean(false),
            Value::Integer(0),
            Value::Float(0.0),
            Value::String(String::new()),
            Value::List(Vec::new()),
        ];
        for (value, domain) in values.iter().zip(ValueDomain::iter()) {
            assert_eq!(value.domain(), domain);
        }
    }
}
