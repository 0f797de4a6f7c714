//! Evaluators resolve one raw value from one of the caller's objects.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::datavalues::Value;
use crate::error::{Error, ExternalError};
use crate::record::Record;

/// The resolution rule mapping an object to a raw [Value]: either a field
/// name looked up through [Record], or a caller-supplied function. The
/// variant is fixed at declaration time; by-name evaluators capture the
/// [Record] lookup when constructed, so downstream code carries no trait
/// bound on the object type.
pub struct Evaluator<T> {
    kind: EvaluatorKind<T>,
}

enum EvaluatorKind<T> {
    Field {
        name: String,
        lookup: fn(&T, &str) -> Option<Value>,
    },
    Func(Box<dyn Fn(&T) -> Result<Value, ExternalError>>),
}

impl<T> Evaluator<T> {
    /// Evaluator that looks up the named field on each object.
    pub fn field(name: impl Into<String>) -> Self
    where
        T: Record,
    {
        Evaluator {
            kind: EvaluatorKind::Field {
                name: name.into(),
                lookup: T::field,
            },
        }
    }

    /// Evaluator that applies the given function to each object.
    pub fn func<F, V>(function: F) -> Self
    where
        F: Fn(&T) -> V + 'static,
        V: Into<Value>,
    {
        Evaluator {
            kind: EvaluatorKind::Func(Box::new(move |item| Ok(function(item).into()))),
        }
    }

    /// Evaluator that applies the given fallible function to each object.
    /// Its error propagates to the row write unmodified.
    pub fn try_func<F, V, E>(function: F) -> Self
    where
        F: Fn(&T) -> Result<V, E> + 'static,
        V: Into<Value>,
        E: Into<ExternalError>,
    {
        Evaluator {
            kind: EvaluatorKind::Func(Box::new(move |item| {
                function(item).map(Into::into).map_err(Into::into)
            })),
        }
    }

    /// Resolve the raw value for one object.
    pub(crate) fn resolve(&self, item: &T) -> Result<Value, Error> {
        match &self.kind {
            EvaluatorKind::Field { name, lookup } => {
                lookup(item, name).ok_or_else(|| Error::FieldNotFound {
                    field: name.clone(),
                })
            }
            EvaluatorKind::Func(function) => function(item).map_err(Error::Evaluation),
        }
    }
}

impl<T: Record> From<&str> for Evaluator<T> {
    fn from(name: &str) -> Self {
        Evaluator::field(name)
    }
}

impl<T: Record> From<String> for Evaluator<T> {
    fn from(name: String) -> Self {
        Evaluator::field(name)
    }
}

impl<T> Debug for Evaluator<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            EvaluatorKind::Field { name, .. } => {
                f.debug_tuple("Evaluator::field").field(name).finish()
            }
            EvaluatorKind::Func(_) => f.write_str("Evaluator::func(<function>)"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use test_log::test;

    #[test]
    fn by_name_resolution() {
        let evaluator: Evaluator<serde_json::Value> = Evaluator::field("score");
        assert_eq!(
            evaluator.resolve(&json!({"score": 12})).unwrap(),
            Value::Integer(12)
        );
        assert!(matches!(
            evaluator.resolve(&json!({"grade": "A"})),
            Err(Error::FieldNotFound { field }) if field == "score"
        ));
    }

    #[test]
    fn by_function_resolution() {
        let evaluator = Evaluator::func(|n: &i64| n * 2);
        assert_eq!(evaluator.resolve(&21).unwrap(), Value::Integer(42));
    }

    #[test]
    fn function_errors_pass_through() {
        let evaluator = Evaluator::try_func(|n: &i64| {
            if *n < 0 {
                Err(format!("negative input {n}"))
            } else {
                Ok(*n)
            }
        });
        assert_eq!(evaluator.resolve(&5).unwrap(), Value::Integer(5));
        let error = evaluator.resolve(&-5).unwrap_err();
        assert!(matches!(&error, Error::Evaluation(_)));
        assert_eq!(error.to_string(), "negative input -5");
    }
}
