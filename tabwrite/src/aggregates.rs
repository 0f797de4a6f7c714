//! Built-in reduction functions for aggregator columns.
//!
//! Each function has the shape expected by
//! [Column::aggregator](crate::columns::Column::aggregator) and operates on
//! the raw (pre-format) values of its group. Callers are free to supply
//! their own reductions instead; errors pass through the writer unmodified.

use thiserror::Error;

use crate::datavalues::{Value, ValueDomain};

/// Errors raised by the built-in reductions.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The reduction is undefined on an empty group
    #[error("cannot compute the {function} of an empty group")]
    EmptyGroup {
        /// Name of the reduction
        function: &'static str,
    },
    /// The group contains a value outside the numeric domains
    #[error("cannot include a {domain} value in a {function}")]
    NonNumeric {
        /// Name of the reduction
        function: &'static str,
        /// Domain of the offending value
        domain: ValueDomain,
    },
}

fn numbers(function: &'static str, values: &[Value]) -> Result<Vec<f64>, AggregateError> {
    values
        .iter()
        .map(|value| {
            value.to_f64().ok_or(AggregateError::NonNumeric {
                function,
                domain: value.domain(),
            })
        })
        .collect()
}

/// Sum of a numeric group. The empty sum is integer zero; the result stays
/// an integer unless the group contains a float or the sum leaves the i64
/// range.
pub fn sum(values: &[Value]) -> Result<Value, AggregateError> {
    numbers("sum", values)?;

    let mut integral: i128 = 0;
    let mut all_integers = true;
    for value in values {
        match value {
            Value::Integer(i) => integral += i128::from(*i),
            _ => all_integers = false,
        }
    }
    if all_integers {
        return Ok(match i64::try_from(integral) {
            Ok(total) => Value::Integer(total),
            Err(_) => Value::Float(integral as f64),
        });
    }

    let total = values.iter().filter_map(Value::to_f64).sum();
    Ok(Value::Float(total))
}

/// Arithmetic mean of a non-empty numeric group.
pub fn mean(values: &[Value]) -> Result<Value, AggregateError> {
    let numbers = numbers("mean", values)?;
    if numbers.is_empty() {
        return Err(AggregateError::EmptyGroup { function: "mean" });
    }
    let total: f64 = numbers.iter().sum();
    Ok(Value::Float(total / numbers.len() as f64))
}

/// Smallest value of a non-empty numeric group, returned as it appeared in
/// the group.
pub fn min(values: &[Value]) -> Result<Value, AggregateError> {
    extremum("minimum", values, |candidate, best| candidate < best)
}

/// Largest value of a non-empty numeric group, returned as it appeared in
/// the group.
pub fn max(values: &[Value]) -> Result<Value, AggregateError> {
    extremum("maximum", values, |candidate, best| candidate > best)
}

fn extremum(
    function: &'static str,
    values: &[Value],
    better: impl Fn(f64, f64) -> bool,
) -> Result<Value, AggregateError> {
    let numbers = numbers(function, values)?;
    let mut best: Option<usize> = None;
    for (index, &number) in numbers.iter().enumerate() {
        match best {
            Some(so_far) if !better(number, numbers[so_far]) => {}
            _ => best = Some(index),
        }
    }
    match best {
        Some(index) => Ok(values[index].clone()),
        None => Err(AggregateError::EmptyGroup { function }),
    }
}

/// Number of values in the group. Defined for every domain and never fails.
pub fn count(values: &[Value]) -> Result<Value, AggregateError> {
    Ok(Value::Integer(values.len() as i64))
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    fn group(values: &[f64]) -> Vec<Value> {
        values.iter().map(|&f| Value::Float(f)).collect()
    }

    #[test]
    fn sum_stays_integral_when_it_can() {
        let values = vec![Value::Integer(2), Value::Integer(40)];
        assert_eq!(sum(&values).unwrap(), Value::Integer(42));
        let values = vec![Value::Integer(2), Value::Float(0.5)];
        assert_eq!(sum(&values).unwrap(), Value::Float(2.5));
        assert_eq!(sum(&[]).unwrap(), Value::Integer(0));
    }

    #[test]
    fn sum_survives_i64_overflow() {
        let values = vec![Value::Integer(i64::MAX), Value::Integer(i64::MAX)];
        assert_eq!(
            sum(&values).unwrap(),
            Value::Float(i64::MAX as f64 + i64::MAX as f64)
        );
    }

    #[test]
    fn mean_of_tests() {
        assert_eq!(mean(&group(&[78.5, 88.0])).unwrap(), Value::Float(83.25));
        assert_eq!(
            mean(&[]).unwrap_err(),
            AggregateError::EmptyGroup { function: "mean" }
        );
    }

    #[test]
    fn extrema_return_group_members() {
        let values = vec![Value::Integer(3), Value::Float(1.5), Value::Integer(7)];
        assert_eq!(min(&values).unwrap(), Value::Float(1.5));
        assert_eq!(max(&values).unwrap(), Value::Integer(7));
        assert!(matches!(
            min(&[]),
            Err(AggregateError::EmptyGroup {
                function: "minimum"
            })
        ));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let values = vec![Value::Integer(1), Value::String("two".to_string())];
        assert_eq!(
            mean(&values).unwrap_err(),
            AggregateError::NonNumeric {
                function: "mean",
                domain: ValueDomain::String
            }
        );
    }

    #[test]
    fn count_is_total() {
        let values = vec![Value::Null, Value::Boolean(true), Value::Integer(1)];
        assert_eq!(count(&values).unwrap(), Value::Integer(3));
    }
}
