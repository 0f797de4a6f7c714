//! Declarative column definitions: the four column kinds, their header and
//! cell production, and the consuming setters used while declaring a table.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::datavalues::Value;
use crate::error::{Error, ExternalError};
use crate::format::Template;

pub mod evaluator;

use self::evaluator::Evaluator;

/// Type of reduction functions aggregating the raw values of one group.
pub type AggregateFn = Box<dyn Fn(&[Value]) -> Result<Value, ExternalError>>;

/// One declared column of a table. A column produces a fixed number of
/// header cells and, per row, the same number of data cells; the number is
/// 1 for all kinds except fan-out columns, whose arity is declared up
/// front.
///
/// Columns are immutable after declaration, with one exception: a counter
/// column's running value advances once per successfully written row.
pub struct Column<T> {
    pub(crate) kind: ColumnKind<T>,
    pub(crate) format: Template,
    pub(crate) groups: Vec<String>,
}

pub(crate) enum ColumnKind<T> {
    /// One cell per row, resolved by an evaluator.
    Plain {
        header: String,
        evaluator: Evaluator<T>,
    },
    /// One cell per row from an arithmetic progression over row numbers.
    Counter {
        header: String,
        step: i64,
        current: i64,
    },
    /// `num_items` cells per row, fanned out from a list-valued evaluator.
    Multi {
        header_template: Template,
        evaluator: Evaluator<T>,
        num_items: usize,
    },
    /// One cell per row, reducing the raw values of every column tagged
    /// with `group` in the same row.
    Aggregator {
        header: String,
        group: String,
        reduce: AggregateFn,
    },
}

impl<T> Column<T> {
    /// A column whose single cell is the evaluator's resolved value. The
    /// evaluator may be given as a field name wherever `T` implements
    /// [Record](crate::record::Record).
    pub fn plain(header: impl Into<String>, evaluator: impl Into<Evaluator<T>>) -> Self {
        Column::of(ColumnKind::Plain {
            header: header.into(),
            evaluator: evaluator.into(),
        })
    }

    /// A column counting rows: `start` for the first written row, advancing
    /// by `step` (which may be negative) for every further row. The running
    /// value wraps around on i64 overflow.
    pub fn counter(header: impl Into<String>, start: i64, step: i64) -> Self {
        Column::of(ColumnKind::Counter {
            header: header.into(),
            step,
            current: start,
        })
    }

    /// A column fanning a list-valued evaluator out into `num_items` cells.
    /// The header template is applied once per slot with the 1-based slot
    /// index; list elements beyond `num_items` are ignored, a shorter list
    /// fails the row.
    pub fn multi(
        header_template: impl Into<Template>,
        evaluator: impl Into<Evaluator<T>>,
        num_items: usize,
    ) -> Self {
        Column::of(ColumnKind::Multi {
            header_template: header_template.into(),
            evaluator: evaluator.into(),
            num_items,
        })
    }

    /// A column reducing the raw (pre-format) values of every column tagged
    /// with `group` in the same row, via the given reduction function.
    /// Built-in reductions live in [aggregates](crate::aggregates).
    pub fn aggregator<F, E>(group: impl Into<String>, header: impl Into<String>, reduce: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, E> + 'static,
        E: Into<ExternalError>,
    {
        Column::of(ColumnKind::Aggregator {
            header: header.into(),
            group: group.into(),
            reduce: Box::new(move |values| reduce(values).map_err(Into::into)),
        })
    }

    fn of(kind: ColumnKind<T>) -> Self {
        Column {
            kind,
            format: Template::default(),
            groups: Vec::new(),
        }
    }

    /// Replace the cell format template (default `{}`, the value's
    /// canonical text). Applied independently to each cell the column
    /// produces.
    pub fn format(mut self, template: impl Into<Template>) -> Self {
        self.format = template.into();
        self
    }

    /// Tag this column's raw cell value(s) into an aggregation group. May
    /// be repeated to contribute to several groups. Fan-out cells
    /// contribute individually, and an aggregator's reduced value may
    /// itself be tagged into further groups.
    pub fn aggregate_into(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Number of cells this column contributes to every row.
    pub(crate) fn arity(&self) -> usize {
        match &self.kind {
            ColumnKind::Multi { num_items, .. } => *num_items,
            _ => 1,
        }
    }

    /// Header cells, in slot order.
    pub(crate) fn headers(&self) -> Result<Vec<String>, Error> {
        match &self.kind {
            ColumnKind::Plain { header, .. }
            | ColumnKind::Counter { header, .. }
            | ColumnKind::Aggregator { header, .. } => Ok(vec![header.clone()]),
            ColumnKind::Multi {
                header_template,
                num_items,
                ..
            } => (1..=*num_items)
                .map(|slot| header_template.apply(&Value::Integer(slot as i64)))
                .collect(),
        }
    }

    /// Raw cell values for one object. Aggregator columns are resolved by
    /// the row pipeline instead, once their group is complete.
    pub(crate) fn evaluate(&self, item: &T) -> Result<Vec<Value>, Error> {
        match &self.kind {
            ColumnKind::Plain { evaluator, .. } => Ok(vec![evaluator.resolve(item)?]),
            ColumnKind::Counter { current, .. } => Ok(vec![Value::Integer(*current)]),
            ColumnKind::Multi {
                header_template,
                evaluator,
                num_items,
            } => match evaluator.resolve(item)? {
                Value::List(elements) => {
                    if elements.len() < *num_items {
                        Err(Error::ListTooShort {
                            header: header_template.raw().to_string(),
                            expected: *num_items,
                            actual: elements.len(),
                        })
                    } else {
                        Ok(elements.into_iter().take(*num_items).collect())
                    }
                }
                other => Err(Error::NotAList {
                    header: header_template.raw().to_string(),
                    found: other.domain(),
                }),
            },
            ColumnKind::Aggregator { .. } => {
                unreachable!("aggregator cells are produced by the row pipeline")
            }
        }
    }

    /// Advance a counter's running value; all other kinds are unaffected.
    pub(crate) fn advance(&mut self) {
        if let ColumnKind::Counter { step, current, .. } = &mut self.kind {
            *current = current.wrapping_add(*step);
        }
    }
}

impl<T> Debug for Column<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let kind = match &self.kind {
            ColumnKind::Plain { header, evaluator } => {
                format!("Plain({header:?}, {evaluator:?})")
            }
            ColumnKind::Counter {
                header,
                step,
                current,
            } => format!("Counter({header:?}, step {step}, at {current})"),
            ColumnKind::Multi {
                header_template,
                num_items,
                ..
            } => format!("Multi({:?} x {num_items})", header_template.raw()),
            ColumnKind::Aggregator { header, group, .. } => {
                format!("Aggregator({header:?} over {group:?})")
            }
        };
        f.debug_struct("Column")
            .field("kind", &kind)
            .field("format", &self.format.raw())
            .field("groups", &self.groups)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aggregates;
    use test_log::test;

    #[test]
    fn arities() {
        let plain = Column::plain("ID", Evaluator::func(|n: &i64| *n));
        let counter: Column<i64> = Column::counter("N", 1, 1);
        let multi = Column::multi("Task {}", Evaluator::func(|n: &i64| vec![*n]), 4);
        let aggregate: Column<i64> = Column::aggregator("g", "Total", aggregates::sum);
        assert_eq!(plain.arity(), 1);
        assert_eq!(counter.arity(), 1);
        assert_eq!(multi.arity(), 4);
        assert_eq!(aggregate.arity(), 1);
    }

    #[test]
    fn multi_headers_are_one_based() {
        let column = Column::multi("Test {}", Evaluator::func(|n: &i64| vec![*n]), 3);
        assert_eq!(column.headers().unwrap(), vec!["Test 1", "Test 2", "Test 3"]);
    }

    #[test]
    fn multi_ignores_extra_elements() {
        let column = Column::multi("V{}", Evaluator::func(|_: &i64| vec![1_i64, 2, 3, 4]), 2);
        assert_eq!(
            column.evaluate(&0).unwrap(),
            vec![Value::Integer(1), Value::Integer(2)]
        );
    }

    #[test]
    fn multi_rejects_short_lists_and_non_lists() {
        let column = Column::multi("V{}", Evaluator::func(|_: &i64| vec![1_i64]), 2);
        assert!(matches!(
            column.evaluate(&0),
            Err(Error::ListTooShort {
                expected: 2,
                actual: 1,
                ..
            })
        ));

        let column = Column::multi("V{}", Evaluator::func(|n: &i64| *n), 2);
        assert!(matches!(column.evaluate(&0), Err(Error::NotAList { .. })));
    }

    #[test]
    fn counter_advances_by_step() {
        let mut column: Column<i64> = Column::counter("N", 10, -2);
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.extend(column.evaluate(&0).unwrap());
            column.advance();
        }
        assert_eq!(
            seen,
            vec![Value::Integer(10), Value::Integer(8), Value::Integer(6)]
        );
    }

    #[test]
    fn counter_wraps_instead_of_panicking() {
        let mut column: Column<i64> = Column::counter("N", i64::MAX, 1);
        assert_eq!(column.evaluate(&0).unwrap(), vec![Value::Integer(i64::MAX)]);
        column.advance();
        assert_eq!(column.evaluate(&0).unwrap(), vec![Value::Integer(i64::MIN)]);
    }
}
