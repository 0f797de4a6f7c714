//! Error-handling module for the crate

use thiserror::Error;

use crate::datavalues::ValueDomain;

/// Type of errors supplied by callers, as raised by evaluator functions and
/// aggregate reductions. Such errors pass through the crate unmodified.
pub type ExternalError = Box<dyn std::error::Error + Send + Sync>;

/// Error-collection for all the possible errors occurring while writing a table
#[allow(variant_size_differences)]
#[derive(Error, Debug)]
pub enum Error {
    /// A by-name evaluator named a field the record does not have
    #[error("record has no field named \"{field}\"")]
    FieldNotFound {
        /// Name of the missing field
        field: String,
    },
    /// A caller-supplied evaluator function failed
    #[error(transparent)]
    Evaluation(ExternalError),
    /// A fan-out column's evaluator resolved to something other than a list
    #[error("column \"{header}\" expected a list but its evaluator produced a {found} value")]
    NotAList {
        /// Header (template) of the offending column
        header: String,
        /// Domain of the value that was produced instead
        found: ValueDomain,
    },
    /// A fan-out column's list held fewer elements than the declared arity
    #[error("column \"{header}\" declares {expected} cells but its list held only {actual} elements")]
    ListTooShort {
        /// Header (template) of the offending column
        header: String,
        /// Declared arity of the column
        expected: usize,
        /// Number of elements actually produced
        actual: usize,
    },
    /// A format template cannot be applied to the value's domain
    #[error("format \"{template}\" cannot be applied to a {domain} value")]
    IncompatibleFormat {
        /// The offending template text
        template: String,
        /// Domain of the value the template was applied to
        domain: ValueDomain,
    },
    /// A format template is syntactically invalid; declaration stores the
    /// template as-is, so this surfaces on its first use
    #[error("invalid format template \"{template}\": {reason}")]
    Template {
        /// The offending template text
        template: String,
        /// What is wrong with it
        reason: String,
    },
    /// An aggregate reduction function failed
    #[error(transparent)]
    Aggregation(ExternalError),
    /// Aggregators feed each other's groups in a cycle, so no evaluation
    /// order exists
    #[error("aggregation group \"{group}\" cyclically depends on its own aggregator")]
    AggregationCycle {
        /// A group involved in the cycle
        group: String,
    },
    /// CSV serialization error
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
