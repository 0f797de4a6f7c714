//! Declarative CSV output for sequences of arbitrary objects.
//!
//! Columns are declared independently of the object type: plain field
//! access or derived values ([Column::plain]), running counters
//! ([Column::counter]), fan-out of list-valued fields into several columns
//! ([Column::multi]), and cross-column aggregation ([Column::aggregator]).
//! Declaration order determines header and cell order; CSV quoting and
//! escaping are delegated to the `csv` crate.
//!
//! ```
//! use tabwrite::{aggregates, Column, Evaluator, Writer};
//!
//! struct Student {
//!     student_id: &'static str,
//!     test_1: f64,
//!     test_2: f64,
//! }
//!
//! let mut writer = Writer::from_writer(Vec::new());
//! writer
//!     .add(Column::plain("ID", Evaluator::func(|s: &Student| s.student_id)))
//!     .add(
//!         Column::plain("Test 1", Evaluator::func(|s: &Student| s.test_1))
//!             .format("{:.2}")
//!             .aggregate_into("test"),
//!     )
//!     .add(
//!         Column::plain("Test 2", Evaluator::func(|s: &Student| s.test_2))
//!             .format("{:.2}")
//!             .aggregate_into("test"),
//!     )
//!     .add(Column::aggregator("test", "Average", aggregates::mean).format("{:.2}"));
//!
//! writer.write_header()?;
//! writer.write_row(&Student {
//!     student_id: "abcd123",
//!     test_1: 78.5,
//!     test_2: 88.0,
//! })?;
//!
//! let csv = String::from_utf8(writer.into_inner()?)?;
//! assert_eq!(csv, "ID,Test 1,Test 2,Average\nabcd123,78.50,88.00,83.25\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Objects that implement [Record] can declare columns by field name
//! instead of by function; an implementation for `serde_json::Value` is
//! provided.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

pub mod aggregates;
pub mod columns;
pub mod datavalues;
pub mod error;
pub mod format;
pub mod record;
pub mod writer;

pub use columns::evaluator::Evaluator;
pub use columns::Column;
pub use datavalues::{Value, ValueDomain};
pub use error::Error;
pub use format::Template;
pub use record::Record;
pub use writer::Writer;
