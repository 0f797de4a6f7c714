//! The [Writer]: an ordered column registry bound to one output stream,
//! with the per-row evaluation and aggregation pipeline.

use std::borrow::Borrow;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::io::Write;

use csv::{IntoInnerError, WriterBuilder};

use crate::columns::{Column, ColumnKind};
use crate::datavalues::Value;
use crate::error::Error;

/// The number of rows written between informational progress messages.
const PROGRESS_NOTIFY_INCREMENT: u64 = 1_000_000;

/// Writes a sequence of objects of type `T` as a CSV table whose columns
/// are declared independently of `T`.
///
/// By default the writer uses comma separation and double quotes for field
/// escaping.
///
/// Columns are declared during a build phase and emitted in declaration
/// order, which is the sole determinant of header and cell order. Declaring
/// further columns after rows have been written is not validated and yields
/// an inconsistent table. A writer is bound to exactly one output stream
/// for its whole lifetime and never opens or closes anything itself.
pub struct Writer<T, W: Write> {
    emitter: csv::Writer<W>,
    columns: Vec<Column<T>>,
}

impl<T, W: Write> Writer<T, W> {
    /// Create a writer emitting to the given open stream.
    pub fn from_writer(writer: W) -> Self {
        Writer {
            emitter: WriterBuilder::new().double_quote(true).from_writer(writer),
            columns: Vec::new(),
        }
    }

    /// Append a declared column. Columns may repeat headers; nothing is
    /// deduplicated and declaration never fails.
    pub fn add(&mut self, column: Column<T>) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Write the header row: one cell per declared column slot, in
    /// declaration order. Does not advance any counter.
    pub fn write_header(&mut self) -> Result<(), Error> {
        let mut record = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            record.extend(column.headers()?);
        }
        log::debug!("writing header row with {} cells", record.len());
        self.emitter.write_record(&record)?;
        Ok(())
    }

    /// Write one data row for one object. The record is assembled in full
    /// before anything reaches the stream, so an evaluation, aggregation,
    /// or format failure leaves the output untouched for this row and no
    /// counter advances.
    pub fn write_row(&mut self, item: &T) -> Result<(), Error> {
        let record = self.assemble_record(item)?;
        self.emitter.write_record(&record)?;
        for column in &mut self.columns {
            column.advance();
        }
        Ok(())
    }

    /// Write one data row per object, in iteration order. Equivalent to
    /// repeated [write_row](Writer::write_row); the first failure stops the
    /// iteration.
    pub fn write_all<I>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut row_count: u64 = 0;
        for item in items {
            self.write_row(item.borrow())?;
            row_count += 1;
            if row_count % PROGRESS_NOTIFY_INCREMENT == 0 {
                log::info!("writing: processed {row_count} rows");
            }
        }
        log::debug!("finished writing: processed {row_count} rows");
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.emitter.flush()
    }

    /// Flush and return the underlying stream.
    pub fn into_inner(self) -> Result<W, IntoInnerError<csv::Writer<W>>> {
        self.emitter.into_inner()
    }

    /// Run the row pipeline for one object, producing the formatted record
    /// in declaration order.
    fn assemble_record(&self, item: &T) -> Result<Vec<String>, Error> {
        // raw cells per column; aggregators stay unresolved until their
        // group is complete
        let mut cells: Vec<Option<Vec<Value>>> = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            cells.push(match &column.kind {
                ColumnKind::Aggregator { .. } => None,
                _ => Some(column.evaluate(item)?),
            });
        }

        // aggregation is row-scoped: a group collects from every tagged
        // column regardless of declaration order, so aggregators resolve in
        // waves once all their contributors have values
        while !cells.iter().all(Option::is_some) {
            let mut resolved_any = false;
            let mut blocked_group = None;
            for index in 0..self.columns.len() {
                if cells[index].is_some() {
                    continue;
                }
                let ColumnKind::Aggregator { group, reduce, .. } = &self.columns[index].kind
                else {
                    continue;
                };
                let contributors = self
                    .columns
                    .iter()
                    .zip(cells.iter())
                    .filter(|(column, _)| column.groups.iter().any(|tag| tag == group));
                if contributors.clone().any(|(_, cell)| cell.is_none()) {
                    blocked_group = blocked_group.or(Some(group.clone()));
                    continue;
                }
                let values: Vec<Value> = contributors
                    .flat_map(|(_, cell)| cell.iter().flatten().cloned())
                    .collect();
                cells[index] = Some(vec![reduce(&values).map_err(Error::Aggregation)?]);
                resolved_any = true;
            }
            if !resolved_any {
                let group = blocked_group.unwrap_or_default();
                return Err(Error::AggregationCycle { group });
            }
        }

        let mut record = Vec::new();
        for (column, cell) in self.columns.iter().zip(cells.iter()) {
            for value in cell.iter().flatten() {
                record.push(column.format.apply(value)?);
            }
        }
        Ok(record)
    }
}

impl<T, W: Write> Debug for Writer<T, W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Writer")
            .field("emitter", &"<unspecified std::io::Write>")
            .field("columns", &self.columns)
            .finish()
    }
}
