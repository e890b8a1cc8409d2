//! Layout engine: turns fetch outcomes into vertically stacked sheet blocks.
//!
//! Every block starts at the cursor column and ends with one blank separator
//! row. A data block is a bold header row (`Symbol` plus the first record's
//! keys), one row per record, and an optional italic annotation row directly
//! beneath the data. Empty and failed symbols get a single message cell.

use crate::domain::cursor::WriteCursor;
use crate::domain::error::StockgridError;
use crate::domain::record::{CellValue, FetchOutcome, SymbolRecord};
use crate::ports::grid_port::{CellStyle, GridPort};

pub const SYMBOL_HEADER: &str = "Symbol";

pub fn no_data_message(symbol: &str) -> String {
    format!("No data found for {symbol}.")
}

pub fn failure_message(symbol: &str, reason: &str) -> String {
    format!("Error fetching data for {symbol}: {reason}")
}

/// `["Symbol", ...keys of the first record]`, in first-seen order.
pub fn header_for(records: &[SymbolRecord]) -> Vec<String> {
    let mut header = vec![SYMBOL_HEADER.to_string()];
    if let Some(first) = records.first() {
        header.extend(
            first
                .keys()
                .filter(|k| *k != SYMBOL_HEADER)
                .map(str::to_string),
        );
    }
    header
}

/// One row per record, aligned to `header`. Keys missing from a record are
/// padded with an empty cell; keys absent from the header are dropped.
pub fn data_rows(symbol: &str, header: &[String], records: &[SymbolRecord]) -> Vec<Vec<CellValue>> {
    records
        .iter()
        .map(|record| {
            let mut row = Vec::with_capacity(header.len());
            row.push(CellValue::from(symbol));
            row.extend(
                header
                    .iter()
                    .skip(1)
                    .map(|key| record.get(key).cloned().unwrap_or_default()),
            );
            row
        })
        .collect()
}

/// Rows a block consumes, separator included.
pub fn block_height(outcome: &FetchOutcome, annotated: bool) -> usize {
    let body = match outcome {
        FetchOutcome::Data(records) => 1 + records.len(),
        FetchOutcome::Empty | FetchOutcome::Failure(_) => 1,
    };
    body + usize::from(annotated) + 1
}

pub struct LayoutEngine<'a> {
    grid: &'a mut dyn GridPort,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(grid: &'a mut dyn GridPort) -> Self {
        Self { grid }
    }

    /// Write one symbol's block at `cursor` and return where the next block starts.
    pub fn place(
        &mut self,
        outcome: &FetchOutcome,
        symbol: &str,
        cursor: WriteCursor,
        annotation: Option<&str>,
    ) -> Result<WriteCursor, StockgridError> {
        let mut next = match outcome {
            FetchOutcome::Empty => {
                self.write_message(cursor, no_data_message(symbol))?;
                cursor.advance(1)
            }
            FetchOutcome::Failure(reason) => {
                self.write_message(cursor, failure_message(symbol, reason))?;
                cursor.advance(1)
            }
            FetchOutcome::Data(records) => self.write_table(symbol, records, cursor)?,
        };

        if let Some(text) = annotation {
            self.grid
                .write_range(next.row, next.column, &[vec![CellValue::from(text)]])?;
            self.grid
                .set_style(next.row, next.column, 1, 1, CellStyle::Italic)?;
            next = next.advance(1);
        }

        tracing::debug!(
            symbol,
            outcome = %outcome.kind(),
            start = %cursor,
            next = %next.advance(1),
            "placed block"
        );
        Ok(next.advance(1))
    }

    fn write_message(&mut self, cursor: WriteCursor, text: String) -> Result<(), StockgridError> {
        self.grid
            .write_range(cursor.row, cursor.column, &[vec![CellValue::Text(text)]])
    }

    fn write_table(
        &mut self,
        symbol: &str,
        records: &[SymbolRecord],
        cursor: WriteCursor,
    ) -> Result<WriteCursor, StockgridError> {
        let header = header_for(records);
        let header_cells: Vec<CellValue> = header.iter().map(|h| CellValue::from(h.as_str())).collect();
        self.grid
            .write_range(cursor.row, cursor.column, &[header_cells])?;
        self.grid
            .set_style(cursor.row, cursor.column, 1, header.len(), CellStyle::Bold)?;

        let rows = data_rows(symbol, &header, records);
        if !rows.is_empty() {
            self.grid
                .write_range(cursor.row + 1, cursor.column, &rows)?;
        }
        Ok(cursor.advance(1 + rows.len()))
    }
}
