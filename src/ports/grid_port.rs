//! Worksheet access port (the host spreadsheet).

use crate::domain::cursor::parse_a1;
use crate::domain::error::StockgridError;
use crate::domain::record::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellStyle {
    Bold,
    Italic,
}

impl CellStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStyle::Bold => "bold",
            CellStyle::Italic => "italic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "bold" => Some(CellStyle::Bold),
            "italic" => Some(CellStyle::Italic),
            _ => None,
        }
    }
}

/// Rectangular read/write access to one sheet, 1-based coordinates.
pub trait GridPort {
    /// (max rows, max columns) of the sheet.
    fn dimensions(&self) -> (usize, usize);

    fn read_range(
        &self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> Result<Vec<Vec<CellValue>>, StockgridError>;

    /// Write a block of rows with its top-left corner at (row, column).
    /// Rows may be ragged; each is written from `column` rightwards.
    fn write_range(
        &mut self,
        row: usize,
        column: usize,
        values: &[Vec<CellValue>],
    ) -> Result<(), StockgridError>;

    fn set_style(
        &mut self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
        style: CellStyle,
    ) -> Result<(), StockgridError>;

    /// Persist pending writes. In-memory sheets have nothing to do.
    fn flush(&mut self) -> Result<(), StockgridError> {
        Ok(())
    }

    /// Resolve an A1-style address to (row, column) within the sheet.
    fn resolve_address(&self, address: &str) -> Result<(usize, usize), StockgridError> {
        let (row, column) = parse_a1(address).map_err(|e| StockgridError::CursorResolution {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        let (max_rows, max_columns) = self.dimensions();
        if row > max_rows || column > max_columns {
            return Err(StockgridError::CursorResolution {
                address: address.to_string(),
                reason: format!("outside sheet bounds ({max_rows} rows x {max_columns} columns)"),
            });
        }
        Ok((row, column))
    }
}
