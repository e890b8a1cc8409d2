//! In-memory sheet used by tests and as the backing store of file sheets.

use crate::domain::error::StockgridError;
use crate::domain::record::CellValue;
use crate::ports::grid_port::{CellStyle, GridPort};
use std::collections::{BTreeMap, BTreeSet};

/// Same limits as a modern spreadsheet: 1,048,576 rows, columns A..XFD.
pub const DEFAULT_MAX_ROWS: usize = 1_048_576;
pub const DEFAULT_MAX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone)]
pub struct MemoryGrid {
    max_rows: usize,
    max_columns: usize,
    cells: BTreeMap<(usize, usize), CellValue>,
    styles: BTreeMap<(usize, usize), BTreeSet<CellStyle>>,
}

impl Default for MemoryGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_MAX_ROWS, DEFAULT_MAX_COLUMNS)
    }

    pub fn with_dimensions(max_rows: usize, max_columns: usize) -> Self {
        Self {
            max_rows,
            max_columns,
            cells: BTreeMap::new(),
            styles: BTreeMap::new(),
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> CellValue {
        self.cells.get(&(row, column)).cloned().unwrap_or_default()
    }

    /// Cell text as a sheet would display it.
    pub fn text(&self, row: usize, column: usize) -> String {
        self.cell(row, column).to_string()
    }

    /// `width` cells of one row starting at `column`.
    pub fn row_values(&self, row: usize, column: usize, width: usize) -> Vec<CellValue> {
        (column..column + width).map(|c| self.cell(row, c)).collect()
    }

    pub fn has_style(&self, row: usize, column: usize, style: CellStyle) -> bool {
        self.styles
            .get(&(row, column))
            .is_some_and(|set| set.contains(&style))
    }

    /// Every styled cell, in row-major order.
    pub fn styled_cells(&self) -> Vec<(usize, usize, CellStyle)> {
        self.styles
            .iter()
            .flat_map(|(&(r, c), set)| set.iter().map(move |&style| (r, c, style)))
            .collect()
    }

    /// Rows that hold at least one non-empty cell, ascending.
    pub fn occupied_rows(&self) -> Vec<usize> {
        let rows: BTreeSet<usize> = self
            .cells
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(&(r, _), _)| r)
            .collect();
        rows.into_iter().collect()
    }

    /// (last row, last column) holding a non-empty cell, or (0, 0).
    pub fn used_extent(&self) -> (usize, usize) {
        self.cells
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .fold((0, 0), |(mr, mc), (&(r, c), _)| (mr.max(r), mc.max(c)))
    }

    fn check_bounds(
        &self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> Result<(), StockgridError> {
        if row == 0 || column == 0 {
            return Err(StockgridError::grid("coordinates are 1-based"));
        }
        let last_row = row + rows.saturating_sub(1);
        let last_column = column + columns.saturating_sub(1);
        if last_row > self.max_rows || last_column > self.max_columns {
            return Err(StockgridError::grid(format!(
                "range at row {row}, column {column} ({rows}x{columns}) exceeds sheet bounds ({}x{})",
                self.max_rows, self.max_columns
            )));
        }
        Ok(())
    }
}

impl GridPort for MemoryGrid {
    fn dimensions(&self) -> (usize, usize) {
        (self.max_rows, self.max_columns)
    }

    fn read_range(
        &self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> Result<Vec<Vec<CellValue>>, StockgridError> {
        self.check_bounds(row, column, rows, columns)?;
        Ok((row..row + rows)
            .map(|r| self.row_values(r, column, columns))
            .collect())
    }

    fn write_range(
        &mut self,
        row: usize,
        column: usize,
        values: &[Vec<CellValue>],
    ) -> Result<(), StockgridError> {
        let width = values.iter().map(Vec::len).max().unwrap_or(0);
        self.check_bounds(row, column, values.len(), width)?;
        for (dr, line) in values.iter().enumerate() {
            for (dc, value) in line.iter().enumerate() {
                let key = (row + dr, column + dc);
                if value.is_empty() {
                    self.cells.remove(&key);
                } else {
                    self.cells.insert(key, value.clone());
                }
            }
        }
        Ok(())
    }

    fn set_style(
        &mut self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
        style: CellStyle,
    ) -> Result<(), StockgridError> {
        self.check_bounds(row, column, rows, columns)?;
        for r in row..row + rows {
            for c in column..column + columns {
                self.styles
                    .entry((r, c))
                    .or_default()
                    .insert(style);
            }
        }
        Ok(())
    }
}
