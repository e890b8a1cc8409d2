//! Plain-text rendering of a sheet range for the terminal.
//!
//! Bold cells are wrapped in `*`, italic cells in `_`.

use crate::adapters::memory_grid::MemoryGrid;
use crate::domain::cursor::column_letters;
use crate::ports::grid_port::CellStyle;

/// Longest cell text shown before truncation.
const MAX_CELL_WIDTH: usize = 40;

fn decorate(grid: &MemoryGrid, row: usize, column: usize) -> String {
    let mut text = grid.text(row, column);
    if text.chars().count() > MAX_CELL_WIDTH {
        text = text.chars().take(MAX_CELL_WIDTH - 3).collect::<String>() + "...";
    }
    if text.is_empty() {
        return text;
    }
    if grid.has_style(row, column, CellStyle::Bold) {
        text = format!("*{text}*");
    }
    if grid.has_style(row, column, CellStyle::Italic) {
        text = format!("_{text}_");
    }
    text
}

/// Render `rows` x `columns` cells starting at (row, column), clipped to
/// the sheet's used area. Nothing is rendered when the range lies wholly
/// outside it.
pub fn render_range(grid: &MemoryGrid, row: usize, column: usize, rows: usize, columns: usize) -> String {
    let (used_rows, used_columns) = grid.used_extent();
    if rows == 0 || columns == 0 || row == 0 || column == 0 {
        return String::new();
    }
    if row > used_rows || column > used_columns {
        return String::new();
    }
    let rows = rows.min(used_rows - row + 1);
    let columns = columns.min(used_columns - column + 1);

    let body: Vec<Vec<String>> = (row..row + rows)
        .map(|r| (column..column + columns).map(|c| decorate(grid, r, c)).collect())
        .collect();
    let labels: Vec<String> = (row..row + rows).map(|r| r.to_string()).collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(1);

    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            let letter = column_letters(column + i).len();
            body.iter()
                .map(|line| line[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(letter)
        })
        .collect();

    let mut output = String::new();
    output.push_str(&" ".repeat(label_width));
    for (i, width) in widths.iter().enumerate() {
        output.push_str(&format!(" | {:<width$}", column_letters(column + i), width = width));
    }
    output.push('\n');

    for (label, line) in labels.iter().zip(&body) {
        output.push_str(&format!("{:>width$}", label, width = label_width));
        for (cell, width) in line.iter().zip(&widths) {
            output.push_str(&format!(" | {:<width$}", cell, width = width));
        }
        output.push('\n');
    }
    output
}

/// Render everything from A1 to the last used cell.
pub fn render_used(grid: &MemoryGrid) -> String {
    let (rows, columns) = grid.used_extent();
    render_range(grid, 1, 1, rows, columns)
}
