//! CSV file sheet adapter.
//!
//! The sheet lives in memory while an import runs and is written back with
//! [`CsvSheetAdapter::save`]. Cell styles cannot be expressed in CSV, so
//! they go to a sidecar `<path>.styles` file, one `row,column,style` line
//! per styled cell.

use crate::adapters::memory_grid::{DEFAULT_MAX_COLUMNS, DEFAULT_MAX_ROWS, MemoryGrid};
use crate::domain::error::StockgridError;
use crate::domain::record::CellValue;
use crate::ports::config_port::ConfigPort;
use crate::ports::grid_port::{CellStyle, GridPort};
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvSheetAdapter {
    path: PathBuf,
    grid: MemoryGrid,
}

fn styles_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".styles");
    PathBuf::from(name)
}

/// A cell comes back as a number or bool only when that value prints
/// exactly as `raw`; anything else (`0700`, `1E3`) stays text.
fn parse_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    let typed = match raw {
        "TRUE" => CellValue::Bool(true),
        "FALSE" => CellValue::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => return CellValue::Text(raw.to_string()),
        },
    };
    if typed.to_string() == raw {
        typed
    } else {
        CellValue::Text(raw.to_string())
    }
}

/// `[sheet] max_rows` and `max_columns`, defaulting to the largest sheet.
pub fn sheet_dimensions(config: &dyn ConfigPort) -> (usize, usize) {
    let max_rows = config.get_int("sheet", "max_rows", DEFAULT_MAX_ROWS as i64);
    let max_columns = config.get_int("sheet", "max_columns", DEFAULT_MAX_COLUMNS as i64);
    (max_rows.max(1) as usize, max_columns.max(1) as usize)
}

impl CsvSheetAdapter {
    /// Open `path`, starting from an empty sheet if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>, max_rows: usize, max_columns: usize) -> Result<Self, StockgridError> {
        let path = path.into();
        let mut grid = MemoryGrid::with_dimensions(max_rows, max_columns);

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(content.as_bytes());
            let mut rows = Vec::new();
            for result in rdr.records() {
                let record = result.map_err(|e| StockgridError::grid(format!(
                    "CSV parse error in {}: {e}",
                    path.display()
                )))?;
                rows.push(record.iter().map(parse_cell).collect::<Vec<_>>());
            }
            if !rows.is_empty() {
                grid.write_range(1, 1, &rows)?;
            }

            let sidecar = styles_path(&path);
            if sidecar.exists() {
                for line in fs::read_to_string(&sidecar)?.lines() {
                    let mut fields = line.split(',');
                    let parsed = (
                        fields.next().and_then(|r| r.trim().parse::<usize>().ok()),
                        fields.next().and_then(|c| c.trim().parse::<usize>().ok()),
                        fields.next().and_then(CellStyle::parse),
                    );
                    match parsed {
                        (Some(r), Some(c), Some(style)) => grid.set_style(r, c, 1, 1, style)?,
                        _ => tracing::warn!(line, "ignoring malformed style line"),
                    }
                }
            }
        }

        Ok(Self { path, grid })
    }

    pub fn from_config(
        config: &dyn ConfigPort,
        path_override: Option<&Path>,
    ) -> Result<Self, StockgridError> {
        let path = match path_override {
            Some(p) => p.to_path_buf(),
            None => config
                .get_string("sheet", "path")
                .map(PathBuf::from)
                .ok_or_else(|| StockgridError::ConfigMissing {
                    section: "sheet".into(),
                    key: "path".into(),
                })?,
        };
        let (max_rows, max_columns) = sheet_dimensions(config);
        Self::open(path, max_rows, max_columns)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn grid(&self) -> &MemoryGrid {
        &self.grid
    }

    /// Write the sheet and its style sidecar back to disk.
    pub fn save(&self) -> Result<(), StockgridError> {
        let (last_row, last_column) = self.grid.used_extent();
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in 1..=last_row {
            let cells: Vec<String> = self
                .grid
                .row_values(row, 1, last_column)
                .iter()
                .map(ToString::to_string)
                .collect();
            wtr.write_record(&cells)
                .map_err(|e| StockgridError::grid(format!("CSV write error: {e}")))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| StockgridError::grid(format!("CSV write error: {e}")))?;
        fs::write(&self.path, bytes)?;

        let styles: String = self
            .grid
            .styled_cells()
            .into_iter()
            .map(|(r, c, style)| format!("{r},{c},{}\n", style.as_str()))
            .collect();
        fs::write(styles_path(&self.path), styles)?;

        tracing::info!(path = %self.path.display(), rows = last_row, "sheet saved");
        Ok(())
    }
}

impl GridPort for CsvSheetAdapter {
    fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    fn read_range(
        &self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> Result<Vec<Vec<CellValue>>, StockgridError> {
        self.grid.read_range(row, column, rows, columns)
    }

    fn write_range(
        &mut self,
        row: usize,
        column: usize,
        values: &[Vec<CellValue>],
    ) -> Result<(), StockgridError> {
        self.grid.write_range(row, column, values)
    }

    fn set_style(
        &mut self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
        style: CellStyle,
    ) -> Result<(), StockgridError> {
        self.grid.set_style(row, column, rows, columns, style)
    }

    fn flush(&mut self) -> Result<(), StockgridError> {
        self.save()
    }
}
