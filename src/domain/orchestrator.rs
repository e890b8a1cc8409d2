//! Fetch orchestration: one fetch per symbol, in order, with per-symbol
//! fault isolation, feeding the layout engine.

use crate::domain::cursor::WriteCursor;
use crate::domain::error::StockgridError;
use crate::domain::layout::LayoutEngine;
use crate::domain::prompt::build_prompt;
use crate::domain::record::{FetchOutcome, OutcomeKind, SymbolRecord};
use crate::domain::report::ImportReport;
use crate::domain::request::{AnalysisRequest, DateRange, ImportRequest};
use crate::ports::ai_port::AiPort;
use crate::ports::data_port::DataPort;
use crate::ports::grid_port::GridPort;

/// Where one symbol's block landed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub symbol: String,
    pub start: WriteCursor,
    pub outcome: OutcomeKind,
    pub annotated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub blocks: Vec<PlacedBlock>,
    pub analysis: Option<String>,
    /// Cursor after the last block.
    pub end: WriteCursor,
}

impl RunSummary {
    pub fn count(&self, outcome: OutcomeKind) -> usize {
        self.blocks.iter().filter(|b| b.outcome == outcome).count()
    }

    pub fn message(&self) -> String {
        let mut message = format!(
            "Imported {} symbol(s): {} with data, {} empty, {} failed.",
            self.blocks.len(),
            self.count(OutcomeKind::Data),
            self.count(OutcomeKind::Empty),
            self.count(OutcomeKind::Failure),
        );
        if let Some(block) = self.blocks.iter().find(|b| b.annotated) {
            message.push_str(&format!(" Analysis added for {}.", block.symbol));
        }
        message
    }
}

/// Classify one fetch attempt.
pub fn classify(result: Result<Vec<SymbolRecord>, StockgridError>) -> FetchOutcome {
    match result {
        Ok(records) => FetchOutcome::from_records(records),
        Err(e) => FetchOutcome::Failure(e.failure_text()),
    }
}

/// Run an import and always produce a report.
pub fn run_import(
    request: &ImportRequest,
    grid: &mut dyn GridPort,
    data: &dyn DataPort,
    ai: &dyn AiPort,
) -> ImportReport {
    match execute(request, grid, data, ai) {
        Ok(summary) => {
            let single = if summary.blocks.len() == 1 {
                summary.analysis.clone()
            } else {
                None
            };
            ImportReport::success(summary.message(), single)
        }
        Err(e) => {
            tracing::warn!(error = %e, "import aborted");
            ImportReport::failure(&e)
        }
    }
}

/// Run an import and persist the sheet afterwards. A failed save turns the
/// report into a failure even though the blocks were laid out.
pub fn import_and_save(
    request: &ImportRequest,
    grid: &mut dyn GridPort,
    data: &dyn DataPort,
    ai: &dyn AiPort,
) -> ImportReport {
    let report = run_import(request, grid, data, ai);
    if !report.success {
        return report;
    }
    match grid.flush() {
        Ok(()) => report,
        Err(e) => {
            tracing::error!(error = %e, "failed to save sheet");
            ImportReport::failure(&e)
        }
    }
}

/// Validate, resolve the start cell, then fetch and place each symbol.
///
/// Only validation, start-cell resolution, and sheet write errors are
/// returned; fetch and analysis failures end up in the sheet.
pub fn execute(
    request: &ImportRequest,
    grid: &mut dyn GridPort,
    data: &dyn DataPort,
    ai: &dyn AiPort,
) -> Result<RunSummary, StockgridError> {
    let symbols = request.validate()?;
    let columns = request.requested_columns();
    let range = request.date_range();

    let mut cursor = match request.start_cell.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => {
            let (row, column) = grid.resolve_address(address)?;
            WriteCursor::new(row, column)
        }
        _ => WriteCursor::ORIGIN,
    };

    tracing::info!(
        symbols = symbols.len(),
        range = %range,
        start = %cursor,
        "starting import"
    );

    let mut summary = RunSummary::default();
    let mut engine = LayoutEngine::new(grid);

    for (index, symbol) in symbols.iter().enumerate() {
        let outcome = classify(data.fetch_series(symbol, &range, &columns));
        if let FetchOutcome::Failure(reason) = &outcome {
            tracing::warn!(symbol = %symbol, reason = %reason, "fetch failed");
        }

        let annotation = match (&request.analysis, index) {
            (Some(analysis), 0) => analyze(ai, symbol, &range, &outcome, analysis),
            _ => None,
        };

        let start = cursor;
        cursor = engine.place(&outcome, symbol, cursor, annotation.as_deref())?;
        summary.blocks.push(PlacedBlock {
            symbol: symbol.clone(),
            start,
            outcome: outcome.kind(),
            annotated: annotation.is_some(),
        });
        if annotation.is_some() {
            summary.analysis = annotation;
        }
    }

    summary.end = cursor;
    tracing::info!(
        blocks = summary.blocks.len(),
        failed = summary.count(OutcomeKind::Failure),
        "import finished"
    );
    Ok(summary)
}

/// Annotation text for a block, or `None` when the block has no data.
fn analyze(
    ai: &dyn AiPort,
    symbol: &str,
    range: &DateRange,
    outcome: &FetchOutcome,
    analysis: &AnalysisRequest,
) -> Option<String> {
    let records = outcome.records()?;
    let prompt = build_prompt(symbol, range, records, analysis);
    match ai.summarize(&prompt) {
        Ok(text) => Some(text.trim().to_string()),
        Err(e) => {
            tracing::warn!(symbol, error = %e, "analysis failed");
            Some(format!("Error generating analysis: {}", e.failure_text()))
        }
    }
}
