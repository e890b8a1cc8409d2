//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_sheet_adapter::{CsvSheetAdapter, sheet_dimensions};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_ai_adapter::HttpAiAdapter;
use crate::adapters::http_data_adapter::{HttpDataAdapter, series_url};
use crate::adapters::memory_grid::{DEFAULT_MAX_COLUMNS, DEFAULT_MAX_ROWS, MemoryGrid};
use crate::adapters::sheet_view;
use crate::domain::config_validation::validate_service_config;
use crate::domain::cursor::parse_a1;
use crate::domain::error::StockgridError;
use crate::domain::orchestrator::import_and_save;
use crate::domain::prompt::build_prompt;
use crate::domain::report::ImportReport;
use crate::domain::request::{AnalysisMode, AnalysisRequest, ImportRequest, SymbolInput};
use crate::ports::ai_port::{AiPort, DisabledAi};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::grid_port::GridPort;

#[derive(Parser, Debug)]
#[command(name = "stockgrid", about = "Import stock time series into a sheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Comma-separated ticker symbols
    #[arg(long)]
    pub symbols: String,
    #[arg(long)]
    pub from: String,
    /// Defaults to today
    #[arg(long)]
    pub to: Option<String>,
    /// Comma-separated column names
    #[arg(long)]
    pub columns: String,
    #[arg(long)]
    pub start_cell: Option<String>,
    #[arg(long)]
    pub analysis: Option<AnalysisMode>,
    /// Question for --analysis custom
    #[arg(long)]
    pub question: Option<String>,
    /// Sheet CSV file, overriding [sheet] path
    #[arg(long)]
    pub sheet: Option<PathBuf>,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch symbols and lay them out in the sheet
    Import(ImportArgs),
    /// Print sheet contents
    Show {
        #[arg(long)]
        sheet: PathBuf,
        /// Range such as A1:F20; defaults to the used area
        #[arg(long)]
        range: Option<String>,
    },
    /// Start the HTTP entry point
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Import(args) => {
            if args.dry_run {
                run_dry_run(&args)
            } else {
                run_import_command(&args)
            }
        }
        Command::Show { sheet, range } => run_show(&sheet, range.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn load_validated_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let config = load_config(path)?;
    if let Err(e) = validate_service_config(&config) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(config)
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_request(args: &ImportArgs) -> ImportRequest {
    let to_date = args
        .to
        .clone()
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
    let analysis = args.analysis.map(|mode| AnalysisRequest {
        mode,
        custom_question: args.question.clone(),
    });
    ImportRequest {
        symbols: SymbolInput::Delimited(args.symbols.clone()),
        from_date: args.from.clone(),
        to_date,
        columns: split_csv(&args.columns),
        start_cell: args.start_cell.clone(),
        analysis,
    }
}

pub fn build_ai_port(config: &dyn ConfigPort) -> Result<Box<dyn AiPort>, StockgridError> {
    Ok(match HttpAiAdapter::from_config(config)? {
        Some(adapter) => Box::new(adapter),
        None => Box::new(DisabledAi),
    })
}

fn run_import_command(args: &ImportArgs) -> ExitCode {
    let config = match load_validated_config(&args.config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = build_request(args);

    let mut sheet = match CsvSheetAdapter::from_config(&config, args.sheet.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match HttpDataAdapter::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let ai_port = match build_ai_port(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Writing to sheet {}", sheet.path().display());
    run_import_pipeline(&request, &mut sheet, &data_port, ai_port.as_ref())
}

/// Run an import against the given ports and report on stderr/stdout.
pub fn run_import_pipeline(
    request: &ImportRequest,
    sheet: &mut dyn GridPort,
    data_port: &dyn DataPort,
    ai_port: &dyn AiPort,
) -> ExitCode {
    let report = import_and_save(request, sheet, data_port, ai_port);
    print_report(&report)
}

fn print_report(report: &ImportReport) -> ExitCode {
    if !report.success {
        eprintln!("error: {}", report.message);
        return ExitCode::from(3);
    }
    eprintln!("{}", report.message);
    if let Some(analysis) = &report.single_symbol_analysis {
        println!("{analysis}");
    }
    ExitCode::SUCCESS
}

pub fn run_dry_run(args: &ImportArgs) -> ExitCode {
    let config = match load_validated_config(&args.config) {
        Ok(c) => c,
        Err(code) => return code,
    };
    eprintln!("Config validated successfully");

    let request = build_request(args);
    let symbols = match request.validate() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(cell) = request.start_cell.as_deref().map(str::trim) {
        if !cell.is_empty() {
            let (max_rows, max_columns) = sheet_dimensions(&config);
            let sheet = MemoryGrid::with_dimensions(max_rows, max_columns);
            if let Err(e) = sheet.resolve_address(cell) {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    let base_url = config.get_string("service", "base_url").unwrap_or_default();
    let range = request.date_range();
    let columns = request.requested_columns();

    eprintln!("\nRequests ({} symbols, {}):", symbols.len(), range);
    for symbol in &symbols {
        println!("{}", series_url(&base_url, symbol, &range, &columns));
    }

    if let Some(analysis) = &request.analysis {
        let prompt = build_prompt(&symbols[0], &range, &[], analysis);
        let ai_enabled = config.get_bool("ai", "enabled", false);
        eprintln!(
            "\nAnalysis ({}) for {}{}:",
            analysis.mode,
            symbols[0],
            if ai_enabled { "" } else { " [ai disabled]" }
        );
        eprintln!("{}", prompt.lines().next().unwrap_or_default());
    }

    eprintln!("\nDry run complete: request is valid");
    ExitCode::SUCCESS
}

pub fn run_show(sheet_path: &Path, range: Option<&str>) -> ExitCode {
    let sheet = match CsvSheetAdapter::open(
        sheet_path,
        DEFAULT_MAX_ROWS,
        DEFAULT_MAX_COLUMNS,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let output = match range {
        None => sheet_view::render_used(sheet.grid()),
        Some(range) => match resolve_range(&sheet, range) {
            Ok((row, column, rows, columns)) => {
                sheet_view::render_range(sheet.grid(), row, column, rows, columns)
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    if output.is_empty() {
        eprintln!("Nothing to show in {}", sheet_path.display());
    } else {
        print!("{output}");
    }
    ExitCode::SUCCESS
}

/// `A1:C5` → (row, column, rows, columns). A single cell is a 1x1 range.
/// Corners are not bounds-checked; see [`resolve_range`].
pub fn parse_range(range: &str) -> Result<(usize, usize, usize, usize), StockgridError> {
    let invalid = |reason: String| StockgridError::CursorResolution {
        address: range.to_string(),
        reason,
    };
    let (first, second) = split_range(range);
    let (r1, c1) = parse_a1(first).map_err(|e| invalid(e.to_string()))?;
    let (r2, c2) = match second {
        Some(second) => parse_a1(second).map_err(|e| invalid(e.to_string()))?,
        None => (r1, c1),
    };
    Ok(span(r1, c1, r2, c2))
}

/// Like [`parse_range`], with both corners resolved against the sheet's
/// dimensions.
pub fn resolve_range(
    grid: &dyn GridPort,
    range: &str,
) -> Result<(usize, usize, usize, usize), StockgridError> {
    let (first, second) = split_range(range);
    let (r1, c1) = grid.resolve_address(first)?;
    let (r2, c2) = match second {
        Some(second) => grid.resolve_address(second)?,
        None => (r1, c1),
    };
    Ok(span(r1, c1, r2, c2))
}

fn split_range(range: &str) -> (&str, Option<&str>) {
    let mut parts = range.splitn(2, ':');
    (parts.next().unwrap_or_default(), parts.next())
}

fn span(r1: usize, c1: usize, r2: usize, c2: usize) -> (usize, usize, usize, usize) {
    let (top, bottom) = (r1.min(r2), r1.max(r2));
    let (left, right) = (c1.min(c2), c1.max(c2));
    (top, left, bottom - top + 1, right - left + 1)
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let config = match load_validated_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let sheet = match CsvSheetAdapter::from_config(&config, None) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let data_port = match HttpDataAdapter::from_config(&config) {
            Ok(a) => Arc::new(a),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let ai_port: Arc<dyn AiPort + Send + Sync> = match HttpAiAdapter::from_config(&config) {
            Ok(Some(a)) => Arc::new(a),
            Ok(None) => Arc::new(DisabledAi),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(_) => {
                let err = StockgridError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("invalid socket address {listen:?}"),
                };
                eprintln!("error: {err}");
                return (&err).into();
            }
        };

        eprintln!("Starting web server on {}", addr);

        let state = AppState::new(Box::new(sheet), data_port, ai_port);
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to start runtime: {e}");
                return ExitCode::from(1);
            }
        };
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(1)
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
