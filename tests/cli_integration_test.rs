//! CLI-level tests: argument to request mapping, dry runs against temp
//! config files, and the import pipeline with mock ports.

mod common;

use common::*;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use stockgrid::adapters::memory_grid::MemoryGrid;
use stockgrid::cli::{self, Cli, Command, ImportArgs};
use stockgrid::domain::request::{AnalysisMode, SymbolInput};
use stockgrid::ports::ai_port::DisabledAi;
use clap::Parser;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// ExitCode has no PartialEq; compare through its Debug form.
fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

const VALID_INI: &str = r#"
[service]
base_url = https://data.example.com/api
timeout_secs = 10

[ai]
enabled = false

[sheet]
path = /tmp/stockgrid-test.csv
"#;

fn import_args(config: PathBuf) -> ImportArgs {
    ImportArgs {
        config,
        symbols: "AAA,BBB".into(),
        from: "2025-01-01".into(),
        to: Some("2025-01-31".into()),
        columns: "Date, Close".into(),
        start_cell: None,
        analysis: None,
        question: None,
        sheet: None,
        dry_run: true,
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn import_subcommand_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "stockgrid",
            "import",
            "--config",
            "app.ini",
            "--symbols",
            "AAA,BBB",
            "--from",
            "2025-01-01",
            "--to",
            "2025-02-01",
            "--columns",
            "Open,Close",
            "--start-cell",
            "C3",
            "--analysis",
            "custom",
            "--question",
            "Trend?",
            "--dry-run",
        ])
        .unwrap();

        let Command::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.start_cell.as_deref(), Some("C3"));
        assert_eq!(args.analysis, Some(AnalysisMode::Custom));
        assert!(args.dry_run);
    }

    #[test]
    fn unknown_analysis_mode_is_rejected() {
        let result = Cli::try_parse_from([
            "stockgrid", "import", "--config", "a.ini", "--symbols", "AAA", "--from", "2025-01-01",
            "--columns", "Close", "--analysis", "astrology",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn show_range_is_optional() {
        let cli = Cli::try_parse_from(["stockgrid", "show", "--sheet", "out.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Show { range: None, .. }));
    }
}

mod request_building {
    use super::*;

    #[test]
    fn build_request_splits_columns_and_keeps_symbols_raw() {
        let args = import_args(PathBuf::from("unused.ini"));
        let request = cli::build_request(&args);

        assert_eq!(request.symbols, SymbolInput::Delimited("AAA,BBB".into()));
        assert_eq!(request.columns, vec!["Date", "Close"]);
        assert_eq!(request.to_date, "2025-01-31");
        assert!(request.analysis.is_none());
    }

    #[test]
    fn missing_to_date_defaults_to_today() {
        let mut args = import_args(PathBuf::from("unused.ini"));
        args.to = None;
        let request = cli::build_request(&args);

        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(request.to_date, today);
    }

    #[test]
    fn analysis_carries_question() {
        let mut args = import_args(PathBuf::from("unused.ini"));
        args.analysis = Some(AnalysisMode::Custom);
        args.question = Some("Any gaps?".into());
        let request = cli::build_request(&args);

        let analysis = request.analysis.unwrap();
        assert_eq!(analysis.mode, AnalysisMode::Custom);
        assert_eq!(analysis.custom_question.as_deref(), Some("Any gaps?"));
    }
}

mod range_parsing {
    use super::*;

    #[test]
    fn parses_ranges_in_either_corner_order() {
        assert_eq!(cli::parse_range("B2:D5").unwrap(), (2, 2, 4, 3));
        assert_eq!(cli::parse_range("D5:B2").unwrap(), (2, 2, 4, 3));
        assert_eq!(cli::parse_range("c3").unwrap(), (3, 3, 1, 1));
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(cli::parse_range("B2:").is_err());
        assert!(cli::parse_range("2B").is_err());
    }
}

mod show_command {
    use super::*;

    fn small_sheet() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "Symbol,Close\nAAA,10.5\n").unwrap();
        (dir, path)
    }

    #[test]
    fn row_past_sheet_bounds_is_rejected() {
        let (_dir, path) = small_sheet();
        let exit_code = cli::run_show(&path, Some("A18446744073709551615"));
        assert!(same_code(exit_code, ExitCode::from(3)));
    }

    #[test]
    fn whole_sheet_range_is_clipped_to_used_area() {
        let (_dir, path) = small_sheet();
        let exit_code = cli::run_show(&path, Some("A1:XFD1048576"));
        assert!(same_code(exit_code, ExitCode::SUCCESS));
    }

    #[test]
    fn resolve_range_checks_both_corners() {
        let grid = MemoryGrid::with_dimensions(10, 5);
        assert_eq!(cli::resolve_range(&grid, "B2:C4").unwrap(), (2, 2, 3, 2));
        assert!(cli::resolve_range(&grid, "A1:F1").is_err());
        assert!(cli::resolve_range(&grid, "A11").is_err());
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn dry_run_valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        let exit_code = cli::run_dry_run(&import_args(PathBuf::from(file.path())));
        assert!(same_code(exit_code, ExitCode::SUCCESS));
    }

    #[test]
    fn dry_run_missing_file_is_config_error() {
        let args = import_args(PathBuf::from("/nonexistent/path/config.ini"));
        assert!(same_code(cli::run_dry_run(&args), ExitCode::from(2)));
    }

    #[test]
    fn dry_run_rejects_non_http_base_url() {
        let file = write_temp_ini("[service]\nbase_url = ftp://example.com\n[sheet]\npath = x.csv\n");
        let exit_code = cli::run_dry_run(&import_args(PathBuf::from(file.path())));
        assert!(same_code(exit_code, ExitCode::from(2)));
    }

    #[test]
    fn dry_run_missing_columns_is_validation_error() {
        let file = write_temp_ini(VALID_INI);
        let mut args = import_args(PathBuf::from(file.path()));
        args.columns = " , ".into();
        assert!(same_code(cli::run_dry_run(&args), ExitCode::from(3)));
    }

    #[test]
    fn dry_run_start_cell_outside_configured_sheet_fails() {
        let ini = format!("{VALID_INI}max_rows = 100\nmax_columns = 5\n");
        let file = write_temp_ini(&ini);
        let mut args = import_args(PathBuf::from(file.path()));

        args.start_cell = Some("A500".into());
        assert!(same_code(cli::run_dry_run(&args), ExitCode::from(3)));

        args.start_cell = Some("F1".into());
        assert!(same_code(cli::run_dry_run(&args), ExitCode::from(3)));

        args.start_cell = Some("E100".into());
        assert!(same_code(cli::run_dry_run(&args), ExitCode::SUCCESS));
    }

    #[test]
    fn dry_run_bad_start_cell_fails() {
        let file = write_temp_ini(VALID_INI);
        let mut args = import_args(PathBuf::from(file.path()));
        args.start_cell = Some("1A".into());
        assert!(same_code(cli::run_dry_run(&args), ExitCode::from(3)));
    }
}

mod pipeline_mock {
    use super::*;

    #[test]
    fn pipeline_success_exits_zero() {
        let data = MockDataPort::new().with_records("AAA", make_records(2));
        let mut grid = MemoryGrid::new();

        let exit_code =
            cli::run_import_pipeline(&sample_request("AAA,BBB"), &mut grid, &data, &DisabledAi);

        assert!(same_code(exit_code, ExitCode::SUCCESS));
        assert_eq!(grid.text(2, 1), "AAA");
        assert_eq!(grid.text(5, 1), "No data found for BBB.");
    }

    #[test]
    fn pipeline_with_fetch_failures_still_succeeds() {
        let data = MockDataPort::new().with_error("AAA", "connection refused");
        let mut grid = MemoryGrid::new();

        let exit_code =
            cli::run_import_pipeline(&sample_request("AAA"), &mut grid, &data, &DisabledAi);

        assert!(same_code(exit_code, ExitCode::SUCCESS));
        assert_eq!(grid.text(1, 1), "Error fetching data for AAA: connection refused");
    }

    #[test]
    fn pipeline_invalid_request_exits_three() {
        let data = MockDataPort::new();
        let mut grid = MemoryGrid::new();
        let request = sample_request("").with_columns(&["Close"]);

        let exit_code = cli::run_import_pipeline(&request, &mut grid, &data, &DisabledAi);

        assert!(same_code(exit_code, ExitCode::from(3)));
    }
}

mod ai_wiring {
    use super::*;
    use stockgrid::adapters::file_config_adapter::FileConfigAdapter;
    use stockgrid::ports::ai_port::AiPort;

    #[test]
    fn disabled_ai_falls_back_to_stub() {
        let config = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let ai = cli::build_ai_port(&config).unwrap();
        assert!(ai.summarize("prompt").is_err());
    }

    #[test]
    fn enabled_ai_without_model_is_config_error() {
        let config =
            FileConfigAdapter::from_string("[ai]\nenabled = true\nbase_url = https://ai.example.com\n")
                .unwrap();
        assert!(cli::build_ai_port(&config).is_err());
    }
}
