use clap::Parser;
use stockgrid::cli::{Cli, run};
use stockgrid::logging::init_tracing;

fn main() -> std::process::ExitCode {
    init_tracing();
    run(Cli::parse())
}
