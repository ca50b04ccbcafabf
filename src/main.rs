use clap::Parser;
use clean_folder::cli::{Cli, run_cli};
use clean_folder::output::OutputFormatter;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    if let Err(e) = run_cli(&config) {
        OutputFormatter::error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `--verbose` when both are given.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "clean_folder=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
