use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use game_insights::cli::{self, Cli};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = cli::execute(cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
