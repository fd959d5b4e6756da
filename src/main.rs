//! Codebarr command-line host.
//!
//! Feeds barcodes to the reconciler and prints its progress events.

use clap::Parser;
use codebarr::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so `add --json` output stays machine-readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("codebarr=info".parse()?))
        .init();

    cli::run_command(&args)
}
