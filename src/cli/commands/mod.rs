//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `add`: reconcile barcodes into the library, and resolve-only lookups
//! - `check`: library manager connectivity and configuration checks

mod add;
mod check;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config;
use crate::error::ResultExt;

pub use add::{cmd_add, cmd_resolve};
pub use check::{cmd_check, cmd_config};

/// Codebarr CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "CODEBARR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Add barcodes to the library and monitor their exact release
    Add {
        /// One or more EAN/UPC barcodes, processed concurrently
        #[arg(required = true)]
        barcodes: Vec<String>,
        /// Print events as server-sent-event frames instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up a barcode in MusicBrainz without touching the library
    Resolve {
        /// EAN/UPC barcode
        barcode: String,
    },
    /// Check the library manager connection and configured defaults
    Check,
    /// Print the effective configuration
    Config,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref()).with_context("loading configuration")?;

    match &cli.command {
        Commands::Add { barcodes, json } => {
            let rt = Runtime::new()?;
            cmd_add(&rt, &config, barcodes, *json)
        }
        Commands::Resolve { barcode } => {
            let rt = Runtime::new()?;
            cmd_resolve(&rt, &config, barcode)
        }
        Commands::Check => {
            let rt = Runtime::new()?;
            cmd_check(&rt, &config)
        }
        Commands::Config => cmd_config(&config, cli.config.as_deref()),
    }
}
