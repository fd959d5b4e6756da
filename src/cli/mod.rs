//! Command-line interface for codebarr.
//!
//! This module provides commands for adding barcodes to the library,
//! resolving them without side effects, and checking the configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
