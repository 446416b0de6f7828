// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `fscanary`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fscanary",
    about = "Watch directory trees and notify about (or quarantine) matching files.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Print version and copyright information, then exit.
    #[arg(long, short = 'V')]
    pub version: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides `FSCANARY_LOG` and the `logging` setting in the config.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and validate the config, print the watch rules, don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Text printed by `--version`.
pub fn version_text() -> String {
    format!(
        "fscanary {}\nCopyright (c) the fscanary authors. Licensed under the MIT license.",
        env!("CARGO_PKG_VERSION")
    )
}
