//! Command-line argument definitions for the DEX reader
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::services::persistence::StoreFormat;
use crate::constants::MAX_WORKERS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the DEX audit file reader
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dex-reader",
    version,
    about = "Parse vending-machine DEX audit files into structured records",
    long_about = "Reads DEX/UCS audit exports from vending machines, resolves the manufacturer \
                  dialect, consolidates product activity per selection and infers the physical \
                  row/column layout of the machine. Results can be printed or stored as JSON \
                  documents or Parquet tables."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse one or more DEX files and report the results
    Parse(ParseArgs),
    /// Show the inferred selection grid of a single DEX file
    Grid(GridArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Files, directories or glob patterns to parse
    ///
    /// Directories are walked recursively and files with a .dex, .txt or .dat
    /// extension are picked up. Patterns such as "audits/*.dex" are expanded.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Number of columns per row, used for flat selection numbering
    #[arg(long = "columns", value_name = "COUNT")]
    pub columns: Option<u32>,

    /// Device identifier recorded with stored reads
    #[arg(long = "device", value_name = "ID")]
    pub device: Option<String>,

    /// Directory to store read results in
    #[arg(long = "store-dir", value_name = "PATH")]
    pub store_dir: Option<PathBuf>,

    /// Format of stored read results
    #[arg(long = "store-format", value_enum, value_name = "FORMAT")]
    pub store_format: Option<StoreFormat>,

    /// Output format for results
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Path to configuration file (TOML format)
    ///
    /// If not specified, looks for <config_dir>/dex-reader/config.toml
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Number of files parsed concurrently (0 = number of CPUs)
    #[arg(short = 'j', long = "workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// List every issue instead of per-kind counts
    #[arg(long = "show-issues")]
    pub show_issues: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the grid command
#[derive(Debug, Clone, Parser)]
pub struct GridArgs {
    /// DEX file to analyze
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Number of columns per row, used for flat selection numbering
    #[arg(long = "columns", value_name = "COUNT")]
    pub columns: Option<u32>,

    /// Path to configuration file (TOML format)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Map verbosity flags to a tracing level
fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn validate_config_file(config_file: Option<&PathBuf>) -> Result<()> {
    if let Some(config_file) = config_file {
        if !config_file.exists() {
            return Err(Error::configuration(format!(
                "Config file does not exist: {}",
                config_file.display()
            )));
        }
    }
    Ok(())
}

fn validate_columns(columns: Option<u32>) -> Result<()> {
    if columns == Some(0) {
        return Err(Error::configuration(
            "Column count must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

impl ParseArgs {
    /// Validate the parse command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_columns(self.columns)?;

        if let Some(workers) = self.workers {
            if workers > MAX_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_WORKERS
                )));
            }
        }

        if let Some(device) = &self.device {
            if device.trim().is_empty() {
                return Err(Error::configuration(
                    "Device identifier cannot be empty".to_string(),
                ));
            }
        }

        validate_config_file(self.config_file.as_ref())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Check if we should show progress bars (not in quiet mode, not for JSON)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Human
    }
}

impl GridArgs {
    /// Validate the grid command arguments
    pub fn validate(&self) -> Result<()> {
        validate_columns(self.columns)?;

        if !self.input.is_file() {
            return Err(Error::file_not_found(self.input.display().to_string()));
        }

        validate_config_file(self.config_file.as_ref())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }
}
