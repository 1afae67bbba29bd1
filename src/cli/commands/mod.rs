//! Command implementations for the DEX reader CLI
//!
//! Each command is implemented in its own module:
//! - `parse`: concurrent parsing with reports and optional storage
//! - `grid`: inferred selection layout of a single file

pub mod grid;
pub mod parse;
pub mod shared;

pub use shared::RunSummary;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<RunSummary> {
    match args.command {
        Some(Commands::Parse(parse_args)) => parse::run_parse(parse_args).await,
        Some(Commands::Grid(grid_args)) => grid::run_grid(grid_args).await,
        None => Err(Error::configuration("No command given")),
    }
}
