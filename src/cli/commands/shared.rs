//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, input discovery and
//! progress reporting used by more than one command.

use crate::config::Config;
use crate::constants::DEX_FILE_EXTENSIONS;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Totals for one CLI run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Files that produced a read result
    pub files_parsed: usize,
    /// Files that could not be read or stored
    pub files_failed: usize,
    /// Reads whose input held no DEX segments
    pub reads_failed: usize,
    pub selections: usize,
    pub issues: usize,
    /// Reads written through a sink
    pub reads_stored: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub processing_time: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl RunSummary {
    /// Whether every input was read and parsed
    pub fn is_clean(&self) -> bool {
        self.files_failed == 0 && self.reads_failed == 0
    }
}

/// Set up structured logging at `log_level` unless `RUST_LOG` is set
pub fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dex_reader={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> env)
///
/// Command-specific flags are applied by the caller, which then validates.
pub fn load_configuration(config_file: Option<&Path>) -> Result<Config> {
    info!("Loading configuration");

    let default_config_path = if config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = config_file.or_else(|| {
        default_config_path
            .as_deref()
            .filter(|path| path.exists())
    });

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults and environment variables");
    }

    Config::load_layered(config_file)
}

/// Expand CLI inputs into an ordered, de-duplicated list of files
///
/// Each input is a file, a directory (walked recursively for DEX extensions)
/// or a glob pattern. Inputs that match nothing are an error.
pub fn resolve_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        let path = Path::new(input);
        let matched = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            discover_dex_files(path)?
        } else if is_glob_pattern(input) {
            expand_pattern(input)?
        } else {
            return Err(Error::file_not_found(input.clone()));
        };

        if matched.is_empty() {
            warn!("No DEX files found for input: {}", input);
        }

        for file in matched {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    debug!("Resolved {} input files", files.len());
    Ok(files)
}

/// Recursively find files with a DEX extension under `dir`, sorted
pub fn discover_dex_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to walk {}", dir.display()), e)
        })?;

        if entry.file_type().is_file() && has_dex_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Discovered {} DEX files in {}", files.len(), dir.display());
    Ok(files)
}

fn has_dex_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            DEX_FILE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| Error::input_pattern(pattern, e))?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable match for {}: {}", pattern, e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Create a progress bar with the standard styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
