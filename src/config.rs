//! Configuration management and validation.
//!
//! Configuration is layered: built-in defaults, then a TOML file, then
//! environment variables, then command-line flags (applied by the CLI). The
//! result is validated once all layers are in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::app::models::Dialect;
use crate::app::services::dex_parser::ParseOptions;
use crate::app::services::persistence::StoreFormat;
use crate::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_FIELD_DELIMITER, DEFAULT_IDENTIFICATION_SCAN_LIMIT,
    DEFAULT_WORKERS, ENV_COLUMN_HINT, ENV_STORE_DIR, ENV_WORKERS, MAX_WORKERS,
};
use crate::{Error, Result};

/// Parsing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Known column count for flat selection numbering
    pub column_hint: Option<u32>,

    /// Element separator
    pub delimiter: char,

    /// Leading lines searched for a manufacturer code
    pub identification_scan_limit: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            column_hint: None,
            delimiter: DEFAULT_FIELD_DELIMITER,
            identification_scan_limit: DEFAULT_IDENTIFICATION_SCAN_LIMIT,
        }
    }
}

/// Manufacturer codes added on top of the built-in table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Code prefix to dialect name, e.g. `VEN = "dixie_narco"`
    pub aliases: BTreeMap<String, String>,
}

/// Result storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for stored reads; nothing is stored when unset
    pub store_dir: Option<PathBuf>,

    pub store_format: StoreFormat,
}

/// Concurrency settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Files parsed concurrently (0 = number of CPUs)
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Complete configuration for the DEX reader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parsing: ParsingConfig,
    pub dialects: DialectConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

impl Config {
    /// `<config_dir>/dex-reader/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine the user configuration directory")
        })?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load a configuration file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path.display().to_string())
            } else {
                Error::io(format!("Failed to read config file {}", path.display()), e)
            }
        })?;

        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse TOML text; `origin` names the source in errors
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config_parse(origin, e))
    }

    /// Defaults, then the optional file, then process environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_COLUMN_HINT) {
            let columns = value.trim().parse::<u32>().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_COLUMN_HINT, value
                ))
            })?;
            self.parsing.column_hint = Some(columns);
        }

        if let Some(value) = lookup(ENV_WORKERS) {
            self.processing.workers = value.trim().parse::<usize>().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_WORKERS, value
                ))
            })?;
        }

        if let Some(value) = lookup(ENV_STORE_DIR) {
            if !value.trim().is_empty() {
                self.output.store_dir = Some(PathBuf::from(value.trim()));
            }
        }

        Ok(())
    }

    /// Check the combined configuration
    pub fn validate(&self) -> Result<()> {
        if self.parsing.column_hint == Some(0) {
            return Err(Error::configuration("Column hint must be at least 1"));
        }

        let delimiter = self.parsing.delimiter;
        if delimiter.is_alphanumeric() || delimiter.is_whitespace() {
            return Err(Error::configuration(format!(
                "Invalid field delimiter '{}': must be a punctuation character",
                delimiter
            )));
        }

        if self.parsing.identification_scan_limit == 0 {
            return Err(Error::configuration(
                "Identification scan limit must be at least 1 line",
            ));
        }

        if self.processing.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Worker count {} exceeds the maximum of {}",
                self.processing.workers, MAX_WORKERS
            )));
        }

        self.manufacturer_aliases()?;
        Ok(())
    }

    /// Configured aliases with resolved dialects
    pub fn manufacturer_aliases(&self) -> Result<Vec<(String, Dialect)>> {
        self.dialects
            .aliases
            .iter()
            .map(|(code, dialect)| {
                if code.trim().is_empty() || !code.trim().chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(Error::configuration(format!(
                        "Manufacturer alias '{}' must be alphabetic",
                        code
                    )));
                }
                Ok((code.trim().to_uppercase(), Dialect::from_str(dialect)?))
            })
            .collect()
    }

    /// Parser options for this configuration
    pub fn parse_options(&self) -> Result<ParseOptions> {
        Ok(ParseOptions {
            column_hint: self.parsing.column_hint,
            delimiter: self.parsing.delimiter,
            identification_scan_limit: self.parsing.identification_scan_limit,
            manufacturer_aliases: self.manufacturer_aliases()?,
        })
    }

    /// Worker count with 0 resolved to the number of CPUs
    pub fn effective_workers(&self) -> usize {
        match self.processing.workers {
            0 => num_cpus::get().max(1),
            workers => workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parsing.delimiter, '*');
        assert_eq!(config.parsing.identification_scan_limit, 20);
        assert_eq!(config.output.store_format, StoreFormat::Json);
        assert!(config.effective_workers() >= 1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [parsing]
            column_hint = 8

            [dialects.aliases]
            VEN = "dixie-narco"
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.parsing.column_hint, Some(8));
        assert_eq!(config.parsing.delimiter, '*');
        assert_eq!(config.processing.workers, 0);

        let options = config.parse_options().unwrap();
        assert_eq!(options.column_hint, Some(8));
        assert_eq!(
            options.manufacturer_aliases,
            vec![("VEN".to_string(), Dialect::DixieNarco)]
        );
    }

    #[test]
    fn test_invalid_toml_reports_origin() {
        let error = Config::from_toml_str("[parsing\ncolumn_hint = 8", "broken.toml").unwrap_err();
        assert!(matches!(error, Error::ConfigParse { ref path, .. } if path == "broken.toml"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nstore_format = \"parquet\"\n[processing]\nworkers = 3").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.output.store_format, StoreFormat::Parquet);
        assert_eq!(config.effective_workers(), 3);

        let missing = Config::from_file(Path::new("/nonexistent/dex-reader.toml"));
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_from(env(&[
                (ENV_COLUMN_HINT, "6"),
                (ENV_WORKERS, "2"),
                (ENV_STORE_DIR, "/var/dex"),
            ]))
            .unwrap();

        assert_eq!(config.parsing.column_hint, Some(6));
        assert_eq!(config.processing.workers, 2);
        assert_eq!(config.output.store_dir, Some(PathBuf::from("/var/dex")));

        let mut bad = Config::default();
        assert!(bad.apply_env_from(env(&[(ENV_WORKERS, "many")])).is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.parsing.column_hint = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.parsing.delimiter = 'x';
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.workers = MAX_WORKERS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config
            .dialects
            .aliases
            .insert("VEN".to_string(), "vendo".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config
            .dialects
            .aliases
            .insert("V3N".to_string(), "crane".to_string());
        assert!(config.validate().is_err());
    }
}
