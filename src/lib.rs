//! DEX Reader Library
//!
//! A Rust library for turning vending-machine DEX audit files into structured
//! records and an inferred physical slot layout.
//!
//! This library provides tools for:
//! - Tokenizing and classifying DEX segments with tolerance for vendor extensions
//! - Resolving the manufacturer dialect that governs field order and money units
//! - Mapping segments into typed payloads with explicit null handling
//! - Consolidating product-activity subtypes into one record per selection
//! - Inferring the row/column grid of a machine from its selection codes
//! - Storing read results through pluggable persistence sinks (JSON, Parquet)

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod dex_parser;
        pub mod grid_analyzer;
        pub mod issue_reporter;
        pub mod persistence;
        pub mod selection_consolidator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ConsolidatedSelection, DexReadResult, Dialect, GridPosition, ParsedRecord, RecordType,
};
pub use app::services::dex_parser::{DexParser, ParseOptions};
pub use config::Config;

/// Result type alias for the DEX reader
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for operations around the parsing core
///
/// The parsing pipeline itself never returns these: line-level problems are
/// collected as issues on the read result. These cover file access,
/// configuration and persistence.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Configuration file '{path}' is invalid: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Parquet writing error
    #[error("Parquet writing error: {message}")]
    ParquetWriting {
        message: String,
        #[source]
        source: polars::error::PolarsError,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Invalid input pattern
    #[error("Invalid input pattern '{pattern}': {source}")]
    InputPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a configuration parse error
    pub fn config_parse(path: impl Into<String>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a Parquet writing error
    pub fn parquet_writing(
        message: impl Into<String>,
        source: polars::error::PolarsError,
    ) -> Self {
        Self::ParquetWriting {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create an input pattern error
    pub fn input_pattern(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::InputPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::ParquetWriting {
            message: "Parquet operation failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
