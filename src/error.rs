//! Error types for configuration loading.

use crate::source::Format;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file loader was given neither a path nor a reader.
    #[error("config path or reader is not set")]
    SourceNotConfigured,

    /// Path resolution exhausted the search without finding the file.
    #[error("config file {} not found", path.display())]
    FileNotFound { path: PathBuf },

    /// The file or reader could not be read.
    #[error("failed to read config from {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed file content, or a value of the wrong type for its field.
    #[error("failed to decode {format} config from {origin}: {message}")]
    Decode { format: Format, origin: String, message: String },

    /// Malformed scalar from the environment, a flag or a declared default.
    #[error("invalid value {value:?} for {origin} {name}: {reason}")]
    Parse { origin: &'static str, name: String, value: String, reason: String },

    /// One or more required fields were left at their zero value.
    #[error("required fields are not set: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// Malformed command-line arguments.
    #[error("invalid command-line arguments: {0}")]
    Flag(String),

    /// Help output requested on the command line.
    #[error("{0}")]
    Help(String),
}

impl ConfigError {
    /// Returns true for the failures the best-effort pass expects, i.e. a
    /// conventional file that simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::FileNotFound { .. })
    }
}
