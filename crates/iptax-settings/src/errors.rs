//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// The settings file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON or has wrongly-typed fields.
    #[error("invalid settings file {path}: {source}")]
    Parse {
        /// The settings file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A field value is outside its documented range.
    #[error("invalid settings: {0}")]
    Invalid(String),
}
