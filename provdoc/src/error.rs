//! Error types surfaced by the library.
//!
//! Only configuration problems and collaborator failures are errors here.
//! Malformed documentation never is: the parsers skip what they cannot read.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Invalid or unreadable pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of one per-language example conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to start converter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("converter i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("converter timed out after {0:?}")]
    Timeout(Duration),

    #[error("converter produced non-UTF-8 output")]
    InvalidOutput,

    #[error("{0}")]
    Other(String),
}
