//! Error types for the harness library

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single image fetch.
///
/// Every variant counts as a failed fetch; the detail only reaches the logs.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to pull image {image}: {message}")]
    Pull { image: String, message: String },

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors reading or writing an image list file
#[derive(Error, Debug)]
pub enum ImageListError {
    #[error("Image list not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading a benchmark dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid JSON on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
