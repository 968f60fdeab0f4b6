//! Error types for configuration, generation and export.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the run parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required parameter `{0}`")]
    Missing(&'static str),

    #[error("invalid parameter `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Requests the generator cannot honour.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a deep sea basin of radius {radius} does not fit a {width}x{height} map")]
    BasinDoesNotFit { radius: usize, width: usize, height: usize },
}

/// Failures while writing results.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("model {width}x{height}x{depth} exceeds the vox limit of {limit} per axis")]
    TooLarge { width: usize, height: usize, depth: usize, limit: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of a command line run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
