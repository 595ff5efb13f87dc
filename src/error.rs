// packer-template/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a template run. All variants are terminal.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Missing required parameter: {key}")]
    MissingParameter { key: &'static str },

    #[error("Invalid parameter {key}: {reason}")]
    InvalidParameter { key: &'static str, reason: String },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported parameter file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("serialize template: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;
