//! Error types for khmer-sms

use std::path::PathBuf;
use thiserror::Error;

use crate::model::ModelError;

/// Result type alias for khmer-sms operations
pub type Result<T> = std::result::Result<T, SmsError>;

/// Crate-level error types
#[derive(Error, Debug)]
pub enum SmsError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model name that cannot name a manifest file
    #[error("Invalid model name '{0}'")]
    InvalidModelName(String),

    /// No manifest found for the requested model
    #[error("Model '{name}' not found in {}", .searched.display())]
    ModelNotFound { name: String, searched: PathBuf },

    /// Model manifest could not be parsed
    #[error("Invalid model manifest {}: {reason}", .path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    /// Model backend error
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}
