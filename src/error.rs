use crate::embedding::{EmbeddingError, IndexError};
use crate::generation::GenerationError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Docent
#[derive(Error, Debug)]
pub enum DocentError {
    /// The source is not a readable PDF or holds no extractable text
    #[error("Failed to parse document {source_name}: {message}")]
    DocumentParse {
        source_name: String,
        message: String,
    },

    /// Configuration related errors (including invalid chunk size/overlap)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Embedding service failures (network, auth, rate limit, bad input)
    #[error("Embedding service error: {0}")]
    EmbeddingService(#[from] EmbeddingError),

    /// Vector index construction or query errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Language model failures (transport, auth, quota)
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Session related errors
    #[error("Session error: {0}")]
    Session(String),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),
}

impl DocentError {
    pub fn document_parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentParse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for Docent operations
pub type Result<T> = std::result::Result<T, DocentError>;
