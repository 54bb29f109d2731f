//! Error types for the denesting engine
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the denesting engine
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Key property '{key}' not found in the flattened schema of table '{table}'")]
    MissingKeyProperty { key: String, table: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Record Errors
    // ============================================================================
    #[error("Record is missing a value for key property '{key}'")]
    MissingKeyValue { key: String },

    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing-key-property error
    pub fn missing_key_property(key: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MissingKeyProperty {
            key: key.into(),
            table: table.into(),
        }
    }

    /// Create a missing-key-value error
    pub fn missing_key_value(key: impl Into<String>) -> Self {
        Self::MissingKeyValue { key: key.into() }
    }

    /// Create a malformed-record error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is fatal for the whole stream rather than a
    /// single record
    pub fn is_stream_fatal(&self) -> bool {
        match self {
            Error::Config { .. }
            | Error::MissingKeyProperty { .. }
            | Error::YamlParse(_)
            | Error::FileNotFound { .. } => true,
            Error::MissingKeyValue { .. } | Error::MalformedRecord { .. } => false,
            _ => false,
        }
    }
}

/// Result type alias for the denesting engine
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
