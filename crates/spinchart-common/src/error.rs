//! Error types and utilities for spinchart

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for spinchart operations
pub type Result<T> = std::result::Result<T, SpinchartError>;

/// Main error type for spinchart operations
#[derive(Error, Debug)]
pub enum SpinchartError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input validation errors (unsorted events, non-positive sizes, overflow)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Streaming-history import errors
    #[error("Import error: {message}")]
    Import {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SpinchartError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error tied to a named input
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new import error for a file
    pub fn import(msg: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Import {
            message: msg.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a new import error for a file with source
    pub fn import_with_source(
        msg: impl Into<String>,
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Import {
            message: msg.into(),
            path: Some(path.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error reports a violated input precondition
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The input field a validation error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_creation() {
        let err = SpinchartError::config("bad window");
        assert!(matches!(err, SpinchartError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: bad window");

        let err = SpinchartError::validation_field("must be positive", "chart_size");
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("chart_size"));
        assert_eq!(err.to_string(), "Validation error: must be positive");

        let err = SpinchartError::import("missing endTime", "StreamingHistory0.json");
        assert!(!err.is_validation());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SpinchartError::config_with_source("cannot read config", io);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SpinchartError = io.into();
        assert!(matches!(err, SpinchartError::Io(_)));
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err: SpinchartError = json_err.into();
        assert!(matches!(err, SpinchartError::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_error() -> Result<u64> {
            Err(SpinchartError::validation("window_length_ms must be positive"))
        }

        assert!(returns_error().is_err());
    }
}
