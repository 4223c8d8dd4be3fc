//! Error handling for QuestSearch core library

use std::fmt;
use thiserror::Error;

/// Result type alias for QuestSearch operations
pub type Result<T> = std::result::Result<T, QuestError>;

/// Main error type for QuestSearch operations
#[derive(Error, Debug)]
pub enum QuestError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Request validation errors
    #[error("{message}")]
    Validation { message: String },

    /// Requested page lies beyond the last page of the result set
    #[error("Page number exceeds total pages. Maximum page is {max_page}")]
    OutOfRange { requested: u32, max_page: u64 },

    /// Document store errors (unreachable, timeout, bad row)
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl QuestError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a page out of range error
    pub fn out_of_range(requested: u32, max_page: u64) -> Self {
        Self::OutOfRange {
            requested,
            max_page,
        }
    }

    /// Create a backend error
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::OutOfRange { .. })
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Io(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::Io,
            Self::Json(_) | Self::Yaml(_) => ErrorCategory::Serialization,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::OutOfRange { .. } => ErrorCategory::OutOfRange,
            Self::Backend { .. } => ErrorCategory::Backend,
            Self::Generic(_) => ErrorCategory::Generic,
        }
    }
}

/// Error categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Io,
    Serialization,
    Configuration,
    Validation,
    OutOfRange,
    Backend,
    Generic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
            Self::Validation => write!(f, "validation"),
            Self::OutOfRange => write!(f, "out_of_range"),
            Self::Backend => write!(f, "backend"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = QuestError::validation("Search query is required");
        assert!(matches!(err, QuestError::Validation { .. }));
        assert_eq!(err.to_string(), "Search query is required");
    }

    #[test]
    fn test_out_of_range_names_max_page() {
        let err = QuestError::out_of_range(7, 3);
        assert_eq!(
            err.to_string(),
            "Page number exceeds total pages. Maximum page is 3"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            QuestError::backend("down").category(),
            ErrorCategory::Backend
        );
        assert_eq!(
            QuestError::validation("bad").category(),
            ErrorCategory::Validation
        );
        assert_eq!(ErrorCategory::OutOfRange.to_string(), "out_of_range");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(QuestError::backend("timeout").is_retryable());
        assert!(!QuestError::validation("test").is_retryable());
        assert!(!QuestError::out_of_range(2, 1).is_retryable());
    }

    #[test]
    fn test_error_from_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: QuestError = io_err.into();
        assert!(matches!(err, QuestError::Io(_)));
        assert!(!err.is_client_error());

        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: QuestError = json_err.into();
        assert!(matches!(err, QuestError::Json(_)));
    }
}
