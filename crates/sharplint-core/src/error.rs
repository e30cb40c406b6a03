//! Error types and handling for sharplint operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sharplint operations
#[derive(Debug, Error)]
pub enum SharplintError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fix broke the engine's contract
    #[error("Autofix error in '{rule_id}': {message}")]
    AutofixError { rule_id: String, message: String },

    /// The run was cancelled before the file was analyzed
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Autofix,
    Cancelled,
}

impl SharplintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SharplintError::ConfigError { .. } => ErrorKind::Config,
            SharplintError::IoError { .. } => ErrorKind::Io,
            SharplintError::AutofixError { .. } => ErrorKind::Autofix,
            SharplintError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io | ErrorKind::Autofix)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an autofix error
    pub fn autofix_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AutofixError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SharplintError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(SharplintError::autofix_error("SA1012", "no change").is_recoverable());
        assert!(!SharplintError::config_error("bad config").is_recoverable());
        assert!(!SharplintError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = SharplintError::io_error(
            "src/Program.cs",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("src/Program.cs"));
    }
}
