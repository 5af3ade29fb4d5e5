//! Custom error types for wallet-backup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for backup and restore operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// The snapshot text is not a structured document
    #[error("this file is not a valid backup: {0}")]
    MalformedSnapshot(String),

    /// A collaborator rejected the section handed to it
    #[error("failed to restore {section}: {reason}")]
    SectionApply { section: String, reason: String },

    /// Another restore is already running against the same collaborators
    #[error("a restore is already in progress")]
    RestoreInProgress,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl BackupError {
    /// Create a section apply error
    pub fn section_apply(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SectionApply {
            section: section.into(),
            reason: reason.into(),
        }
    }

    /// Create a "not found" error for export files
    pub fn export_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Export",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a malformed snapshot error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedSnapshot(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_malformed_message_is_actionable() {
        let err = BackupError::MalformedSnapshot("expected value at line 1".into());
        assert!(err.to_string().starts_with("this file is not a valid backup"));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_section_apply_error() {
        let err = BackupError::section_apply("addressBook", "disk full");
        assert_eq!(err.to_string(), "failed to restore addressBook: disk full");
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_not_found_error() {
        let err = BackupError::export_not_found("latest");
        assert_eq!(err.to_string(), "Export not found: latest");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
