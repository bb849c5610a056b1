//! Error types for madori.

use thiserror::Error;

use crate::filename::FilenameError;

/// Result type alias using madori's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for madori operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Plan not found (or not visible to the caller's company)
    #[error("Plan not found: {0}")]
    PlanNotFound(uuid::Uuid),

    /// Concurrent modification detected (stale version token)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Blob storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication/authorization failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<FilenameError> for Error {
    fn from(e: FilenameError) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filename::parse_filename;
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("plan pdf".to_string());
        assert_eq!(err.to_string(), "Not found: plan pdf");
    }

    #[test]
    fn test_error_display_plan_not_found() {
        let id = Uuid::nil();
        let err = Error::PlanNotFound(id);
        assert_eq!(err.to_string(), format!("Plan not found: {}", id));
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("version 3 is stale".to_string());
        assert_eq!(err.to_string(), "Conflict: version 3 is stale");
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("PORT is not a number".to_string());
        assert_eq!(err.to_string(), "Configuration error: PORT is not a number");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("negative area".to_string());
        assert_eq!(err.to_string(), "Invalid input: negative area");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_filename_error_is_invalid_input() {
        let parse_err = parse_filename("x_y").unwrap_err();
        let err: Error = parse_err.into();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("x_y")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
