//! Error handling for EventBoard
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the EventBoard application
#[derive(Error, Debug)]
pub enum EventBoardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event request not found: {id}")]
    RequestNotFound { id: i64 },

    #[error("Event not found: {id}")]
    EventNotFound { id: i64 },

    #[error("Department not found: {id}")]
    DepartmentNotFound { id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for EventBoard operations
pub type Result<T> = std::result::Result<T, EventBoardError>;

impl EventBoardError {
    /// Check if the error maps to a client-side condition (4xx) rather
    /// than an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EventBoardError::PermissionDenied(_)
                | EventBoardError::RequestNotFound { .. }
                | EventBoardError::EventNotFound { .. }
                | EventBoardError::DepartmentNotFound { .. }
                | EventBoardError::InvalidStateTransition { .. }
                | EventBoardError::Validation(_)
                | EventBoardError::Authentication(_)
                | EventBoardError::InvalidInput(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventBoardError::Database(_) => ErrorSeverity::Critical,
            EventBoardError::Migration(_) => ErrorSeverity::Critical,
            EventBoardError::Config(_) => ErrorSeverity::Critical,
            EventBoardError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventBoardError::Authentication(_) => ErrorSeverity::Warning,
            EventBoardError::Validation(_) => ErrorSeverity::Info,
            EventBoardError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
