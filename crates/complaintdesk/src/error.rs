//! Error types for complaintdesk.
//!
//! This module defines all error types used throughout the complaintdesk crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for complaintdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the origin database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A slot write would exceed the storage quota.
    #[error("storage quota exceeded for slot '{key}': {size} bytes > {quota} bytes")]
    QuotaExceeded {
        /// The slot being written.
        key: String,
        /// Size of the rejected payload.
        size: usize,
        /// The configured quota.
        quota: usize,
    },

    /// The backend refused a write for another reason.
    #[error("write to slot '{key}' rejected: {message}")]
    WriteRejected {
        /// The slot being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Form Errors ===
    /// A required form field was left empty.
    #[error("{field} is required")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// The email field does not look like an email address.
    #[error("'{value}' is not a valid email address")]
    InvalidEmail {
        /// The rejected input.
        value: String,
    },

    /// A form field name was not recognised.
    #[error("unknown field '{0}' (expected one of: name, email, category, description, urgency)")]
    UnknownField(String),

    /// A session command was missing its arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// A session command was not recognised.
    #[error("unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),

    /// An unknown category name was given.
    #[error("unknown category '{0}' (expected one of: General, Billing, Medical Care, Staff Behavior, Facilities)")]
    UnknownCategory(String),

    /// An unknown urgency name was given.
    #[error("unknown urgency '{0}' (expected one of: Low, Medium, High)")]
    UnknownUrgency(String),

    /// A complaint id did not have the `CMP-NNNNN` shape.
    #[error("malformed complaint id '{0}'")]
    MalformedId(String),

    // === Runtime Errors ===
    /// No async runtime was available for the notice timer.
    #[error("no async runtime available: {0}")]
    Runtime(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for complaintdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a missing-field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create a rejected-write error.
    #[must_use]
    pub fn write_rejected(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteRejected {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error was raised at the input boundary.
    ///
    /// Input errors block a submission before anything is persisted.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidEmail { .. }
                | Self::UnknownField(_)
                | Self::Usage(_)
                | Self::UnknownCommand(_)
                | Self::UnknownCategory(_)
                | Self::UnknownUrgency(_)
        )
    }

    /// Check if this error came from the storage backend.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
                | Self::QuotaExceeded { .. }
                | Self::WriteRejected { .. }
        )
    }
}
