//! Error types for TourismDB.
//!
//! TourismDB uses a hierarchical error system:
//! - `TourismError` is the top-level error returned by all public APIs
//! - Specific error types (`StorageError`, `ValidationError`) provide detail
//!
//! Load-time faults (missing or corrupt data file) are self-healing and never
//! reach the caller. Only save failures and rejected input surface as errors.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use tourismdb::{TourismDB, Config, NewReview, Result};
//!
//! fn example() -> Result<()> {
//!     let db = TourismDB::open(Config::default())?;
//!     db.submit_review(1, NewReview::new("Loved the sunrise"))?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for TourismDB operations.
pub type Result<T> = std::result::Result<T, TourismError>;

/// Top-level error enum for all TourismDB operations.
///
/// This is the only error type returned by public APIs.
/// Use pattern matching to handle specific error cases.
#[derive(Debug, Error)]
pub enum TourismError {
    /// Storage layer error (persistence, serialization, locking).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TourismError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if a save failed and the in-memory document was not persisted.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Storage(StorageError::Persistence { .. }))
    }

    /// HTTP-equivalent status code for this error.
    ///
    /// Rejected input maps to 400; everything else is a server-side fault.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Storage(StorageError::Locked) => 503,
            Self::Storage(_) | Self::Config { .. } | Self::Io(_) => 500,
        }
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the backing JSON file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Data file content could not be parsed as a document.
    #[error("Data file corrupted: {0}")]
    Corrupted(String),

    /// Writing or renaming the data file failed.
    ///
    /// The in-memory document must not be treated as durable.
    #[error("Failed to persist {}: {reason}", path.display())]
    Persistence {
        /// Path of the data file being written.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The write lock could not be acquired.
    #[error("Data file is locked by another writer")]
    Locked,
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a persistence error for the given path.
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            StorageError::Corrupted(err.to_string())
        } else {
            StorageError::Serialization(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TourismError {
    fn from(err: serde_json::Error) -> Self {
        TourismError::Storage(StorageError::from(err))
    }
}

/// Validation errors for input data.
///
/// These errors indicate problems with data provided by the caller and are
/// raised before any mutation or I/O takes place.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Content exceeds maximum allowed size.
    #[error("Content too large: {size} bytes (max: {max} bytes)")]
    ContentTooLarge {
        /// Actual content size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a content too large error.
    pub fn content_too_large(size: usize, max: usize) -> Self {
        Self::ContentTooLarge { size, max }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }
}
