//! Storage layer abstractions for TourismDB.
//!
//! This module provides a trait-based abstraction over where the document
//! lives, allowing different backends to be used (JSON file, in-memory for
//! testing).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TourismDB                               │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │   StorageEngine     │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                    ▲         ▲                              │
//! │                    │         │                              │
//! │      ┌─────────────┴──┐   ┌──┴────────────┐                 │
//! │      │JsonFileStorage │   │ MemoryStorage │                 │
//! │      └────────────────┘   └───────────────┘                 │
//! │           (prod)              (test)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure Policy
//!
//! Loading is self-healing: a missing or corrupt document is replaced by
//! the default document and never reported as an error. Saving is not:
//! a failed save is always returned to the caller.

pub mod json;
pub mod lock;
pub mod memory;
pub mod schema;

pub use self::json::JsonFileStorage;
pub use self::lock::WriteLock;
pub use self::memory::MemoryStorage;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;

/// How a [`StorageEngine::load_with_outcome`] call obtained its document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored document was read and normalized.
    Loaded,

    /// Nothing was stored yet; the default document was created.
    Created,

    /// The stored document was unreadable as JSON. It was backed up (when
    /// `backup` is `Some`) and replaced by the default document.
    Recovered {
        /// Where the corrupt content was copied, if the copy succeeded.
        backup: Option<PathBuf>,
    },

    /// Reading failed for another reason; the default document was returned
    /// without being persisted.
    Fallback,
}

impl LoadOutcome {
    /// Returns true if the returned document is the default rather than stored data.
    pub fn is_default(&self) -> bool {
        !matches!(self, Self::Loaded)
    }
}

/// Storage engine trait for TourismDB.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow the database to be shared
/// across threads. Loads and saves are independent: there is no implicit
/// locking between a load and the following save.
pub trait StorageEngine: Send + Sync {
    /// Loads the document, reporting how it was obtained.
    ///
    /// Never fails: missing, corrupt or unreadable storage yields the default
    /// document (see [`LoadOutcome`]).
    fn load_with_outcome(&self) -> (Document, LoadOutcome);

    /// Loads the document. See [`StorageEngine::load_with_outcome`].
    fn load(&self) -> Document {
        self.load_with_outcome().0
    }

    /// Replaces the stored document atomically.
    ///
    /// Either the whole document is stored or the previous one survives
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Persistence` if the document could not be
    /// written. The in-memory document is then not durable.
    fn save(&self, doc: &Document) -> Result<()>;

    /// Acquires the exclusive write lock guarding read-modify-write cycles.
    ///
    /// Backends without cross-process state may return [`WriteLock::unlocked`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Locked` if the lock isn't obtained in time.
    fn lock(&self) -> Result<WriteLock>;

    /// Returns the path to the backing file, if applicable.
    fn path(&self) -> Option<&Path>;
}

/// Opens the JSON file storage engine described by the configuration.
///
/// No I/O happens until the first load or save.
pub fn open_storage(config: &Config) -> Box<dyn StorageEngine> {
    Box::new(JsonFileStorage::new(&config.data_path, config.sync_mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_storage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.json");

        let storage = open_storage(&Config::with_data_path(&path));
        assert_eq!(storage.path(), Some(path.as_path()));
        assert!(!path.exists(), "opening must not touch the file");

        let (doc, outcome) = storage.load_with_outcome();
        assert_eq!(outcome, LoadOutcome::Created);
        assert_eq!(doc.experiences.len(), 3);
        assert!(path.exists());
    }

    #[test]
    fn test_load_outcome_is_default() {
        assert!(!LoadOutcome::Loaded.is_default());
        assert!(LoadOutcome::Created.is_default());
        assert!(LoadOutcome::Fallback.is_default());
        assert!(LoadOutcome::Recovered { backup: None }.is_default());
    }

    #[test]
    fn test_storage_engines_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonFileStorage>();
        assert_send_sync::<MemoryStorage>();
    }
}
