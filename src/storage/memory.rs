//! In-memory storage engine for tests.
//!
//! Holds the document as a serialized JSON value so every load goes through
//! the same normalization as a file load. Saves can be made to fail to
//! exercise error paths.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use super::lock::WriteLock;
use super::schema::default_document;
use super::{LoadOutcome, StorageEngine};
use crate::document::{normalize, Document};
use crate::error::{Result, StorageError};

/// Storage engine keeping the document in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    stored: Mutex<Option<Value>>,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    /// Creates an empty store; the first load creates the default document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `value`, as if read from a file.
    pub fn with_value(value: Value) -> Self {
        Self {
            stored: Mutex::new(Some(value)),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored JSON value, if any.
    pub fn stored_value(&self) -> Option<Value> {
        self.stored.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StorageEngine for MemoryStorage {
    fn load_with_outcome(&self) -> (Document, LoadOutcome) {
        match self.stored_value() {
            Some(value @ Value::Object(_)) => (normalize(value), LoadOutcome::Loaded),
            Some(_) => {
                let doc = default_document();
                let _ = self.save(&doc);
                (doc, LoadOutcome::Recovered { backup: None })
            }
            None => {
                let doc = default_document();
                let _ = self.save(&doc);
                (doc, LoadOutcome::Created)
            }
        }
    }

    fn save(&self, doc: &Document) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::persistence("<memory>", "saves disabled").into());
        }
        let value = serde_json::to_value(doc)?;
        let mut guard = self
            .stored
            .lock()
            .map_err(|_| StorageError::persistence("<memory>", "store mutex poisoned"))?;
        *guard = Some(value);
        Ok(())
    }

    fn lock(&self) -> Result<WriteLock> {
        Ok(WriteLock::unlocked())
    }

    fn path(&self) -> Option<&Path> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_load_creates_default() {
        let storage = MemoryStorage::new();
        let (doc, outcome) = storage.load_with_outcome();
        assert_eq!(outcome, LoadOutcome::Created);
        assert_eq!(doc, default_document());
        assert!(storage.stored_value().is_some());
    }

    #[test]
    fn test_with_value_normalizes() {
        let storage = MemoryStorage::with_value(json!({ "featured_experiences": [{ "id": 1 }] }));
        let (doc, outcome) = storage.load_with_outcome();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(doc.experiences.len(), 1);
    }

    #[test]
    fn test_failing_saves() {
        let storage = MemoryStorage::new();
        storage.set_fail_saves(true);
        let err = storage.save(&Document::new()).unwrap_err();
        assert!(err.is_persistence());
        assert!(storage.stored_value().is_none());
    }
}
