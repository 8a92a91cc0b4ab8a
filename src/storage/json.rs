//! JSON file storage engine.
//!
//! The whole document lives in one pretty-printed JSON file. Saves go
//! through a uniquely named temporary file in the same directory that is
//! renamed over the target, so readers see either the old or the new
//! document, never a torn one.
//!
//! # Load Recovery
//!
//! | Situation | Result | Persisted |
//! |-----------|--------|-----------|
//! | file missing | default document | yes |
//! | invalid JSON / not an object | backup + default document | yes |
//! | other read error | default document | no |

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::lock::WriteLock;
use super::schema::{
    default_document, BACKUP_TIMESTAMP_FORMAT, CORRUPT_BACKUP_INFIX, LOCK_EXTENSION,
    TEMP_EXTENSION,
};
use super::{LoadOutcome, StorageEngine};
use crate::config::SyncMode;
use crate::document::{normalize, Document};
use crate::error::{Result, StorageError};

/// Backup names tried per recovery before giving up.
const MAX_BACKUP_ATTEMPTS: usize = 100;

/// Storage engine backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    /// Path to the data file.
    path: PathBuf,

    /// Flush behavior for saves.
    sync_mode: SyncMode,
}

impl JsonFileStorage {
    /// Creates a storage engine for the given file. Performs no I/O.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tourismdb::{SyncMode, storage::{JsonFileStorage, StorageEngine}};
    ///
    /// let storage = JsonFileStorage::new("./data/sample_data.json", SyncMode::Normal);
    /// let doc = storage.load();
    /// ```
    pub fn new(path: impl AsRef<Path>, sync_mode: SyncMode) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sync_mode,
        }
    }

    /// Path a corrupt file is copied to when detected at `at`.
    pub fn backup_path(&self, at: DateTime<Utc>) -> PathBuf {
        self.sibling(&format!(
            "{}.{}",
            CORRUPT_BACKUP_INFIX,
            at.format(BACKUP_TIMESTAMP_FORMAT)
        ))
    }

    /// Path of the advisory lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.sibling(LOCK_EXTENSION)
    }

    /// `<dir>/<file name>.<suffix>`
    fn sibling(&self, suffix: &str) -> PathBuf {
        let name = self.path.file_name().unwrap_or_default().to_string_lossy();
        self.path.with_file_name(format!("{}.{}", name, suffix))
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(&format!("{}.{}", Uuid::now_v7().simple(), TEMP_EXTENSION))
    }

    /// Parses file content; anything but a JSON object counts as corrupt.
    fn parse(bytes: &[u8]) -> std::result::Result<Document, StorageError> {
        match serde_json::from_slice::<Value>(bytes)? {
            value @ Value::Object(_) => Ok(normalize(value)),
            other => Err(StorageError::corrupted(format!(
                "top-level value is {}, expected an object",
                json_kind(&other)
            ))),
        }
    }

    /// Writes and persists the default document. A failed write is logged,
    /// the default is returned regardless.
    fn create_default(&self) -> Document {
        let doc = default_document();
        if let Err(e) = self.save(&doc) {
            warn!(error = %e, "Could not persist default document; serving it from memory");
        }
        doc
    }

    /// Writes the corrupt bytes aside. Best effort.
    fn backup_corrupt(&self, bytes: &[u8]) -> Option<PathBuf> {
        self.write_backup(bytes, Utc::now())
    }

    /// Writes `bytes` to a new backup file for time `at`.
    ///
    /// Never overwrites: when [`backup_path`](Self::backup_path) is taken
    /// (two recoveries within a second), `.1`, `.2`, ... are appended.
    fn write_backup(&self, bytes: &[u8], at: DateTime<Utc>) -> Option<PathBuf> {
        let base = self.backup_path(at);
        for attempt in 0..MAX_BACKUP_ATTEMPTS {
            let backup = if attempt == 0 {
                base.clone()
            } else {
                let mut name = base.clone().into_os_string();
                name.push(format!(".{}", attempt));
                PathBuf::from(name)
            };

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&backup) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    error!(error = %e, "Failed to back up corrupt data file");
                    return None;
                }
            };

            let written = file.write_all(bytes).and_then(|()| {
                if self.sync_mode.is_fast() {
                    Ok(())
                } else {
                    file.sync_all()
                }
            });
            return match written {
                Ok(()) => {
                    warn!(backup = %backup.display(), "Backed up corrupt data file");
                    Some(backup)
                }
                Err(e) => {
                    error!(error = %e, "Failed to write corrupt data backup");
                    drop(file);
                    let _ = fs::remove_file(&backup);
                    None
                }
            };
        }

        error!(base = %base.display(), "No free backup name for corrupt data file");
        None
    }

    fn write_and_rename(&self, temp: &Path, payload: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp)?;
        file.write_all(payload)?;
        if !self.sync_mode.is_fast() {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(temp, &self.path)?;

        if self.sync_mode.is_paranoid() {
            if let Some(parent) = self.parent_dir() {
                sync_dir(parent)?;
            }
        }
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

impl StorageEngine for JsonFileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load_with_outcome(&self) -> (Document, LoadOutcome) {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Data file not found, creating default");
                return (self.create_default(), LoadOutcome::Created);
            }
            Err(e) => {
                error!(error = %e, "Unexpected error reading data file, serving default");
                return (default_document(), LoadOutcome::Fallback);
            }
        };

        match Self::parse(&bytes) {
            Ok(doc) => {
                debug!(bytes = bytes.len(), "Data file loaded");
                (doc, LoadOutcome::Loaded)
            }
            Err(e) => {
                error!(error = %e, "Data file is not a valid document, backing up and recreating default");
                let backup = self.backup_corrupt(&bytes);
                (self.create_default(), LoadOutcome::Recovered { backup })
            }
        }
    }

    #[instrument(skip(self, doc), fields(path = %self.path.display()))]
    fn save(&self, doc: &Document) -> Result<()> {
        let payload =
            serde_json::to_vec_pretty(doc).map_err(|e| StorageError::persistence(&self.path, e))?;

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|e| StorageError::persistence(&self.path, e))?;
        }

        let temp = self.temp_path();
        if let Err(e) = self.write_and_rename(&temp, &payload) {
            error!(error = %e, "Failed to save data file");
            if let Err(cleanup) = fs::remove_file(&temp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(temp = %temp.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(StorageError::persistence(&self.path, e).into());
        }

        debug!(bytes = payload.len(), "Data file saved");
        Ok(())
    }

    fn lock(&self) -> Result<WriteLock> {
        WriteLock::acquire(&self.lock_path())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

// Directories can't be opened as files here; the rename is as durable as it gets.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
