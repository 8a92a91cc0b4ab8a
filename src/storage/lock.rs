//! Advisory write lock around read-modify-write cycles.
//!
//! Only taken when `Config::lock_writes` is set. Uses `fs2` advisory locks
//! on a sidecar `<file>.lock`, so it also excludes other processes that
//! follow the same protocol. Acquisition polls with a deadline instead of
//! blocking indefinitely.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{Result, StorageError};

/// How long to wait for a contended lock before giving up.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between acquisition attempts.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Guard for the exclusive write lock. Released on drop.
#[derive(Debug)]
pub struct WriteLock {
    file: Option<File>,
}

impl WriteLock {
    /// Acquires the exclusive lock on `path`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Locked` if the lock is still held by someone
    /// else after [`LOCK_TIMEOUT`], or `TourismError::Io` if the lock file
    /// can't be opened or locking fails for any other reason.
    pub fn acquire(path: &Path) -> Result<Self> {
        Self::acquire_within(path, LOCK_TIMEOUT)
    }

    /// Like [`WriteLock::acquire`] with a custom deadline.
    pub fn acquire_within(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        poll_lock(path, timeout, || FileExt::try_lock_exclusive(&file))?;
        debug!(lock = %path.display(), "Write lock acquired");
        Ok(Self { file: Some(file) })
    }

    /// A guard that holds nothing, for backends without shared state.
    pub fn unlocked() -> Self {
        Self { file: None }
    }

    /// Returns true if this guard holds a file lock.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

/// Returns true if `err` means another holder has the lock.
fn is_contended(err: &io::Error) -> bool {
    err.kind() == fs2::lock_contended_error().kind()
}

/// Calls `try_lock` until it succeeds or `timeout` passes.
///
/// Only contention is retried; any other failure is returned at once.
fn poll_lock<F>(path: &Path, timeout: Duration, mut try_lock: F) -> Result<()>
where
    F: FnMut() -> io::Result<()>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match try_lock() {
            Ok(()) => return Ok(()),
            Err(e) if is_contended(&e) && Instant::now() < deadline => {
                thread::sleep(LOCK_POLL_INTERVAL)
            }
            Err(e) if is_contended(&e) => {
                warn!(lock = %path.display(), error = %e, "Timed out waiting for write lock");
                return Err(StorageError::Locked.into());
            }
            Err(e) => {
                warn!(lock = %path.display(), error = %e, "Failed to lock");
                return Err(e.into());
            }
        }
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
    }
}
