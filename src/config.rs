//! Configuration types for TourismDB.
//!
//! The [`Config`] struct controls store behavior including:
//! - Location of the backing JSON file
//! - Durability of saves
//! - Sentiment provider for review tagging
//! - Recommendation list size and optional write locking
//!
//! # Example
//! ```rust
//! use tourismdb::{Config, SyncMode};
//!
//! // Use defaults (data/sample_data.json, lexicon sentiment)
//! let config = Config::default();
//!
//! // Customize for production
//! let config = Config {
//!     sync_mode: SyncMode::Paranoid,
//!     lock_writes: true,
//!     ..Config::with_data_path("/var/lib/tourism/site.json")
//! };
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::schema::{
    DATA_PATH_ENV, DEFAULT_DATA_DIR, DEFAULT_DATA_FILE, DEFAULT_RECOMMENDATION_LIMIT,
};

/// Store configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use tourismdb::Config;
///
/// let config = Config {
///     recommendation_limit: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Path of the JSON document backing the store.
    ///
    /// Default: `data/sample_data.json` relative to the working directory.
    pub data_path: PathBuf,

    /// Durability mode for saves.
    pub sync_mode: SyncMode,

    /// How review sentiment is classified.
    pub sentiment: SentimentProvider,

    /// Maximum number of items returned by recommendations.
    ///
    /// Default: 3
    pub recommendation_limit: usize,

    /// Serialize review submissions with an exclusive file lock.
    ///
    /// Off by default: concurrent submissions then race and the last
    /// writer wins. When on, the load-modify-save cycle holds an advisory
    /// lock on `<data_path>.lock`, which also excludes other processes.
    pub lock_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: Path::new(DEFAULT_DATA_DIR).join(DEFAULT_DATA_FILE),
            sync_mode: SyncMode::Normal,
            sentiment: SentimentProvider::Lexicon,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            lock_writes: false,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config backed by the given file.
    ///
    /// # Example
    /// ```rust
    /// use tourismdb::Config;
    ///
    /// let config = Config::with_data_path("/tmp/site.json");
    /// assert_eq!(config.data_path.to_str(), Some("/tmp/site.json"));
    /// ```
    pub fn with_data_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: path.into(),
            ..Default::default()
        }
    }

    /// Creates a Config honoring the `DATA_JSON_PATH` environment override.
    ///
    /// A set, non-empty override is made absolute against the working
    /// directory. Otherwise the default location is used.
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_PATH_ENV) {
            Some(raw) if !raw.is_empty() => {
                let path = PathBuf::from(raw);
                Self::with_data_path(std::path::absolute(&path).unwrap_or(path))
            }
            _ => Self::default(),
        }
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `TourismDB::open()`, which reports a failure
    /// as `TourismError::Config`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `data_path` has no file name (empty, or ends in `..`)
    /// - `recommendation_limit` is 0
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_path.file_name().is_none() {
            return Err(ValidationError::invalid_field(
                "data_path",
                format!("'{}' does not name a file", self.data_path.display()),
            ));
        }

        if self.recommendation_limit == 0 {
            return Err(ValidationError::invalid_field(
                "recommendation_limit",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

/// Sentiment provider configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentProvider {
    /// Built-in word-polarity lexicon.
    #[default]
    Lexicon,

    /// Tag every review as neutral.
    Disabled,
}

/// Durability mode for saves.
///
/// Controls the trade-off between write performance and crash safety.
/// Every mode writes a temporary file and renames it into place, so readers
/// never see a partial document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Flush the temporary file to disk before renaming.
    ///
    /// This is the default and recommended setting.
    #[default]
    Normal,

    /// Rename without flushing (faster, may lose the latest save on power loss).
    Fast,

    /// Flush the file, rename, then flush the containing directory so the
    /// rename itself is durable.
    Paranoid,
}

impl SyncMode {
    /// Returns true if this mode also syncs the containing directory.
    pub fn is_paranoid(&self) -> bool {
        matches!(self, Self::Paranoid)
    }

    /// Returns true if this mode skips flushing.
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}
