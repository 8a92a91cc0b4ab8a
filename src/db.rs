//! TourismDB main struct and operations.
//!
//! The [`TourismDB`] struct is the primary interface. It is constructed once
//! at startup with its [`Config`] and passed to whatever serves requests.
//! It provides:
//!
//! - Loading and saving the document
//! - Listing and submitting reviews
//! - Recommendations and search
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tourismdb::{Config, NewReview, TourismDB};
//!
//! let db = TourismDB::open(Config::from_env())?;
//!
//! let submission = db.submit_review(1, NewReview::new("Magical sunrise").with_rating(5.0))?;
//! let picks = db.recommendations(103);
//! let hits = db.search("falls");
//! ```
//!
//! # Concurrency
//!
//! Every operation reads the document fresh from storage. There is no
//! in-process cache and, unless `Config::lock_writes` is set, no locking:
//! two concurrent `submit_review` calls can both load the same state and
//! the later save wins. Saves are atomic, so readers never see a partial
//! document either way.

use std::path::Path;

use tracing::{info, instrument};

use crate::config::Config;
use crate::document::{Collection, Document, Item};
use crate::error::{Result, TourismError};
use crate::recommend::recommend;
use crate::review::{
    add_review, review_summary, validate_new_review, NewReview, Review, ReviewSubmission,
    ReviewSummary,
};
use crate::search::{search, search_filtered, SearchFilter};
use crate::sentiment::{create_classifier, SentimentClassifier};
use crate::storage::{open_storage, LoadOutcome, StorageEngine};
use crate::types::{ItemId, UserId};

/// The main TourismDB handle.
///
/// Owns its storage engine and sentiment classifier. `TourismDB` is
/// `Send + Sync` and can be shared across request handlers with `Arc`.
pub struct TourismDB {
    /// Storage engine (JSON file, or in-memory for testing).
    storage: Box<dyn StorageEngine>,

    /// Classifier tagging submitted reviews.
    classifier: Box<dyn SentimentClassifier>,

    /// Configuration used to open this database.
    config: Config,
}

impl std::fmt::Debug for TourismDB {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourismDB")
            .field("config", &self.config)
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

impl TourismDB {
    /// Opens the store described by `config`.
    ///
    /// Validates the configuration, then warm-loads the document: a missing
    /// data file is created with the default document, a corrupt one is
    /// backed up and replaced.
    ///
    /// # Errors
    ///
    /// Returns `TourismError::Config` if the configuration is invalid.
    /// Storage problems never fail `open`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tourismdb::{Config, TourismDB};
    ///
    /// let db = TourismDB::open(Config::with_data_path("./data/site.json"))?;
    /// ```
    pub fn open(config: Config) -> Result<Self> {
        let classifier = create_classifier(&config);
        Self::with_classifier(config, classifier)
    }

    /// Opens the store with a custom sentiment classifier.
    pub fn with_classifier(
        config: Config,
        classifier: Box<dyn SentimentClassifier>,
    ) -> Result<Self> {
        let storage = open_storage(&config);
        Self::from_parts(config, storage, classifier)
    }

    /// Builds a TourismDB over an arbitrary storage engine.
    #[instrument(skip_all)]
    pub fn from_parts(
        config: Config,
        storage: Box<dyn StorageEngine>,
        classifier: Box<dyn SentimentClassifier>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| TourismError::config(e.to_string()))?;

        let (doc, outcome) = storage.load_with_outcome();
        info!(
            path = ?storage.path(),
            outcome = ?outcome,
            experiences = doc.experiences.len(),
            events = doc.events.len(),
            trails = doc.trails.len(),
            "TourismDB opened"
        );

        Ok(Self {
            storage,
            classifier,
            config,
        })
    }

    /// Returns a reference to the configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the backing file, if the storage has one.
    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.storage.path()
    }

    // =========================================================================
    // Document access
    // =========================================================================

    /// Loads a fresh, normalized copy of the document.
    pub fn load(&self) -> Document {
        self.storage.load()
    }

    /// Loads the document and reports how it was obtained.
    pub fn load_with_outcome(&self) -> (Document, LoadOutcome) {
        self.storage.load_with_outcome()
    }

    /// Saves the document atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Persistence` if the write fails.
    pub fn save(&self, doc: &Document) -> Result<()> {
        self.storage.save(doc)
    }

    /// Lists the items of one collection, in stored order.
    pub fn list(&self, collection: Collection) -> Vec<Item> {
        self.load().items(collection).to_vec()
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Returns an item's reviews, newest first; empty if it has none.
    pub fn get_reviews(&self, item_id: impl Into<ItemId>) -> Vec<Review> {
        self.load().reviews_for(item_id.into()).to_vec()
    }

    /// Validates, classifies and stores a review for an item.
    ///
    /// Input is validated before the document is touched. With
    /// `Config::lock_writes` the load-modify-save cycle runs under the
    /// exclusive write lock.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the text is blank or too large, or the rating
    ///   is not finite. Nothing is read or written.
    /// - `StorageError::Persistence` if the save fails; the review is then
    ///   not stored.
    /// - `StorageError::Locked` if the write lock times out.
    #[instrument(skip_all)]
    pub fn submit_review(
        &self,
        item_id: impl Into<ItemId>,
        review: NewReview,
    ) -> Result<ReviewSubmission> {
        let item_id = item_id.into();
        validate_new_review(&review)?;

        let _guard = if self.config.lock_writes {
            Some(self.storage.lock()?)
        } else {
            None
        };

        let doc = self.storage.load();
        let (doc, created) = add_review(doc, item_id, review, self.classifier.as_ref())?;
        self.storage.save(&doc)?;

        let reviews = doc.reviews_for(item_id).to_vec();
        info!(
            item_id = %item_id,
            sentiment = %created.sentiment,
            total = reviews.len(),
            "Review submitted"
        );

        Ok(ReviewSubmission {
            review: created,
            reviews,
        })
    }

    /// Count, mean rating and sentiment split of an item's reviews.
    pub fn review_summary(&self, item_id: impl Into<ItemId>) -> ReviewSummary {
        review_summary(&self.load(), item_id.into())
    }

    // =========================================================================
    // Recommendations & search
    // =========================================================================

    /// Most-booked items the user hasn't booked, up to `Config::recommendation_limit`.
    pub fn recommendations(&self, user_id: impl Into<UserId>) -> Vec<Item> {
        recommend(
            &self.load(),
            user_id.into(),
            self.config.recommendation_limit,
        )
    }

    /// Items whose title, name, role or type contain `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Item> {
        search(&self.load(), query)
    }

    /// Like [`TourismDB::search`], restricted by a [`SearchFilter`].
    pub fn search_filtered(&self, query: &str, filter: &SearchFilter) -> Vec<Item> {
        search_filtered(&self.load(), query, filter)
    }
}

// TourismDB is auto Send + Sync: both boxed trait objects require Send + Sync.
