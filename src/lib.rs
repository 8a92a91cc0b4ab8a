//! # TourismDB
//!
//! Single-file JSON document store behind a regional tourism portal.
//!
//! TourismDB keeps the portal's catalog (experiences, events, trails and
//! community entries), bookings and per-item reviews in one human-editable
//! JSON file. On top of it sit a review ledger with sentiment tagging,
//! popularity-based recommendations and case-insensitive search.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tourismdb::{Config, NewReview, TourismDB};
//!
//! // Data file from DATA_JSON_PATH, else ./data/sample_data.json
//! let db = TourismDB::open(Config::from_env())?;
//!
//! // Add a review; it is tagged positive, negative or neutral
//! let submission = db.submit_review(1, NewReview::new("Unforgettable sunrise").with_rating(5.0))?;
//! assert_eq!(submission.reviews[0], submission.review);
//!
//! // Most-booked items the user hasn't booked yet
//! let picks = db.recommendations(103);
//!
//! // Substring search over title, name, role and type
//! let hits = db.search("falls");
//! ```
//!
//! ## Key Concepts
//!
//! ### Document
//!
//! The whole dataset is one [`Document`]. Every load runs it through
//! [`normalize`], which tolerates missing or wrong-typed sections, accepts
//! the legacy `featured_experiences` key and keeps unknown keys intact.
//!
//! ### Self-healing loads
//!
//! A missing data file is created with three seed experiences. A corrupt
//! one is copied to `<file>.corrupt.<UTC timestamp>` and replaced. Loads
//! never fail; only saves and rejected input surface as errors.
//!
//! ### Sentiment
//!
//! Reviews carry one of three labels from a pluggable
//! [`SentimentClassifier`](sentiment::SentimentClassifier). The built-in
//! classifier is a small word-polarity lexicon.
//!
//! ## Thread Safety
//!
//! `TourismDB` is `Send + Sync` and can be shared across threads using `Arc`.
//! Writes are last-writer-wins unless `Config::lock_writes` is enabled.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod db;
mod error;
mod types;

pub mod api;
pub mod sentiment;
pub mod storage;

// Domain modules
mod document;
mod recommend;
mod review;
mod search;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main database interface
pub use db::TourismDB;

// Configuration
pub use config::{Config, SentimentProvider, SyncMode};

// Error handling
pub use error::{Result, StorageError, TourismError, ValidationError};

// Core types
pub use types::{ItemId, UserId};

// Domain types
pub use document::{normalize, Booking, Collection, Document, Item};
pub use review::{
    add_review, list_reviews, review_summary, NewReview, Review, ReviewSubmission, ReviewSummary,
};
pub use sentiment::Sentiment;

// Recommendations & search
pub use recommend::{popularity, recommend};
pub use search::{search, search_filtered, SearchFilter};

// Storage (for advanced users)
pub use storage::LoadOutcome;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common TourismDB usage.
///
/// ```rust
/// use tourismdb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, SyncMode};
    pub use crate::db::TourismDB;
    pub use crate::document::{Collection, Document, Item};
    pub use crate::error::{Result, TourismError};
    pub use crate::review::{NewReview, Review};
    pub use crate::search::SearchFilter;
    pub use crate::sentiment::Sentiment;
    pub use crate::types::{ItemId, UserId};
}
