//! Data file layout, limits and the default document.
//!
//! # File Layout
//!
//! ```text
//! {
//!   "experiences":          [ {id, title, desc, price, type, image}, ... ],
//!   "featured_experiences": [ ... same list, legacy alias ... ],
//!   "events":               [ ... ],
//!   "trails":               [ ... ],
//!   "community":            [ {id, name, role, ...}, ... ],   (optional)
//!   "bookings":             [ {user_id, item_id}, ... ],
//!   "reviews":              { "<item_id>": [ {user_id, text, rating, sentiment}, ... ] }
//! }
//! ```
//!
//! Next to `<file>` the store may create:
//! - `<file>.<uuid>.tmp` - in-flight save, renamed over `<file>` on success
//! - `<file>.corrupt.<UTC timestamp>` - backup of an unparseable file
//! - `<file>.lock` - advisory write lock (only with `lock_writes`)

use serde_json::json;

use crate::document::{Document, Item};

/// Environment variable overriding the data file location.
pub const DATA_PATH_ENV: &str = "DATA_JSON_PATH";

/// Directory holding the data file when no override is set.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the data file when no override is set.
pub const DEFAULT_DATA_FILE: &str = "sample_data.json";

/// Legacy key under which older templates read the experiences list.
pub const LEGACY_EXPERIENCES_KEY: &str = "featured_experiences";

/// Number of recommendations returned by default.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

/// Maximum review text size in bytes (after trimming).
pub const MAX_REVIEW_TEXT_SIZE: usize = 5_000;

/// Infix between the data file name and the backup timestamp.
pub const CORRUPT_BACKUP_INFIX: &str = "corrupt";

/// `chrono` format of the backup timestamp, e.g. `20240131T235959Z`.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Extension of in-flight save files.
pub const TEMP_EXTENSION: &str = "tmp";

/// Extension of the advisory lock file.
pub const LOCK_EXTENSION: &str = "lock";

/// The document written when the data file is missing or corrupt.
///
/// Three seed experiences and empty events, trails, bookings and reviews.
pub fn default_document() -> Document {
    let seed = |id: i64, title: &str, desc: &str, price: &str, kind: &str, image: &str| Item {
        desc: Some(desc.to_string()),
        price: Some(json!(price)),
        image: Some(image.to_string()),
        ..Item::new(id, title).with_kind(kind)
    };

    Document {
        experiences: vec![
            seed(
                1,
                "Netarhat Sunrise Point",
                "Experience breathtaking sunrises, pine forests, and stargazing.",
                "₹2,500",
                "Eco Tourism",
                "netarhat.jpg",
            ),
            seed(
                2,
                "Santhal Village Immersion",
                "Live with Santhal families, learn traditional crafts and ceremonies.",
                "₹4,200",
                "Cultural",
                "jharkhand.jpg",
            ),
            seed(
                3,
                "Hundru Falls Adventure",
                "Trek to the majestic 320-foot waterfall and camp under the stars.",
                "₹1,800",
                "Adventure",
                "Hundrufalls.jpg",
            ),
        ],
        ..Document::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_shape() {
        let doc = default_document();
        assert_eq!(doc.experiences.len(), 3);
        assert!(doc.events.is_empty());
        assert!(doc.trails.is_empty());
        assert!(doc.bookings.is_empty());
        assert!(doc.reviews.is_empty());

        let ids: Vec<_> = doc.experiences.iter().filter_map(|i| i.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(
            doc.experiences[0].title.as_deref(),
            Some("Netarhat Sunrise Point")
        );
    }

    #[test]
    fn test_default_document_writes_legacy_alias() {
        let value = serde_json::to_value(default_document()).unwrap();
        assert_eq!(value["experiences"], value[LEGACY_EXPERIENCES_KEY]);
        assert_eq!(value["reviews"], serde_json::json!({}));
    }
}
