//! The persisted document and its normalization.
//!
//! A [`Document`] is the whole persisted state of the site: item collections,
//! bookings and reviews. It is always built through [`normalize`], so a
//! `Document` value satisfies these invariants by construction:
//!
//! - all collections exist, even if the file omitted them
//! - experiences are held once; the legacy `featured_experiences` key is
//!   produced on serialization and can't diverge
//! - stored reviews have non-blank text, keyed by string item id
//!
//! # Normalization
//!
//! ```text
//! raw JSON value ──► normalize() ──► Document ──► serialize ──► JSON value
//!                        ▲                                         │
//!                        └──────────── (idempotent) ───────────────┘
//! ```

pub mod types;

pub use types::{Booking, Collection, Item};

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::review::Review;
use crate::storage::schema::LEGACY_EXPERIENCES_KEY;
use crate::types::ItemId;

/// The single persisted aggregate root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// Curated experiences. Written to disk under both `experiences` and
    /// `featured_experiences`.
    pub experiences: Vec<Item>,

    /// Events and festivals.
    pub events: Vec<Item>,

    /// Trails.
    pub trails: Vec<Item>,

    /// Community members (hosts, guides, artisans). Written only when non-empty.
    pub community: Vec<Item>,

    /// All bookings, used for popularity.
    pub bookings: Vec<Booking>,

    /// Reviews per item id (string form), newest first.
    pub reviews: BTreeMap<String, Vec<Review>>,

    /// Unknown top-level keys, preserved across load/save.
    ///
    /// Entries named like a modeled collection are ignored on serialization.
    pub extra: Map<String, Value>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The experiences under their legacy name. Always the same list as
    /// [`Document::experiences`].
    #[inline]
    pub fn featured_experiences(&self) -> &[Item] {
        &self.experiences
    }

    /// Returns the items of a collection.
    pub fn items(&self, collection: Collection) -> &[Item] {
        match collection {
            Collection::Experiences => &self.experiences,
            Collection::Community => &self.community,
            Collection::Events => &self.events,
            Collection::Trails => &self.trails,
        }
    }

    /// Returns the reviews stored for an item, newest first.
    pub fn reviews_for(&self, item_id: ItemId) -> &[Review] {
        self.reviews
            .get(&item_id.review_key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Renders the document as the JSON value written to disk.
    pub fn to_value(&self) -> Value {
        // Serializing plain maps, vectors and strings cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Builds a [`Document`] from any JSON value.
///
/// Pure and total: never fails, never performs I/O.
///
/// - A non-object value yields an empty document.
/// - `experiences` comes from `experiences` when it is an array, else from
///   `featured_experiences`, else is empty.
/// - Collections of the wrong type become empty.
/// - Entries that aren't objects are dropped, as are reviews with blank text
///   and review lists that aren't arrays.
/// - Unknown top-level keys are kept.
///
/// Normalizing the serialized form of a normalized document returns the
/// same document.
pub fn normalize(value: Value) -> Document {
    let mut map = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let experiences = take_array(&mut map, "experiences");
    let featured = take_array(&mut map, LEGACY_EXPERIENCES_KEY);
    let experiences = items_from(experiences.or(featured).unwrap_or_default());

    let events = items_from(take_array(&mut map, "events").unwrap_or_default());
    let trails = items_from(take_array(&mut map, "trails").unwrap_or_default());
    let community = items_from(take_array(&mut map, "community").unwrap_or_default());

    let bookings: Vec<Booking> = take_array(&mut map, "bookings")
        .unwrap_or_default()
        .into_iter()
        .filter_map(entry_from)
        .collect();

    let reviews = match map.remove("reviews") {
        Some(Value::Object(lists)) => lists
            .into_iter()
            .filter_map(|(key, list)| match list {
                Value::Array(entries) => {
                    let reviews: Vec<Review> = entries
                        .into_iter()
                        .filter_map(entry_from::<Review>)
                        .filter(|r| !r.is_blank())
                        .collect();
                    Some((key, reviews))
                }
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    };

    Document {
        experiences,
        events,
        trails,
        community,
        bookings,
        reviews,
        extra: map,
    }
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    match map.remove(key) {
        Some(Value::Array(entries)) => Some(entries),
        _ => None,
    }
}

fn items_from(entries: Vec<Value>) -> Vec<Item> {
    entries.into_iter().filter_map(entry_from).collect()
}

/// Deserializes one collection entry; only JSON objects qualify.
fn entry_from<T: serde::de::DeserializeOwned>(value: Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Top-level keys written from the modeled fields.
const MODELED_KEYS: [&str; 7] = [
    "experiences",
    LEGACY_EXPERIENCES_KEY,
    "events",
    "trails",
    "community",
    "bookings",
    "reviews",
];

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("experiences", &self.experiences)?;
        map.serialize_entry(LEGACY_EXPERIENCES_KEY, &self.experiences)?;
        map.serialize_entry("events", &self.events)?;
        map.serialize_entry("trails", &self.trails)?;
        if !self.community.is_empty() {
            map.serialize_entry("community", &self.community)?;
        }
        map.serialize_entry("bookings", &self.bookings)?;
        map.serialize_entry("reviews", &self.reviews)?;
        for (key, value) in &self.extra {
            if !MODELED_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::Sentiment;
    use serde_json::json;

    #[test]
    fn test_normalize_empty_object_creates_all_collections() {
        let doc = normalize(json!({}));
        assert_eq!(doc, Document::default());

        let value = doc.to_value();
        for key in [
            "experiences",
            "featured_experiences",
            "events",
            "trails",
            "bookings",
            "reviews",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value.get("community").is_none());
    }

    #[test]
    fn test_normalize_non_object() {
        assert_eq!(normalize(json!([1, 2, 3])), Document::default());
        assert_eq!(normalize(Value::Null), Document::default());
    }

    #[test]
    fn test_backfills_experiences_from_legacy_key() {
        let doc = normalize(json!({
            "featured_experiences": [{ "id": 1, "title": "Netarhat Sunrise Point" }]
        }));
        assert_eq!(doc.experiences.len(), 1);
        assert_eq!(doc.featured_experiences(), doc.experiences.as_slice());
    }

    #[test]
    fn test_experiences_wins_over_legacy_key() {
        let doc = normalize(json!({
            "experiences": [{ "id": 2, "title": "New" }],
            "featured_experiences": [{ "id": 1, "title": "Old" }]
        }));
        assert_eq!(doc.experiences, vec![Item::new(2, "New")]);

        let value = doc.to_value();
        assert_eq!(value["experiences"], value["featured_experiences"]);
    }

    #[test]
    fn test_wrong_typed_experiences_fall_back_to_legacy() {
        let doc = normalize(json!({
            "experiences": "oops",
            "featured_experiences": [{ "id": 1, "title": "Old" }]
        }));
        assert_eq!(doc.experiences, vec![Item::new(1, "Old")]);
    }

    #[test]
    fn test_wrong_typed_collections_become_empty() {
        let doc = normalize(json!({
            "events": {},
            "trails": 5,
            "bookings": "none",
            "reviews": []
        }));
        assert!(doc.events.is_empty());
        assert!(doc.trails.is_empty());
        assert!(doc.bookings.is_empty());
        assert!(doc.reviews.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let doc = normalize(json!({
            "events": [1, "x", { "id": 4, "title": "Sarhul Festival" }],
            "reviews": {
                "4": [{ "text": "  " }, { "text": "Colourful!", "sentiment": "positive" }, 7],
                "5": "not a list"
            }
        }));
        assert_eq!(doc.events, vec![Item::new(4, "Sarhul Festival")]);
        assert_eq!(doc.reviews.len(), 1);
        let reviews = doc.reviews_for(ItemId::new(4));
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_unknown_top_level_keys_survive() {
        let doc = normalize(json!({ "site_name": "Jharkhand Tourism" }));
        assert_eq!(doc.extra.get("site_name"), Some(&json!("Jharkhand Tourism")));
        assert_eq!(doc.to_value()["site_name"], json!("Jharkhand Tourism"));
    }

    #[test]
    fn test_extra_cannot_shadow_collections() {
        let mut doc = Document::new();
        doc.experiences.push(Item::new(1, "Real"));
        doc.extra.insert("featured_experiences".into(), json!("stale"));

        let value = doc.to_value();
        assert_eq!(value["featured_experiences"], value["experiences"]);
        assert_eq!(normalize(value), Document { extra: Map::new(), ..doc });
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "featured_experiences": [{ "id": "1", "title": "A", "extra": true }, 3],
            "community": [{ "id": 9, "name": "Sita Devi", "role": "Artisan" }],
            "bookings": [{ "user_id": 1, "item_id": 1 }, { "item_id": "x" }],
            "reviews": { "1": [{ "text": "ok", "rating": 4 }] },
            "theme": { "hero": "jharkhand.jpg" }
        });
        let once = normalize(raw);
        let twice = normalize(once.to_value());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let doc: Document = serde_json::from_str(r#"{"trails": [{"id": 5}]}"#).unwrap();
        assert_eq!(doc.trails.len(), 1);
        assert!(doc.experiences.is_empty());
    }

    #[test]
    fn test_reviews_for_missing_item() {
        assert!(Document::new().reviews_for(ItemId::new(99)).is_empty());
    }
}
