//! Entry types stored in the document's collections.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::{id_from_value, lenient_id, lenient_user_id, ItemId, UserId};

/// A bookable or browsable entity: experience, event, trail or community entry.
///
/// Every field is optional because the data file is edited by hand. Fields
/// this crate doesn't know about are kept in `extra` and written back as-is.
///
/// Text fields accept strings; numbers and booleans are read as their
/// textual form, anything else reads as absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier. Items without a non-zero id are never recommended.
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ItemId>,

    /// Display title (experiences, events, trails).
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// Person or place name (community entries).
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Role of a community member ("Guide", "Artisan", ...).
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,

    /// Category label ("Eco Tourism", "Cultural", ...).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    /// Free-form description.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub desc: Option<String>,

    /// Price as written in the file; usually a formatted string like `"₹2,500"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,

    /// Image file name relative to the static image directory.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,

    /// Unknown fields, preserved across load/save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Creates an item with an id and a title.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: Some(ItemId::new(id)),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Sets the category label.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns the id only if it counts as present (non-zero).
    pub fn truthy_id(&self) -> Option<ItemId> {
        self.id.filter(ItemId::is_truthy)
    }

    /// The text fields searched by substring queries, missing ones as `""`.
    pub fn search_fields(&self) -> [&str; 4] {
        [
            self.title.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
            self.role.as_deref().unwrap_or_default(),
            self.kind.as_deref().unwrap_or_default(),
        ]
    }
}

/// A booking of an item by a user. Only used for popularity counting.
///
/// Both ids are kept as stored so that rewriting the file never changes a
/// booking; [`Booking::item`] reads the item id leniently.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Who booked.
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<UserId>,

    /// What was booked, as stored.
    #[serde(default)]
    pub item_id: Option<Value>,

    /// Unknown fields, preserved across load/save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Booking {
    /// Creates a booking of `item_id` by `user_id`.
    pub fn new(user_id: impl Into<UserId>, item_id: i64) -> Self {
        Self {
            user_id: Some(user_id.into()),
            item_id: Some(Value::from(item_id)),
            extra: Map::new(),
        }
    }

    /// The booked item, if the stored id is an integer or a numeric string.
    pub fn item(&self) -> Option<ItemId> {
        self.item_id.as_ref().and_then(id_from_value).map(ItemId::new)
    }

    /// Returns true if this booking was made by `user_id`.
    pub fn is_by(&self, user_id: &UserId) -> bool {
        self.user_id.as_ref().is_some_and(|u| u.refers_to(user_id))
    }
}

/// The browsable item collections of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Curated experiences (legacy alias `featured_experiences`).
    Experiences,
    /// Local hosts, guides and artisans.
    Community,
    /// Dated events and festivals.
    Events,
    /// Hiking and heritage trails.
    Trails,
}

impl Collection {
    /// All collections, in search pool order.
    pub const ALL: [Collection; 4] = [
        Collection::Experiences,
        Collection::Community,
        Collection::Events,
        Collection::Trails,
    ];

    /// The top-level JSON key of this collection.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Experiences => "experiences",
            Self::Community => "community",
            Self::Events => "events",
            Self::Trails => "trails",
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}
