//! Core type definitions for TourismDB identifiers.
//!
//! Item identifiers are integers on the wire. Because the data file is
//! hand-edited, they are read leniently: a JSON integer or a numeric string
//! is accepted, anything else reads as "no id". User identifiers are opaque
//! and keep whatever integer or string the file holds.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Item identifier (experience, event, trail or community entry).
///
/// Review lists are keyed by the decimal string form of this id.
///
/// # Example
/// ```
/// use tourismdb::ItemId;
///
/// let id = ItemId::new(10);
/// assert_eq!(id.review_key(), "10");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Creates an ItemId from its integer value.
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Returns true if the id counts as present (non-zero).
    ///
    /// Zero is treated like a missing id: such items are never recommended.
    #[inline]
    pub const fn is_truthy(&self) -> bool {
        self.0 != 0
    }

    /// Key under which this item's reviews are stored.
    pub fn review_key(&self) -> String {
        self.0.to_string()
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque user identifier.
///
/// TourismDB doesn't handle authentication - the consumer provides user IDs.
/// Most portals use integers, but the data file may carry any string; both
/// forms are written back exactly as they were read.
///
/// Two ids refer to the same user when both read as the same integer
/// (`103` and `"103"`), or otherwise when their text is equal
/// (see [`UserId::refers_to`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Integer id, written as a JSON number.
    Int(i64),
    /// Any other id, written as the original JSON string.
    Text(String),
}

impl UserId {
    /// Creates an integer UserId.
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self::Int(id)
    }

    /// Returns the integer value, parsing numeric text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Returns true if both ids name the same user.
    pub fn refers_to(&self, other: &UserId) -> bool {
        match (self.as_int(), other.as_int()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Reads an integer id from any JSON value, or `None` if it isn't one.
pub(crate) fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a user id from any JSON value.
///
/// Strings are kept verbatim, integral numbers become [`UserId::Int`]. Other
/// numbers keep their textual form; `null`, booleans and containers read as
/// no id.
pub(crate) fn user_id_from_value(value: &Value) -> Option<UserId> {
    match value {
        Value::String(s) => Some(UserId::Text(s.clone())),
        Value::Number(n) => Some(
            id_from_value(value)
                .map(UserId::Int)
                .unwrap_or_else(|| UserId::Text(n.to_string())),
        ),
        _ => None,
    }
}

/// `deserialize_with` helper for optional ids that never fails.
pub(crate) fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_from_value(&value).map(T::from))
}

/// `deserialize_with` helper for optional user ids that never fails.
pub(crate) fn lenient_user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(user_id_from_value(&value))
}
