//! Review data types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::sentiment::Sentiment;
use crate::types::{lenient_user_id, UserId};

/// A stored user review of an item.
///
/// Serialized with all four fields present (`null` for a missing user or
/// rating), matching the file format the site's frontend reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer, if known.
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<UserId>,

    /// Review text, trimmed. Never empty once stored.
    #[serde(default, deserialize_with = "lenient_review_text")]
    pub text: String,

    /// Star rating exactly as stored, if any. Hand-edited files may hold
    /// `"4"` instead of `4`; the value is written back untouched.
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<Value>,

    /// Polarity tag assigned at submission time.
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Sentiment,

    /// Unknown fields, preserved across load/save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    /// Returns the rating as a float, if present.
    pub fn rating_value(&self) -> Option<f64> {
        self.rating.as_ref().and_then(rating_from_value)
    }

    /// Returns true if the text is blank. Such reviews are never stored.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Input for submitting a new review.
///
/// # Example
///
/// ```rust
/// use tourismdb::NewReview;
///
/// let review = NewReview::new("Breathtaking sunrise, worth the early start")
///     .with_rating(5.0)
///     .with_user(103);
/// assert_eq!(review.rating, Some(5.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    /// Review text. Must not be blank after trimming.
    #[serde(default)]
    pub text: String,

    /// Optional star rating. Must be finite.
    #[serde(default)]
    pub rating: Option<f64>,

    /// Optional reviewer.
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<UserId>,
}

impl NewReview {
    /// Creates a review with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the reviewer.
    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Result of a successful review submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReviewSubmission {
    /// The review that was stored.
    pub review: Review,
    /// The item's full review list after the submission, newest first.
    pub reviews: Vec<Review>,
}

/// Aggregate view of an item's reviews.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReviewSummary {
    /// Number of stored reviews.
    pub count: usize,
    /// Mean of the ratings that are present, if any.
    pub average_rating: Option<f64>,
    /// Reviews tagged positive.
    pub positive: usize,
    /// Reviews tagged negative.
    pub negative: usize,
    /// Reviews tagged neutral.
    pub neutral: usize,
}

/// Converts a rating to a JSON number, keeping whole numbers integral (`4`, not `4.0`).
pub(crate) fn rating_number(rating: f64) -> Option<Number> {
    if rating.fract() == 0.0 && rating.abs() < i64::MAX as f64 {
        Some(Number::from(rating as i64))
    } else {
        Number::from_f64(rating)
    }
}

/// Reads a rating from a number or a numeric string.
pub(crate) fn rating_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|r| r.is_finite()),
        _ => None,
    }
}

fn lenient_review_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(other),
    })
}

fn lenient_sentiment<'de, D>(deserializer: D) -> Result<Sentiment, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => Sentiment::Neutral,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_review_serializes_all_fields() {
        let review = Review {
            user_id: None,
            text: "Lovely".into(),
            rating: None,
            sentiment: Sentiment::Positive,
            extra: Map::new(),
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(
            value,
            json!({ "user_id": null, "text": "Lovely", "rating": null, "sentiment": "positive" })
        );
    }

    #[test]
    fn test_review_lenient_fields() {
        let review: Review = serde_json::from_value(json!({
            "user_id": "7",
            "text": "ok",
            "rating": "4",
            "sentiment": "ecstatic",
            "date": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(review.user_id, Some(UserId::from("7")));
        assert_eq!(review.rating_value(), Some(4.0));
        assert_eq!(review.sentiment, Sentiment::Neutral);
        assert_eq!(review.extra.get("date"), Some(&json!("2024-01-01")));

        let written = serde_json::to_value(&review).unwrap();
        assert_eq!(written["user_id"], json!("7"));
        assert_eq!(written["rating"], json!("4"));
    }

    #[test]
    fn test_text_user_id_is_kept() {
        let review: Review =
            serde_json::from_value(json!({ "user_id": "alice", "text": "ok" })).unwrap();
        assert_eq!(review.user_id, Some(UserId::from("alice")));
        let written = serde_json::to_value(&review).unwrap();
        assert_eq!(written["user_id"], json!("alice"));
    }

    #[test]
    fn test_rating_from_value() {
        assert_eq!(rating_from_value(&json!(4)), Some(4.0));
        assert_eq!(rating_from_value(&json!(" 3.5 ")), Some(3.5));
        assert_eq!(rating_from_value(&json!("five")), None);
        assert_eq!(rating_from_value(&json!("NaN")), None);
        assert_eq!(rating_from_value(&json!(true)), None);
    }

    #[test]
    fn test_rating_number_keeps_integers_integral() {
        assert_eq!(rating_number(4.0).unwrap().to_string(), "4");
        assert_eq!(rating_number(4.5).unwrap().to_string(), "4.5");
        assert!(rating_number(f64::NAN).is_none());
    }

    #[test]
    fn test_new_review_from_payload() {
        let review: NewReview =
            serde_json::from_value(json!({ "text": "Great", "rating": 4, "user_id": 123 }))
                .unwrap();
        assert_eq!(review, NewReview::new("Great").with_rating(4.0).with_user(123));
    }

    #[test]
    fn test_blank_review() {
        let review: Review = serde_json::from_value(json!({ "text": "   " })).unwrap();
        assert!(review.is_blank());
    }
}
