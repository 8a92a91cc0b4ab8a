//! Transport-agnostic API payloads.
//!
//! Request parsing and response bodies for the four public operations. Each
//! handler returns an [`ApiReply`] holding the status code and JSON body, so
//! any HTTP framework can wrap it in a few lines:
//!
//! | Operation | Success | Body |
//! |-----------|---------|------|
//! | [`get_reviews`] | 200 | `{"reviews": [...]}` |
//! | [`post_review`] | 201 | `{"success": true, "review": {...}, "reviews": [...]}` |
//! | [`get_recommendations`] | 200 | `{"recommendations": [...]}` |
//! | [`search`] | 200 | `{"results": [...]}` |
//!
//! Errors produce `{"error": "message"}` with [`TourismError::status_code`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::db::TourismDB;
use crate::document::Item;
use crate::error::{TourismError, ValidationError};
use crate::review::{rating_from_value, NewReview, Review};
use crate::types::{user_id_from_value, ItemId, UserId};

/// Status code of a successful read.
pub const STATUS_OK: u16 = 200;

/// Status code of a stored review.
pub const STATUS_CREATED: u16 = 201;

/// Status code when a body can't be serialized.
pub const STATUS_INTERNAL: u16 = 500;

/// Message returned when the review text is blank.
pub const EMPTY_REVIEW_TEXT: &str = "empty review text";

/// Body of `GET reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResponse {
    /// Reviews, newest first.
    pub reviews: Vec<Review>,
}

/// Body of a successful `POST review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreated {
    /// Always `true`.
    pub success: bool,
    /// The stored review.
    pub review: Review,
    /// The item's full list after insertion.
    pub reviews: Vec<Review>,
}

/// Body of `GET recommendations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    /// Recommended items, most booked first.
    pub recommendations: Vec<Item>,
}

/// Body of `GET search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching items in pool order.
    pub results: Vec<Item>,
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

impl From<&TourismError> for ErrorBody {
    fn from(err: &TourismError) -> Self {
        let error = match err {
            TourismError::Validation(ValidationError::RequiredField { field }) if field == "text" => {
                EMPTY_REVIEW_TEXT.to_string()
            }
            other => other.to_string(),
        };
        Self { error }
    }
}

/// Status code and JSON body of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// HTTP-equivalent status code.
    pub status: u16,
    /// JSON response body.
    pub body: Value,
}

impl ApiReply {
    fn with_status<T: Serialize>(status: u16, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(e) => {
                warn!(error = %e, "Failed to serialize response body");
                Self {
                    status: STATUS_INTERNAL,
                    body: json!({ "error": e.to_string() }),
                }
            }
        }
    }

    /// 200 with `body`.
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::with_status(STATUS_OK, body)
    }

    /// 201 with `body`.
    pub fn created<T: Serialize>(body: &T) -> Self {
        Self::with_status(STATUS_CREATED, body)
    }

    /// Error reply carrying the error's status code.
    pub fn error(err: &TourismError) -> Self {
        Self::with_status(err.status_code(), &ErrorBody::from(err))
    }

    /// Returns true for 2xx replies.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Body of `POST review`.
///
/// Parsing is forgiving: a missing or malformed body is treated as an empty
/// object, which then fails validation on the blank text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewRequest {
    /// Review text; non-string values count as empty.
    pub text: String,
    /// Rating, if a number or numeric string was given.
    pub rating: Option<f64>,
    /// Author, if an id was given. Kept verbatim.
    pub user_id: Option<UserId>,
}

impl ReviewRequest {
    /// Parses a raw request body.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// Reads the request from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            text: obj
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            rating: obj.get("rating").and_then(rating_from_value),
            user_id: obj.get("user_id").and_then(user_id_from_value),
        }
    }

    /// Converts into the ledger's input type.
    pub fn into_new_review(self) -> NewReview {
        NewReview {
            text: self.text,
            rating: self.rating,
            user_id: self.user_id,
        }
    }
}

/// `GET reviews(item_id)`.
pub fn get_reviews(db: &TourismDB, item_id: impl Into<ItemId>) -> ApiReply {
    ApiReply::ok(&ReviewsResponse {
        reviews: db.get_reviews(item_id),
    })
}

/// `POST review(item_id, body)`.
pub fn post_review(db: &TourismDB, item_id: impl Into<ItemId>, request: ReviewRequest) -> ApiReply {
    match db.submit_review(item_id, request.into_new_review()) {
        Ok(submission) => ApiReply::created(&ReviewCreated {
            success: true,
            review: submission.review,
            reviews: submission.reviews,
        }),
        Err(e) => ApiReply::error(&e),
    }
}

/// `GET recommendations(user_id)`.
pub fn get_recommendations(db: &TourismDB, user_id: impl Into<UserId>) -> ApiReply {
    ApiReply::ok(&RecommendationsResponse {
        recommendations: db.recommendations(user_id),
    })
}

/// `GET search(query)`.
pub fn search(db: &TourismDB, query: &str) -> ApiReply {
    ApiReply::ok(&SearchResponse {
        results: db.search(query),
    })
}
