//! Input validation for reviews.
//!
//! Runs before any mutation or I/O, so a rejected submission leaves the
//! stored reviews untouched.
//!
//! ```text
//! TourismDB::submit_review()
//!     ├── validate_new_review()     ← text, rating
//!     └── load → add_review → save  ← only reached if valid
//! ```

use crate::error::{TourismError, ValidationError};
use crate::review::types::NewReview;
use crate::storage::schema::MAX_REVIEW_TEXT_SIZE;

/// Validates a [`NewReview`] before it is added.
///
/// # Rules
///
/// | Field | Constraint |
/// |-------|------------|
/// | `text` | Non-blank after trimming, max 5 000 bytes trimmed |
/// | `rating` | Finite when present |
pub(crate) fn validate_new_review(review: &NewReview) -> Result<(), TourismError> {
    let text = review.text.trim();

    if text.is_empty() {
        return Err(ValidationError::required_field("text").into());
    }

    if text.len() > MAX_REVIEW_TEXT_SIZE {
        return Err(ValidationError::content_too_large(text.len(), MAX_REVIEW_TEXT_SIZE).into());
    }

    if let Some(rating) = review.rating {
        if !rating.is_finite() {
            return Err(ValidationError::invalid_field(
                "rating",
                format!("must be a finite number, got {}", rating),
            )
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_review() {
        assert!(validate_new_review(&NewReview::new("Great trek").with_rating(4.0)).is_ok());
        assert!(validate_new_review(&NewReview::new("No rating given")).is_ok());
    }

    #[test]
    fn test_empty_text_rejected() {
        for text in ["", "   ", "\n\t "] {
            let err = validate_new_review(&NewReview::new(text)).unwrap_err();
            assert!(err.is_validation(), "{:?} should be rejected", text);
        }
    }

    #[test]
    fn test_text_too_large() {
        let review = NewReview::new("a".repeat(MAX_REVIEW_TEXT_SIZE + 1));
        let err = validate_new_review(&review).unwrap_err();
        assert!(matches!(
            err,
            TourismError::Validation(ValidationError::ContentTooLarge { .. })
        ));
    }

    #[test]
    fn test_padding_does_not_count_towards_size() {
        let text = format!("  {}  ", "a".repeat(MAX_REVIEW_TEXT_SIZE));
        assert!(validate_new_review(&NewReview::new(text)).is_ok());
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        for rating in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let review = NewReview::new("fine").with_rating(rating);
            assert!(validate_new_review(&review).is_err());
        }
    }
}
