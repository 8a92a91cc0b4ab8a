//! Review ledger.
//!
//! Per-item review lists layered on the [`Document`]. Lists are append-only
//! and ordered newest first. Functions here mutate the in-memory document
//! only; persisting is the caller's job (see
//! [`TourismDB::submit_review`](crate::TourismDB::submit_review)), so the
//! save can be retried or batched independently.

mod types;
mod validation;

pub use types::{NewReview, Review, ReviewSubmission, ReviewSummary};

pub(crate) use types::rating_from_value;
pub(crate) use validation::validate_new_review;

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::sentiment::{analyze_sentiment, Sentiment, SentimentClassifier};
use crate::types::ItemId;

/// Returns the reviews stored for an item, newest first, or an empty slice.
pub fn list_reviews(doc: &Document, item_id: ItemId) -> &[Review] {
    doc.reviews_for(item_id)
}

/// Adds a review to the front of an item's list.
///
/// The text is trimmed and tagged with the classifier's sentiment. The
/// returned document holds the new review at index 0 of the list keyed by
/// `item_id.review_key()`.
///
/// # Errors
///
/// Returns `ValidationError` if the trimmed text is empty, too large, or the
/// rating is not finite. The document is not touched in that case.
pub fn add_review<C: SentimentClassifier + ?Sized>(
    mut doc: Document,
    item_id: ItemId,
    review: NewReview,
    classifier: &C,
) -> Result<(Document, Review)> {
    validate_new_review(&review)?;

    let text = review.text.trim().to_string();
    let sentiment = analyze_sentiment(classifier, &text);
    let created = Review {
        user_id: review.user_id,
        rating: review.rating.and_then(types::rating_number).map(Value::Number),
        text,
        sentiment,
        extra: Map::new(),
    };

    let list = doc.reviews.entry(item_id.review_key()).or_default();
    list.insert(0, created.clone());

    debug!(
        item_id = %item_id,
        sentiment = %sentiment,
        total = list.len(),
        "Review added"
    );

    Ok((doc, created))
}

/// Summarizes an item's reviews: count, mean rating and sentiment split.
pub fn review_summary(doc: &Document, item_id: ItemId) -> ReviewSummary {
    let reviews = doc.reviews_for(item_id);
    let mut summary = ReviewSummary {
        count: reviews.len(),
        ..Default::default()
    };

    let mut rating_sum = 0.0;
    let mut rated = 0usize;
    for review in reviews {
        match review.sentiment {
            Sentiment::Positive => summary.positive += 1,
            Sentiment::Negative => summary.negative += 1,
            Sentiment::Neutral => summary.neutral += 1,
        }
        if let Some(rating) = review.rating_value() {
            rating_sum += rating;
            rated += 1;
        }
    }

    if rated > 0 {
        summary.average_rating = Some(rating_sum / rated as f64);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{LexiconClassifier, NeutralClassifier};
    use crate::types::UserId;

    #[test]
    fn test_add_review_prepends() {
        let classifier = NeutralClassifier;
        let id = ItemId::new(1);
        let mut doc = Document::new();
        for text in ["A", "B", "C"] {
            doc = add_review(doc, id, NewReview::new(text), &classifier)
                .unwrap()
                .0;
        }
        let texts: Vec<_> = list_reviews(&doc, id).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["C", "B", "A"]);
    }

    #[test]
    fn test_add_review_trims_and_tags() {
        let (doc, review) = add_review(
            Document::new(),
            ItemId::new(2),
            NewReview::new("  Wonderful hosts!  ").with_rating(5.0).with_user(7),
            &LexiconClassifier::new(),
        )
        .unwrap();

        assert_eq!(review.text, "Wonderful hosts!");
        assert_eq!(review.sentiment, Sentiment::Positive);
        assert_eq!(review.user_id, Some(UserId::new(7)));
        assert_eq!(review.rating.as_ref().map(|n| n.to_string()).as_deref(), Some("5"));
        assert!(doc.reviews.contains_key("2"));
        assert_eq!(list_reviews(&doc, ItemId::new(2)), &[review]);
    }

    #[test]
    fn test_add_review_rejects_blank_text() {
        let err = add_review(
            Document::new(),
            ItemId::new(1),
            NewReview::new("   "),
            &NeutralClassifier,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_list_reviews_unknown_item() {
        assert!(list_reviews(&Document::new(), ItemId::new(42)).is_empty());
    }

    #[test]
    fn test_review_summary() {
        let classifier = LexiconClassifier::new();
        let id = ItemId::new(3);
        let mut doc = Document::new();
        for (text, rating) in [
            ("Wonderful waterfall", Some(5.0)),
            ("Terrible road", Some(2.0)),
            ("We went on Sunday", None),
        ] {
            let mut review = NewReview::new(text);
            review.rating = rating;
            doc = add_review(doc, id, review, &classifier).unwrap().0;
        }

        let summary = review_summary(&doc, id);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.positive, 1);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.neutral, 1);
        assert_eq!(summary.average_rating, Some(3.5));
    }

    #[test]
    fn test_review_summary_without_reviews() {
        let summary = review_summary(&Document::new(), ItemId::new(1));
        assert_eq!(summary, ReviewSummary::default());
    }
}
