//! Sentiment classification abstractions for TourismDB.
//!
//! Reviews are tagged with a coarse polarity label when they are submitted.
//! The classifier is a black box behind [`SentimentClassifier`] so it can be
//! swapped or stubbed without pulling in an NLP dependency.
//!
//! # Providers
//!
//! - [`LexiconClassifier`] - Built-in word-polarity lexicon (default)
//! - [`NeutralClassifier`] - Tags everything neutral (classification disabled)
//!
//! # Example
//!
//! ```rust
//! use tourismdb::sentiment::{analyze_sentiment, LexiconClassifier, Sentiment};
//!
//! let classifier = LexiconClassifier::new();
//! assert_eq!(analyze_sentiment(&classifier, "Absolutely beautiful trek"), Sentiment::Positive);
//! assert_eq!(analyze_sentiment(&classifier, "   "), Sentiment::Neutral);
//! ```

mod lexicon;

pub use lexicon::LexiconClassifier;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{Config, SentimentProvider};

/// Coarse polarity of a piece of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Favourable.
    Positive,
    /// Unfavourable.
    Negative,
    /// Neither, mixed, or unknown.
    #[default]
    Neutral,
}

impl Sentiment {
    /// The wire label of this sentiment.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Maps a polarity score in `[-1.0, 1.0]` to a label.
    ///
    /// Scores strictly above `0.1` are positive, strictly below `-0.1`
    /// negative, everything in between (and NaN) neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POLARITY_THRESHOLD {
            Self::Positive
        } else if polarity < -POLARITY_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// Dead zone around zero inside which text counts as neutral.
pub const POLARITY_THRESHOLD: f64 = 0.1;

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sentiment label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSentiment(pub String);

impl fmt::Display for UnknownSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sentiment label: {}", self.0)
    }
}

impl std::error::Error for UnknownSentiment {}

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(UnknownSentiment(s.to_string())),
        }
    }
}

/// Sentiment classifier trait.
///
/// Implementations must be thread-safe (`Send + Sync`) so a single
/// classifier can serve concurrent requests.
///
/// # Implementing a Custom Classifier
///
/// ```rust
/// use tourismdb::sentiment::{Sentiment, SentimentClassifier};
///
/// struct AlwaysPositive;
///
/// impl SentimentClassifier for AlwaysPositive {
///     fn classify(&self, _text: &str) -> Sentiment {
///         Sentiment::Positive
///     }
/// }
/// ```
pub trait SentimentClassifier: Send + Sync {
    /// Classifies non-blank text.
    ///
    /// Callers should go through [`analyze_sentiment`], which handles
    /// blank text without invoking the classifier.
    fn classify(&self, text: &str) -> Sentiment;
}

impl<T: SentimentClassifier + ?Sized> SentimentClassifier for Box<T> {
    fn classify(&self, text: &str) -> Sentiment {
        (**self).classify(text)
    }
}

/// Classifies `text`, mapping empty or whitespace-only text to
/// [`Sentiment::Neutral`] without calling the classifier.
pub fn analyze_sentiment<C: SentimentClassifier + ?Sized>(classifier: &C, text: &str) -> Sentiment {
    if text.trim().is_empty() {
        return Sentiment::Neutral;
    }
    classifier.classify(text)
}

/// Classifier that tags every text as neutral.
///
/// Used when sentiment tagging is disabled in the configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralClassifier;

impl SentimentClassifier for NeutralClassifier {
    fn classify(&self, _text: &str) -> Sentiment {
        Sentiment::Neutral
    }
}

/// Creates a sentiment classifier based on the configuration.
pub fn create_classifier(config: &Config) -> Box<dyn SentimentClassifier> {
    match config.sentiment {
        SentimentProvider::Lexicon => Box::new(LexiconClassifier::new()),
        SentimentProvider::Disabled => Box::new(NeutralClassifier),
    }
}
