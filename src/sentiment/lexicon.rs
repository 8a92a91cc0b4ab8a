//! Built-in lexicon-based sentiment classifier.
//!
//! Each known word carries a polarity in `[-1.0, 1.0]`. Intensifiers scale
//! the next polar word, negations ("not", "never", "-n't") flip and dampen
//! it. The text's polarity is the mean over polar words, then mapped to a
//! label with [`Sentiment::from_polarity`].

use std::collections::HashMap;

use super::{Sentiment, SentimentClassifier};

/// Polarity of common review vocabulary.
const POLARITY: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("breathtaking", 0.9),
    ("calm", 0.3),
    ("clean", 0.37),
    ("comfortable", 0.4),
    ("delicious", 1.0),
    ("enjoyed", 0.5),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("friendly", 0.38),
    ("fun", 0.3),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("lovely", 0.5),
    ("loved", 0.7),
    ("magical", 0.5),
    ("memorable", 0.5),
    ("nice", 0.6),
    ("peaceful", 0.5),
    ("perfect", 1.0),
    ("pleasant", 0.73),
    ("recommend", 0.4),
    ("serene", 0.5),
    ("spectacular", 0.8),
    ("stunning", 0.5),
    ("superb", 1.0),
    ("welcoming", 0.5),
    ("wonderful", 1.0),
    ("worth", 0.3),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("crowded", -0.3),
    ("dangerous", -0.6),
    ("dirty", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("expensive", -0.5),
    ("filthy", -0.8),
    ("horrible", -1.0),
    ("overpriced", -0.6),
    ("poor", -0.4),
    ("rough", -0.1),
    ("rude", -0.3),
    ("sad", -0.5),
    ("slow", -0.3),
    ("terrible", -1.0),
    ("unsafe", -0.5),
    ("waste", -0.5),
    ("worst", -1.0),
];

/// Words that scale the next polar word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("bit", 0.5),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("quite", 1.1),
    ("really", 1.3),
    ("slightly", 0.5),
    ("so", 1.2),
    ("somewhat", 0.7),
    ("too", 1.2),
    ("very", 1.3),
];

const NEGATIONS: &[&str] = &["no", "not", "never", "nothing", "hardly", "without"];

/// How many tokens a negation reaches forward.
const NEGATION_WINDOW: u8 = 3;

/// Scale applied to a negated word, which also flips its sign.
const NEGATION_FACTOR: f64 = -0.5;

/// Lexicon-based classifier, the default sentiment provider.
#[derive(Clone, Debug)]
pub struct LexiconClassifier {
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    /// Creates a classifier with the built-in vocabulary.
    pub fn new() -> Self {
        Self {
            polarity: POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Adds or overrides the polarity of a word.
    pub fn with_word(mut self, word: &'static str, polarity: f64) -> Self {
        self.polarity.insert(word, polarity.clamp(-1.0, 1.0));
        self
    }

    /// Mean polarity of the polar words in `text`, `0.0` if there are none.
    pub fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut scores = Vec::new();
        let mut negation_left = 0u8;
        let mut intensity = 1.0;

        for token in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
        {
            if NEGATIONS.contains(&token) || token.ends_with("n't") {
                negation_left = NEGATION_WINDOW;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token) {
                intensity *= factor;
                continue;
            }

            if let Some(&base) = self.polarity.get(token) {
                let mut score = base * intensity;
                if negation_left > 0 {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score.clamp(-1.0, 1.0));
                negation_left = 0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            intensity = 1.0;
        }

        if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_polarity(self.polarity(text))
    }
}
