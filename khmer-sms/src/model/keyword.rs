//! Keyword model backend
//!
//! Deterministic stand-in for a trained model, used for demos and tests. It
//! counts spam markers in the text and reports a single confidence for the
//! resulting label.

use super::{CategoryModel, ModelError, Prediction};
use tracing::debug;

/// Spam probability when no marker matches
const BASE_SPAM_PROBABILITY: f64 = 0.2;

/// Built-in spam markers (Khmer and English)
const DEFAULT_SPAM_KEYWORDS: &[&str] = &[
    // "you have won a prize"
    "ឈ្នះរង្វាន់",
    // "receive money"
    "ទទួលបានប្រាក់",
    // "click the link"
    "ចុចតំណ",
    // "hurry up"
    "ប្រញាប់ឡើង",
    // "free of charge"
    "ឥតគិតថ្លៃ",
    "http",
    "www.",
    "winner",
    "prize",
    "click here",
    "free",
    "urgent",
];

/// Keyword-counting model
pub struct KeywordModel {
    model_name: String,
    keywords: Vec<String>,
}

impl KeywordModel {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self::with_keywords(
            model_name,
            DEFAULT_SPAM_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        )
    }

    /// Create a model with custom markers; an empty list falls back to the built-in set
    pub fn with_keywords(model_name: impl Into<String>, keywords: Vec<String>) -> Self {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            return Self::new(model_name);
        }

        Self {
            model_name: model_name.into(),
            keywords,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Number of distinct markers present in `text`.
    ///
    /// Markers match as plain case-insensitive substrings with no word
    /// boundaries, so `free` also counts inside `carefree`.
    fn count_matches(&self, text: &str) -> usize {
        let text_lower = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|keyword| text_lower.contains(keyword.as_str()))
            .count()
    }

    /// Each match halves the remaining ham probability
    fn spam_probability(matches: usize) -> f64 {
        let exponent = i32::try_from(matches).unwrap_or(i32::MAX);
        1.0 - (1.0 - BASE_SPAM_PROBABILITY) * 0.5f64.powi(exponent)
    }
}

impl Default for KeywordModel {
    fn default() -> Self {
        Self::new(super::DEFAULT_MODEL_NAME)
    }
}

impl CategoryModel for KeywordModel {
    fn predict(&self, text: &str) -> Result<Prediction, ModelError> {
        let matches = self.count_matches(text);
        let spam_probability = Self::spam_probability(matches);

        debug!("KeywordModel: {} markers matched, spam probability {:.2}", matches, spam_probability);

        let prediction = if spam_probability >= 0.5 {
            Prediction::with_confidence("Spam", spam_probability)
        } else {
            Prediction::with_confidence("Ham", 1.0 - spam_probability)
        };

        Ok(prediction)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
