//! SMS categories and classification results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category assigned to a short message
///
/// Variants are declared in label order, so the derived `Ord` sorts
/// categories the same way their names sort. Tie-breaking relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SmsCategory {
    /// Legitimate message
    Ham,
    /// Unsolicited or fraudulent message
    Spam,
    /// No usable prediction
    Unknown,
}

impl SmsCategory {
    /// Label used on the wire and in model output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ham => "Ham",
            Self::Spam => "Spam",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a model label to a known category.
    ///
    /// Only `"Ham"` and `"Spam"` are recognized; anything else, including
    /// `"Unknown"`, returns `None`.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label {
            "Ham" => Some(Self::Ham),
            "Spam" => Some(Self::Spam),
            _ => None,
        }
    }

    /// The other known category (Ham <-> Spam)
    pub fn opposite(&self) -> Option<Self> {
        match self {
            Self::Ham => Some(Self::Spam),
            Self::Spam => Some(Self::Ham),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for SmsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying one message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning category
    pub category: SmsCategory,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(category: SmsCategory, confidence: f64) -> Self {
        Self {
            category,
            confidence,
        }
    }

    /// Result reported when no confidence is available at all
    pub fn unknown() -> Self {
        Self::new(SmsCategory::Unknown, 0.0)
    }

    pub fn is_spam(&self) -> bool {
        self.category == SmsCategory::Spam
    }
}

/// Per-category confidence scores for one message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceMap(BTreeMap<SmsCategory, f64>);

impl ConfidenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{Unknown: 1.0}`, the answer given when no prediction could be made
    pub fn unknown() -> Self {
        let mut map = Self::new();
        map.insert(SmsCategory::Unknown, 1.0);
        map
    }

    /// Two-entry map over the known categories
    pub fn from_ham_spam(ham: f64, spam: f64) -> Self {
        let mut map = Self::new();
        map.insert(SmsCategory::Ham, ham);
        map.insert(SmsCategory::Spam, spam);
        map
    }

    /// Confidence `c` for `category` and `1.0 - c` for its opposite.
    ///
    /// `Unknown` has no opposite and yields a single entry.
    pub fn with_complement(category: SmsCategory, confidence: f64) -> Self {
        let mut map = Self::new();
        map.insert(category, confidence);
        if let Some(other) = category.opposite() {
            map.insert(other, 1.0 - confidence);
        }
        map
    }

    pub fn insert(&mut self, category: SmsCategory, confidence: f64) -> Option<f64> {
        self.0.insert(category, confidence)
    }

    pub fn get(&self, category: SmsCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SmsCategory, f64)> + '_ {
        self.0.iter().map(|(category, confidence)| (*category, *confidence))
    }

    /// Entry with the highest confidence.
    ///
    /// Ties go to the category whose label sorts first. Returns `None` for an
    /// empty map.
    pub fn top(&self) -> Option<ClassificationResult> {
        let mut best: Option<ClassificationResult> = None;
        // Ascending key order: a later entry only wins with a strictly higher score
        for (category, confidence) in self.iter() {
            match best {
                Some(current) if confidence <= current.confidence => {}
                _ => best = Some(ClassificationResult::new(category, confidence)),
            }
        }
        best
    }

    pub fn into_inner(self) -> BTreeMap<SmsCategory, f64> {
        self.0
    }
}

impl FromIterator<(SmsCategory, f64)> for ConfidenceMap {
    fn from_iter<I: IntoIterator<Item = (SmsCategory, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
