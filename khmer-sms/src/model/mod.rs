//! Category model abstraction
//!
//! A category model turns normalized text into a predicted label plus
//! whatever scores the backend can provide. Backends live in submodules;
//! [`loader`] resolves a model name to one of them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub mod http;
pub mod keyword;
pub mod loader;

pub use http::HttpModel;
pub use keyword::KeywordModel;
pub use loader::{ModelLoader, ModelManifest, DEFAULT_MODEL_NAME};

/// Scores attached to a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scores {
    /// Probability per label, as reported by the model
    Distribution(HashMap<String, f64>),
    /// A single confidence for the predicted label
    Confidence(f64),
    /// The model reported a label and nothing else
    LabelOnly,
}

/// Raw model output for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label (e.g. "Ham", "Spam")
    pub label: String,
    /// Scores backing the label
    pub scores: Scores,
}

impl Prediction {
    pub fn with_distribution<I, K>(label: impl Into<String>, probabilities: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            label: label.into(),
            scores: Scores::Distribution(
                probabilities
                    .into_iter()
                    .map(|(k, v)| (k.into(), v))
                    .collect(),
            ),
        }
    }

    pub fn with_confidence(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            scores: Scores::Confidence(confidence),
        }
    }

    pub fn label_only(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scores: Scores::LabelOnly,
        }
    }
}

/// Backend failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Transport or HTTP status error
    #[error("HTTP error: {0}")]
    Http(String),

    /// The backend did not answer in time
    #[error("Prediction timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with something we cannot read
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    /// Any other backend failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Category model trait
///
/// Implementations must be callable from several threads at once; the
/// classifier holds one handle and never locks around it.
#[cfg_attr(test, mockall::automock)]
pub trait CategoryModel: Send + Sync {
    /// Predict a label for already-normalized text
    fn predict(&self, text: &str) -> Result<Prediction, ModelError>;

    /// Get model name
    fn model_name(&self) -> &str;
}
