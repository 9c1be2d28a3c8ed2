//! SMS classifier
//!
//! Normalizes a message, runs it through the category model and turns the
//! raw prediction into a [`ConfidenceMap`]. The plain operations always
//! answer: any failure becomes `{Unknown: 1.0}`. The `try_` variants report
//! why no answer could be produced.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::category::{ClassificationResult, ConfidenceMap, SmsCategory};
use crate::config::Config;
use crate::model::{CategoryModel, ModelError, ModelLoader, Prediction, Scores};
use crate::normalizer::normalize_khmer_text;

/// Reasons a message could not be classified
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// No model handle (loading failed at construction)
    #[error("Model '{model_name}' is unavailable: {reason}")]
    ModelUnavailable { model_name: String, reason: String },

    /// The model was called and failed
    #[error("Prediction with model '{model_name}' failed: {source}")]
    PredictionFailed {
        model_name: String,
        #[source]
        source: ModelError,
    },

    /// The model answered with a label outside Ham/Spam
    #[error("Model returned unrecognized label '{0}'")]
    UnrecognizedLabel(String),
}

/// Spam/ham classifier bound to one model handle
pub struct Classifier {
    model_name: String,
    model: Option<Box<dyn CategoryModel>>,
    load_error: Option<String>,
}

impl Classifier {
    /// Resolve `model_name` (or the default model) through `loader`.
    ///
    /// Never fails: if the model cannot be loaded the classifier stays
    /// usable and answers `Unknown` for every message.
    pub fn new(model_name: Option<&str>, loader: &ModelLoader) -> Self {
        let model_name = model_name.unwrap_or(crate::model::DEFAULT_MODEL_NAME);

        match loader.load(model_name) {
            Ok(model) => {
                info!("Successfully loaded model '{}'", model_name);
                Self {
                    model_name: model_name.to_string(),
                    model: Some(model),
                    load_error: None,
                }
            }
            Err(e) => {
                warn!(
                    "Failed to load model '{}': {}. Classification will return Unknown",
                    model_name, e
                );
                Self::unavailable(model_name, e.to_string())
            }
        }
    }

    /// Build from configuration
    pub fn from_config(config: &Config) -> Self {
        let loader = ModelLoader::new(config.classifier.model_dir.clone());
        Self::new(Some(config.classifier.model_name()), &loader)
    }

    /// Wrap an already constructed model
    pub fn with_model(model: Box<dyn CategoryModel>) -> Self {
        Self {
            model_name: model.model_name().to_string(),
            model: Some(model),
            load_error: None,
        }
    }

    /// A classifier without a model
    pub fn unavailable(model_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            model: None,
            load_error: Some(reason.into()),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn is_model_available(&self) -> bool {
        self.model.is_some()
    }

    /// Most likely category for `message`; `Unknown` when nothing is known
    pub fn classify(&self, message: &str) -> SmsCategory {
        self.classify_with_confidence(message)
            .top()
            .map(|result| result.category)
            .unwrap_or(SmsCategory::Unknown)
    }

    /// Confidence per category for `message`.
    ///
    /// Never empty. Failures of any kind yield `{Unknown: 1.0}`.
    pub fn classify_with_confidence(&self, message: &str) -> ConfidenceMap {
        match self.try_classify_with_confidence(message) {
            Ok(map) => map,
            Err(e @ ClassifierError::ModelUnavailable { .. }) => {
                debug!("{}", e);
                ConfidenceMap::unknown()
            }
            Err(e) => {
                warn!("Classification error: {}", e);
                ConfidenceMap::unknown()
            }
        }
    }

    /// Top category with its confidence; `{Unknown, 0.0}` for an empty map
    pub fn detailed_classification(&self, message: &str) -> ClassificationResult {
        self.classify_with_confidence(message)
            .top()
            .unwrap_or_else(ClassificationResult::unknown)
    }

    /// Like [`Classifier::classify_with_confidence`], but reports failures
    pub fn try_classify_with_confidence(
        &self,
        message: &str,
    ) -> Result<ConfidenceMap, ClassifierError> {
        let normalized = normalize_khmer_text(message);
        debug!("Normalized message: {:?}", normalized);

        let model = self
            .model
            .as_deref()
            .ok_or_else(|| ClassifierError::ModelUnavailable {
                model_name: self.model_name.clone(),
                reason: self
                    .load_error
                    .clone()
                    .unwrap_or_else(|| "not loaded".to_string()),
            })?;

        let prediction =
            model
                .predict(&normalized)
                .map_err(|source| ClassifierError::PredictionFailed {
                    model_name: self.model_name.clone(),
                    source,
                })?;

        debug!("Prediction: {:?}", prediction);

        confidence_map(&prediction)
    }

    /// Like [`Classifier::detailed_classification`], but reports failures
    pub fn try_detailed_classification(
        &self,
        message: &str,
    ) -> Result<ClassificationResult, ClassifierError> {
        Ok(self
            .try_classify_with_confidence(message)?
            .top()
            .unwrap_or_else(ClassificationResult::unknown))
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("model_name", &self.model_name)
            .field("model_available", &self.is_model_available())
            .field("load_error", &self.load_error)
            .finish()
    }
}

/// Clamp a model score into [0, 1]; NaN counts as no confidence
fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Turn a raw prediction into a two-entry map over Ham/Spam
fn confidence_map(prediction: &Prediction) -> Result<ConfidenceMap, ClassifierError> {
    let category = SmsCategory::from_model_label(&prediction.label)
        .ok_or_else(|| ClassifierError::UnrecognizedLabel(prediction.label.clone()))?;

    let map = match &prediction.scores {
        Scores::Distribution(probabilities) => {
            let ham = probabilities.get(SmsCategory::Ham.label());
            let spam = probabilities.get(SmsCategory::Spam.label());

            match (ham, spam) {
                (Some(ham), Some(spam)) => {
                    ConfidenceMap::from_ham_spam(clamp_confidence(*ham), clamp_confidence(*spam))
                }
                // Partial distribution: fall back to the label's own score if present
                _ => {
                    let confidence = probabilities
                        .get(category.label())
                        .copied()
                        .unwrap_or(1.0);
                    ConfidenceMap::with_complement(category, clamp_confidence(confidence))
                }
            }
        }
        Scores::Confidence(confidence) => {
            ConfidenceMap::with_complement(category, clamp_confidence(*confidence))
        }
        Scores::LabelOnly => ConfidenceMap::with_complement(category, 1.0),
    };

    Ok(map)
}
