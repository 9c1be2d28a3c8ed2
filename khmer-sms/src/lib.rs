//! khmer-sms: Khmer SMS spam/ham classification
//!
//! Cleans up Khmer short messages and classifies them as ham or spam with a
//! pluggable category model.
//!
//! # Features
//!
//! - **Normalization**: keeps Khmer script, letters, digits and punctuation;
//!   drops emoji, currency signs and other symbols; folds whitespace
//! - **Classification**: top category, per-category confidence map, and a
//!   detailed result, all of which always answer
//! - **Diagnostics**: `try_` variants that tell a failed model apart from an
//!   unrecognized prediction
//! - **Backends**: HTTP prediction server or a built-in keyword model,
//!   selected by a TOML manifest in the model directory
//!
//! # Example
//!
//! ```no_run
//! use khmer_sms::{Classifier, Config, SmsCategory};
//!
//! let config = Config::default();
//! let classifier = Classifier::from_config(&config);
//!
//! let result = classifier.detailed_classification("លោកអ្នកឈ្នះរង្វាន់ ១០០$");
//! if result.category == SmsCategory::Spam {
//!     println!("spam ({:.0}%)", result.confidence * 100.0);
//! }
//! ```
//!
//! # Modules
//!
//! - [`normalizer`]: Khmer-aware text cleanup
//! - [`category`]: categories, results and confidence maps
//! - [`model`]: model trait, backends and model resolution
//! - [`classifier`]: classification entry point
//! - [`config`]: configuration management
//! - [`error`]: error types and handling

pub mod category;
pub mod classifier;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;

// Re-export commonly used types
pub use category::{ClassificationResult, ConfidenceMap, SmsCategory};
pub use classifier::{Classifier, ClassifierError};
pub use config::Config;
pub use error::{Result, SmsError};
pub use model::{CategoryModel, ModelError, ModelLoader, Prediction, Scores};
pub use normalizer::{normalize_khmer_text, TextNormalizer};
