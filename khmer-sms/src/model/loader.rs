//! Model resolution
//!
//! A model name resolves to a TOML manifest in the model directory. The
//! manifest picks a backend and carries its settings:
//!
//! ```toml
//! backend = "http"
//! endpoint = "http://127.0.0.1:8501/predict"
//! timeout_seconds = 5
//! ```
//!
//! Lookup order for `<name>`: `<dir>/<name>.toml`, then
//! `<dir>/Resources/<name>.toml`, then a case-insensitive scan of
//! `<dir>/Resources/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CategoryModel, HttpModel, KeywordModel};
use crate::error::{Result, SmsError};

/// Model used when none is named
pub const DEFAULT_MODEL_NAME: &str = "kh-sms-classifier";

const MANIFEST_EXTENSION: &str = "toml";
const RESOURCES_DIR: &str = "Resources";

/// Backend description read from a model manifest
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ModelManifest {
    /// Remote prediction server
    Http {
        /// Prediction URL
        endpoint: String,
        /// Request timeout in seconds
        #[serde(default = "default_timeout")]
        timeout_seconds: u64,
    },
    /// Built-in keyword model
    Keyword {
        /// Spam markers; the built-in list is used when empty
        #[serde(default)]
        spam_keywords: Vec<String>,
    },
}

fn default_timeout() -> u64 {
    5
}

impl ModelManifest {
    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        toml::from_str(&content).map_err(|e| SmsError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Short backend name for logging
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Keyword { .. } => "keyword",
        }
    }

    /// Build the backend this manifest describes
    pub fn build(&self, model_name: &str) -> Result<Box<dyn CategoryModel>> {
        match self {
            Self::Http {
                endpoint,
                timeout_seconds,
            } => {
                let model = HttpModel::new(
                    model_name,
                    endpoint.clone(),
                    Duration::from_secs(*timeout_seconds),
                )?;
                Ok(Box::new(model))
            }
            Self::Keyword { spam_keywords } => Ok(Box::new(KeywordModel::with_keywords(
                model_name,
                spam_keywords.clone(),
            ))),
        }
    }
}

/// Resolves model names to backends
#[derive(Debug, Clone)]
pub struct ModelLoader {
    model_dir: PathBuf,
}

impl ModelLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Whether `name` stays inside the model directory once joined to it
    pub fn is_valid_model_name(name: &str) -> bool {
        !name.trim().is_empty()
            && name != "."
            && !name.contains("..")
            && !name.contains(['/', '\\', ':', '\0'])
    }

    /// Locate the manifest for `name`
    pub fn find_manifest(&self, name: &str) -> Option<PathBuf> {
        if !Self::is_valid_model_name(name) {
            warn!("Rejecting model name {:?}", name);
            return None;
        }

        let file_name = format!("{}.{}", name, MANIFEST_EXTENSION);

        let direct = self.model_dir.join(&file_name);
        if direct.is_file() {
            return Some(direct);
        }

        let resources = self.model_dir.join(RESOURCES_DIR);
        let nested = resources.join(&file_name);
        if nested.is_file() {
            return Some(nested);
        }

        // Last resort: case-insensitive match inside Resources/
        if let Ok(entries) = std::fs::read_dir(&resources) {
            for entry in entries.flatten() {
                let path = entry.path();
                let matches = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.eq_ignore_ascii_case(&file_name));
                if matches && path.is_file() {
                    return Some(path);
                }
            }
        }

        debug!("Could not locate model {} in {}", name, self.model_dir.display());
        None
    }

    /// Read the manifest for `name`
    pub fn read_manifest(&self, name: &str) -> Result<ModelManifest> {
        if !Self::is_valid_model_name(name) {
            return Err(SmsError::InvalidModelName(name.to_string()));
        }

        let path = self
            .find_manifest(name)
            .ok_or_else(|| SmsError::ModelNotFound {
                name: name.to_string(),
                searched: self.model_dir.clone(),
            })?;

        ModelManifest::from_file(&path)
    }

    /// Resolve `name` and build its backend
    pub fn load(&self, name: &str) -> Result<Box<dyn CategoryModel>> {
        let manifest = self.read_manifest(name)?;
        let model = manifest.build(name)?;

        info!("Loaded model '{}' ({} backend)", name, manifest.backend());

        Ok(model)
    }

    pub fn model_exists(&self, name: &str) -> bool {
        self.find_manifest(name).is_some()
    }

    /// Names of all manifests in the model directory and its `Resources/`
    pub fn available_models(&self) -> Vec<String> {
        let mut names: Vec<String> = [self.model_dir.clone(), self.model_dir.join(RESOURCES_DIR)]
            .iter()
            .filter_map(|dir| std::fs::read_dir(dir).ok())
            .flat_map(|entries| entries.flatten())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION)
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();

        names.sort();
        names.dedup();
        names
    }
}
