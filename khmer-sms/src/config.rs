//! Configuration for khmer-sms

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SmsError};
use crate::model::{ModelLoader, DEFAULT_MODEL_NAME};

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "KHMER_SMS_MODEL";
/// Environment variable overriding the model directory
pub const MODEL_DIR_ENV: &str = "KHMER_SMS_MODEL_DIR";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Model to load; defaults to "kh-sms-classifier"
    #[serde(default)]
    pub model_name: Option<String>,
    /// Directory holding model manifests
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty", "compact" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_name: None,
            model_dir: default_model_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl ClassifierConfig {
    /// Configured model name, or the default one
    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SmsError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SmsError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load from `path` if given, else defaults; then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply KHMER_SMS_MODEL / KHMER_SMS_MODEL_DIR
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(MODEL_ENV).ok(),
            std::env::var(MODEL_DIR_ENV).ok(),
        );
    }

    /// Replace the model name and directory when values are given
    pub fn apply_overrides(&mut self, model_name: Option<String>, model_dir: Option<String>) {
        if let Some(name) = model_name.filter(|n| !n.trim().is_empty()) {
            self.classifier.model_name = Some(name);
        }
        if let Some(dir) = model_dir.filter(|d| !d.trim().is_empty()) {
            self.classifier.model_dir = PathBuf::from(dir);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.classifier.model_name {
            if name.trim().is_empty() {
                return Err(SmsError::Config("Model name must not be empty".to_string()));
            }
            if !ModelLoader::is_valid_model_name(name) {
                return Err(SmsError::Config(format!(
                    "Model name '{}' must not contain path separators or '..'",
                    name
                )));
            }
        }

        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| SmsError::Config(format!("Invalid log level '{}'", self.logging.level)))?;

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => Ok(()),
            other => Err(SmsError::Config(format!("Invalid log format '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.classifier.model_name(), "kh-sms-classifier");
        assert_eq!(config.classifier.model_dir, PathBuf::from("models"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[classifier]
model_name = "kh-sms-v2"
model_dir = "/opt/models"

[logging]
level = "debug"
format = "json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.classifier.model_name(), "kh-sms-v2");
        assert_eq!(config.classifier.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        assert_eq!(config.classifier.model_name(), "kh-sms-classifier");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[classifier]\nmodel_name = \"from-file\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.classifier.model_name(), "from-file");
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/khmer-sms.toml")).unwrap_err();
        assert!(matches!(err, SmsError::Config(_)));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.model_name = Some("  ".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.model_name = Some("../elsewhere".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("override".to_string()), Some("/srv/models".to_string()));
        assert_eq!(config.classifier.model_name(), "override");
        assert_eq!(config.classifier.model_dir, PathBuf::from("/srv/models"));

        config.apply_overrides(Some(String::new()), None);
        assert_eq!(config.classifier.model_name(), "override");
    }
}
