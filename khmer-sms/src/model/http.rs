//! HTTP model backend
//!
//! Sends normalized text to a prediction server and reads back a label with
//! optional scores. The request is a single blocking call bounded by the
//! configured timeout.

use super::{CategoryModel, ModelError, Prediction, Scores};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Remote prediction server
pub struct HttpModel {
    model_name: String,
    endpoint: String,
    timeout: Duration,
    client: reqwest::blocking::Client,
}

impl HttpModel {
    pub fn new(
        model_name: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Backend(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            model_name: model_name.into(),
            endpoint: endpoint.into(),
            timeout,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Prediction request body
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    model: &'a str,
    text: &'a str,
}

/// Prediction response body
#[derive(Debug, Deserialize)]
struct PredictResponse {
    label: String,
    #[serde(default)]
    probabilities: Option<HashMap<String, f64>>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl From<PredictResponse> for Prediction {
    fn from(response: PredictResponse) -> Self {
        let scores = match (response.probabilities, response.confidence) {
            (Some(probabilities), _) if !probabilities.is_empty() => {
                Scores::Distribution(probabilities)
            }
            (_, Some(confidence)) => Scores::Confidence(confidence),
            _ => Scores::LabelOnly,
        };

        Prediction {
            label: response.label,
            scores,
        }
    }
}

impl CategoryModel for HttpModel {
    fn predict(&self, text: &str) -> Result<Prediction, ModelError> {
        let request = PredictRequest {
            model: &self.model_name,
            text,
        };

        debug!("HttpModel: Sending request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(self.timeout)
                } else {
                    ModelError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            warn!("HttpModel: Request failed with status {}: {}", status, error_text);
            return Err(ModelError::Http(format!("{} - {}", status, error_text)));
        }

        let body: PredictResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout(self.timeout)
            } else {
                ModelError::InvalidResponse(e.to_string())
            }
        })?;

        debug!("HttpModel: Received label {}", body.label);

        Ok(body.into())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
