//! Classification data models
//!
//! Request, result and response shapes shared by the HTTP API and the web form

use crate::utils::error::ErrorResult;
use serde::{Deserialize, Serialize};

/// Classification reported in the body of a failed request
pub const ERROR_CLASSIFICATION: &str = "Error";

/// Incoming classification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// Text to classify
    pub message: String,
}

/// Labels and their scores, sorted descending by score
///
/// `labels[i]` pairs with `scores[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedLabels {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl RankedLabels {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Successful classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Top-ranked candidate label
    pub classification: String,
    /// Score of the top label, within [0, 1]
    pub confidence: f64,
    /// Full ranking from the model
    pub details: RankedLabels,
}

impl ClassificationResult {
    /// Whether the presentation layer should flag this result
    pub fn is_low_confidence(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}

/// `details` of a response: the ranking on success, the error payload on failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseDetails {
    Ranking(RankedLabels),
    Error(ErrorResult),
}

/// Body returned by `POST /classify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    pub classification: String,
    pub confidence: f64,
    pub details: ResponseDetails,
}

impl ClassificationResponse {
    /// Wrap an error payload in the classification-shaped body
    pub fn from_error(error: ErrorResult) -> Self {
        Self {
            classification: ERROR_CLASSIFICATION.to_string(),
            confidence: 0.0,
            details: ResponseDetails::Error(error),
        }
    }

    /// Embedded error payload, if this body reports a failure
    pub fn error(&self) -> Option<&ErrorResult> {
        match &self.details {
            ResponseDetails::Error(error) => Some(error),
            ResponseDetails::Ranking(_) => None,
        }
    }
}

impl From<ClassificationResult> for ClassificationResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            classification: result.classification,
            confidence: result.confidence,
            details: ResponseDetails::Ranking(result.details),
        }
    }
}

/// Banner color used by the web form for a label
pub fn severity_color(label: &str) -> &'static str {
    match label {
        "Urgente" => "red",
        "Moderado" => "orange",
        _ => "green",
    }
}
