//! Hosted inference API data models
//!
//! Wire types of the zero-shot classification endpoint

use super::classification::RankedLabels;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Zero-shot classification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroShotRequest {
    /// Text to classify
    pub inputs: String,
    pub parameters: ZeroShotParameters,
    pub options: InferenceOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroShotParameters {
    pub candidate_labels: Vec<String>,
    /// Scores sum to 1 across labels when false
    pub multi_label: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceOptions {
    /// Block until a cold model is loaded instead of answering 503
    pub wait_for_model: bool,
}

impl ZeroShotRequest {
    pub fn new(text: &str, candidate_labels: &[String]) -> Self {
        Self {
            inputs: text.to_string(),
            parameters: ZeroShotParameters {
                candidate_labels: candidate_labels.to_vec(),
                multi_label: false,
            },
            options: InferenceOptions { wait_for_model: true },
        }
    }
}

/// Zero-shot classification response
///
/// The classic endpoint answers with parallel arrays, the router endpoint
/// with a list of label/score pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZeroShotResponse {
    Ranked {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sequence: Option<String>,
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    Pairs(Vec<LabelScore>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl ZeroShotResponse {
    pub fn into_ranked(self) -> RankedLabels {
        match self {
            ZeroShotResponse::Ranked { labels, scores, .. } => RankedLabels { labels, scores },
            ZeroShotResponse::Pairs(pairs) => {
                let (labels, scores) = pairs.into_iter().map(|p| (p.label, p.score)).unzip();
                RankedLabels { labels, scores }
            }
        }
    }
}

/// Error body of the inference API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceErrorResponse {
    /// A string, or a list of strings for validation failures
    pub error: Value,
    /// Seconds until a cold model is ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
}

impl InferenceErrorResponse {
    pub fn message(&self) -> String {
        match &self.error {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
