//! Zero-shot classification
//!
//! Defines the model trait, the hosted inference client and the invoker that
//! turns raw model output into a `ClassificationResult`

use super::validator::ValidatedMessage;
use crate::config::ModelConfig;
use crate::models::classification::{ClassificationResult, RankedLabels};
use crate::models::huggingface::{InferenceErrorResponse, ZeroShotRequest, ZeroShotResponse};
use crate::utils::error::{AppResult, ClassificationError};
use crate::utils::logging::{truncate_for_log, MESSAGE_PREVIEW_CHARS};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Text sent once at load time to confirm the model answers
const WARMUP_TEXT: &str = "Mensaje de prueba.";

/// Zero-shot text classifier
///
/// Given text and candidate labels, returns the labels ranked by score.
/// Implementations are shared across requests and must not need `&mut self`.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Model identifier
    fn name(&self) -> &str;

    /// Rank `candidate_labels` for `text`
    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<RankedLabels>;
}

/// Zero-shot classifier backed by the hosted inference API
pub struct HuggingFaceClassifier {
    client: Client,
    url: String,
    model: String,
    api_token: Option<String>,
}

impl std::fmt::Debug for HuggingFaceClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClassifier")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceClassifier {
    /// Create a client without contacting the API
    pub fn new(config: &ModelConfig, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("message-classifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: build_url(&config.base_url, &config.name),
            model: config.name.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Load the model once at start-up
    ///
    /// With warm-up enabled a sample classification must succeed. Any failure
    /// is a `ModelLoadingError`.
    pub async fn load(
        config: &ModelConfig,
        timeout_secs: u64,
        candidate_labels: &[String],
    ) -> AppResult<Self> {
        info!("Loading classification model: {}", config.name);

        let classifier =
            Self::new(config, timeout_secs).map_err(|e| model_loading_error(&config.name, &e))?;

        if config.warmup {
            classifier
                .classify(WARMUP_TEXT, candidate_labels)
                .await
                .map_err(|e| model_loading_error(&config.name, &e))?;
        }

        debug!("Model '{}' loaded", config.name);
        Ok(classifier)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn build_url(base_url: &str, model: &str) -> String {
    format!("{}/models/{}", base_url.trim_end_matches('/'), model)
}

fn model_loading_error(model: &str, err: &anyhow::Error) -> ClassificationError {
    error!("Could not load model '{}': {:#}", model, err);
    ClassificationError::model_loading(format!("Could not load model '{}'", model))
        .with_detail("model", model)
        .with_detail("error", format!("{:#}", err))
}

#[async_trait]
impl ZeroShotClassifier for HuggingFaceClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<RankedLabels> {
        debug!("Sending zero-shot request to {}", self.url);

        let mut request = self.client.post(&self.url).json(&ZeroShotRequest::new(text, candidate_labels));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context("Failed to send request")?;
        let status = response.status();

        if status.is_success() {
            let body: ZeroShotResponse = response
                .json()
                .await
                .context("Failed to parse inference response")?;

            debug!("Inference request completed successfully");
            Ok(body.into_ranked())
        } else {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<InferenceErrorResponse>(&error_text) {
                error!("Inference API error: {:?}", error_response);
                anyhow::bail!("Inference API error ({}): {}", status, error_response.message());
            } else {
                error!("Inference API request failed: {} - {}", status, error_text);
                anyhow::bail!("Inference API request failed: {} - {}", status, error_text);
            }
        }
    }
}

/// Invoke the model and select the top label
///
/// Model failures become `UnexpectedError` with the original text in
/// `details.error`. A confidence under `threshold` is only logged.
pub async fn invoke(
    model: &dyn ZeroShotClassifier,
    message: &ValidatedMessage,
    candidate_labels: &[String],
    threshold: f64,
) -> AppResult<ClassificationResult> {
    info!("Starting message classification");
    debug!(
        "Text to classify: '{}'",
        truncate_for_log(message.as_str(), MESSAGE_PREVIEW_CHARS)
    );

    let raw = model
        .classify(message.as_str(), candidate_labels)
        .await
        .map_err(|e| {
            let cause = format!("{:#}", e);
            error!("Error during classification: {}", cause);
            ClassificationError::unexpected(format!("Error during classification: {}", cause))
                .with_detail("error", cause)
        })?;

    debug!("Raw model output: {:?}", raw);

    let details = normalize_ranking(raw, candidate_labels)?;
    let (classification, confidence) = match (details.labels.first(), details.scores.first()) {
        (Some(label), Some(score)) => (label.clone(), *score),
        _ => return Err(ClassificationError::unexpected("Model returned no labels")),
    };

    info!("Final classification: {} ({:.2}%)", classification, confidence * 100.0);

    if confidence < threshold {
        warn!(
            "Low confidence ({:.2}%) for message: '{}'",
            confidence * 100.0,
            truncate_for_log(message.as_str(), MESSAGE_PREVIEW_CHARS)
        );
    }

    Ok(ClassificationResult {
        classification,
        confidence,
        details,
    })
}

/// Check model output and sort it descending by score
///
/// Ties keep the order of `candidate_labels`, so the earlier candidate wins.
pub fn normalize_ranking(raw: RankedLabels, candidate_labels: &[String]) -> AppResult<RankedLabels> {
    if raw.is_empty() {
        return Err(ClassificationError::unexpected("Model returned no labels"));
    }

    if raw.labels.len() != raw.scores.len() {
        return Err(ClassificationError::unexpected("Model returned mismatched labels and scores")
            .with_detail("labels", raw.labels.len())
            .with_detail("scores", raw.scores.len()));
    }

    let mut ranked = Vec::with_capacity(raw.len());
    for (label, score) in raw.labels.into_iter().zip(raw.scores) {
        let priority = match candidate_labels.iter().position(|c| *c == label) {
            Some(priority) => priority,
            None => {
                return Err(ClassificationError::unexpected("Model returned an unknown label")
                    .with_detail("label", label))
            }
        };

        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(ClassificationError::unexpected("Model returned a score outside [0, 1]")
                .with_detail("label", label)
                .with_detail("score", score.to_string()));
        }

        ranked.push((priority, label, score));
    }

    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

    let (labels, scores) = ranked.into_iter().map(|(_, label, score)| (label, score)).unzip();
    Ok(RankedLabels { labels, scores })
}
