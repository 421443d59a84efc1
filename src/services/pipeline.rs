//! Classification pipeline
//!
//! Validate, invoke, return: one call per message

use super::classifier::{invoke, ZeroShotClassifier};
use super::validator::validate_message;
use crate::config::ClassificationConfig;
use crate::models::classification::ClassificationResult;
use crate::utils::error::AppResult;
use std::fmt;
use std::sync::Arc;

/// Classifies messages with a shared, read-only model handle
#[derive(Clone)]
pub struct MessageClassifier {
    model: Arc<dyn ZeroShotClassifier>,
    config: ClassificationConfig,
}

impl MessageClassifier {
    pub fn new(model: Arc<dyn ZeroShotClassifier>, config: ClassificationConfig) -> Self {
        Self { model, config }
    }

    /// Classify a raw message
    ///
    /// Blank input fails before the model is called.
    pub async fn classify(&self, message: &str) -> AppResult<ClassificationResult> {
        let validated = validate_message(message, self.config.max_length)?;

        invoke(
            self.model.as_ref(),
            &validated,
            &self.config.candidate_labels,
            self.config.confidence_threshold,
        )
        .await
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    pub fn is_low_confidence(&self, result: &ClassificationResult) -> bool {
        result.is_low_confidence(self.config.confidence_threshold)
    }
}

impl fmt::Debug for MessageClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageClassifier")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}
