//! File-based configuration loading
//!
//! Optional JSON overlay for the classification settings

use crate::utils::error::{AppResult, ClassificationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Variable naming an explicit overlay file
pub const CONFIG_PATH_VAR: &str = "CLASSIFIER_CONFIG";

const CONFIG_FILE_NAME: &str = "message-classifier.json";

/// Overlay file contents
///
/// Every field is optional; environment variables take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Ordered candidate labels
    #[serde(rename = "candidateLabels", skip_serializing_if = "Option::is_none")]
    pub candidate_labels: Option<Vec<String>>,

    /// Model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Maximum message length in characters
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Low-confidence threshold
    #[serde(rename = "confidenceThreshold", skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

impl FileConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassificationError::configuration("Failed to read config file")
                .with_detail("path", path.display().to_string())
                .with_detail("error", e.to_string())
        })?;

        let config: FileConfig = serde_json::from_str(&content).map_err(|e| {
            ClassificationError::configuration("Failed to parse config JSON")
                .with_detail("path", path.display().to_string())
                .with_detail("error", e.to_string())
        })?;

        debug!("Overlay file sets labels: {:?}", config.candidate_labels);
        Ok(config)
    }
}

/// Locate the overlay file in the default locations
///
/// Searches in order:
/// 1. ~/.config/message-classifier/message-classifier.json
/// 2. ./message-classifier.json
pub fn default_config_path() -> Option<String> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join("message-classifier").join(CONFIG_FILE_NAME));
    }
    candidates.push(PathBuf::from(CONFIG_FILE_NAME));

    candidates
        .into_iter()
        .find(|path| path.exists())
        .map(|path| path.display().to_string())
}
