//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use super::file::{default_config_path, FileConfig, CONFIG_PATH_VAR};
use crate::utils::error::{AppResult, ClassificationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Labels the classifier chooses among, in priority order
pub const DEFAULT_CANDIDATE_LABELS: [&str; 3] = ["Urgente", "Moderado", "Normal"];

/// Hosted zero-shot model
pub const DEFAULT_MODEL_NAME: &str = "facebook/bart-large-mnli";

/// BART handles up to 512 tokens
pub const DEFAULT_MAX_LENGTH: usize = 512;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Classification model configuration
    pub model: ModelConfig,
    /// Classification policy
    pub classification: ClassificationConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Surfaced in every error payload
    pub debug_mode: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Return the error's own status code instead of 200 for error bodies
    pub strict_error_status: bool,
}

/// Classification model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier
    pub name: String,
    /// Inference API base URL
    pub base_url: String,
    /// Bearer token for the inference API
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    /// Classify a sample once at load time
    pub warmup: bool,
}

/// Classification policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Ordered candidate labels; order breaks score ties
    pub candidate_labels: Vec<String>,
    /// Maximum message length in characters
    pub max_length: usize,
    /// Scores below this are flagged as low confidence
    pub confidence_threshold: f64,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Timeout for calls to the inference API in seconds
    pub timeout: u64,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the process environment
    ///
    /// Falls back to the default overlay file locations when
    /// `CLASSIFIER_CONFIG` is not set.
    pub fn new() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| {
            let value = std::env::var(key).ok();
            if key == CONFIG_PATH_VAR {
                value.or_else(default_config_path)
            } else {
                value
            }
        })
    }

    /// Build settings from an arbitrary variable lookup
    ///
    /// Variables win over the overlay file, which wins over built-in defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(CONFIG_PATH_VAR) {
            Some(path) => FileConfig::load(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let candidate_labels = match lookup("CANDIDATE_LABELS") {
            Some(raw) => parse_labels(&raw),
            None => file.candidate_labels.clone().unwrap_or_else(|| {
                DEFAULT_CANDIDATE_LABELS.iter().map(|l| l.to_string()).collect()
            }),
        };

        let max_length = match lookup("MAX_LENGTH") {
            Some(raw) => parse_value("MAX_LENGTH", &raw)?,
            None => file.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
        };

        let confidence_threshold = match lookup("CONFIDENCE_THRESHOLD") {
            Some(raw) => parse_value("CONFIDENCE_THRESHOLD", &raw)?,
            None => file.confidence_threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
        };

        let model_name = lookup("MODEL_NAME")
            .or_else(|| file.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());

        let settings = Self {
            server: ServerConfig {
                host: get("SERVER_HOST", "0.0.0.0"),
                port: parse_value("SERVER_PORT", &get("SERVER_PORT", "8000"))?,
                strict_error_status: parse_flag("STRICT_ERROR_STATUS", &get("STRICT_ERROR_STATUS", "false"))?,
            },
            model: ModelConfig {
                name: model_name,
                base_url: get("HF_API_BASE_URL", "https://api-inference.huggingface.co"),
                api_token: lookup("HF_API_TOKEN").filter(|t| !t.trim().is_empty()),
                warmup: parse_flag("MODEL_WARMUP", &get("MODEL_WARMUP", "true"))?,
            },
            classification: ClassificationConfig {
                candidate_labels,
                max_length,
                confidence_threshold,
            },
            request: RequestConfig {
                timeout: parse_value("REQUEST_TIMEOUT", &get("REQUEST_TIMEOUT", "10"))?,
                max_request_size: parse_value("MAX_REQUEST_SIZE", &get("MAX_REQUEST_SIZE", "65536"))?,
            },
            security: SecurityConfig {
                allowed_origins: get("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                cors_enabled: parse_flag("CORS_ENABLED", &get("CORS_ENABLED", "true"))?,
            },
            logging: LoggingConfig {
                level: get("RUST_LOG", "info"),
                format: get("LOG_FORMAT", "text"),
            },
            debug_mode: parse_flag("DEBUG_MODE", &get("DEBUG_MODE", "false"))?,
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(invalid("Port number cannot be 0"));
        }

        let labels = &self.classification.candidate_labels;
        if labels.is_empty() {
            return Err(invalid("At least one candidate label must be configured"));
        }
        if let Some(blank) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(invalid("Candidate labels cannot be blank").with_detail("index", blank));
        }
        let mut seen = HashSet::new();
        for label in labels {
            if !seen.insert(label.as_str()) {
                return Err(invalid("Candidate labels must be unique").with_detail("label", label.as_str()));
            }
        }

        if self.classification.max_length == 0 {
            return Err(invalid("Maximum message length cannot be 0"));
        }

        let threshold = self.classification.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid("Confidence threshold must be between 0 and 1").with_detail("value", threshold));
        }

        if self.model.name.trim().is_empty() {
            return Err(invalid("Model name cannot be empty"));
        }

        if !self.model.base_url.starts_with("http") {
            return Err(invalid("Invalid inference API base URL format, should start with 'http'")
                .with_detail("value", self.model.base_url.as_str()));
        }

        if self.request.timeout == 0 {
            return Err(invalid("Timeout values cannot be 0"));
        }

        if self.request.max_request_size == 0 {
            return Err(invalid("Maximum request size cannot be 0"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(invalid("Invalid log level").with_detail("value", self.logging.level.as_str()));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(invalid("Invalid log format").with_detail("value", self.logging.format.as_str()));
        }

        Ok(())
    }

    /// Check if a confidence value falls below the configured threshold
    pub fn is_low_confidence(&self, confidence: f64) -> bool {
        confidence < self.classification.confidence_threshold
    }
}

fn invalid(message: &str) -> ClassificationError {
    ClassificationError::configuration(message)
}

fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

fn parse_value<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        ClassificationError::configuration(format!("Invalid value for {}", key))
            .with_detail("variable", key)
            .with_detail("value", raw)
            .with_detail("error", e.to_string())
    })
}

fn parse_flag(key: &str, raw: &str) -> AppResult<bool> {
    parse_value(key, &raw.trim().to_lowercase())
}
