//! Error handling module
//!
//! Defines the classification error taxonomy and the single mapping function
//! that turns any failure into the `ErrorResult` shape returned to callers

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::backtrace::Backtrace;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Free-form diagnostic context attached to an error
pub type ErrorDetails = Map<String, Value>;

/// Error taxonomy tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The classification model failed to initialize
    #[serde(rename = "ModelLoadingError")]
    ModelLoading,
    /// Message empty or blank after trimming
    #[serde(rename = "InvalidInputError")]
    InvalidInput,
    /// Failure calling an external service
    #[serde(rename = "APIError")]
    Api,
    /// Invalid or missing configuration
    #[serde(rename = "ConfigurationError")]
    Configuration,
    /// Anything else
    #[serde(rename = "UnexpectedError")]
    Unexpected,
}

impl ErrorKind {
    /// Tag as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ModelLoading => "ModelLoadingError",
            ErrorKind::InvalidInput => "InvalidInputError",
            ErrorKind::Api => "APIError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Unexpected => "UnexpectedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification error types
///
/// Every variant carries a human-readable message and structured details.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("{message}")]
    ModelLoading { message: String, details: ErrorDetails },

    #[error("{message}")]
    InvalidInput { message: String, details: ErrorDetails },

    #[error("{message}")]
    Api { message: String, details: ErrorDetails },

    #[error("{message}")]
    Configuration { message: String, details: ErrorDetails },

    #[error("{message}")]
    Unexpected { message: String, details: ErrorDetails },
}

impl ClassificationError {
    /// Create an error of the given kind with empty details
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let details = ErrorDetails::new();
        match kind {
            ErrorKind::ModelLoading => ClassificationError::ModelLoading { message, details },
            ErrorKind::InvalidInput => ClassificationError::InvalidInput { message, details },
            ErrorKind::Api => ClassificationError::Api { message, details },
            ErrorKind::Configuration => ClassificationError::Configuration { message, details },
            ErrorKind::Unexpected => ClassificationError::Unexpected { message, details },
        }
    }

    pub fn model_loading(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModelLoading, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Attach a detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details_mut().insert(key.into(), value.into());
        self
    }

    /// Get the taxonomy tag
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassificationError::ModelLoading { .. } => ErrorKind::ModelLoading,
            ClassificationError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ClassificationError::Api { .. } => ErrorKind::Api,
            ClassificationError::Configuration { .. } => ErrorKind::Configuration,
            ClassificationError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClassificationError::ModelLoading { message, .. }
            | ClassificationError::InvalidInput { message, .. }
            | ClassificationError::Api { message, .. }
            | ClassificationError::Configuration { message, .. }
            | ClassificationError::Unexpected { message, .. } => message,
        }
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            ClassificationError::ModelLoading { details, .. }
            | ClassificationError::InvalidInput { details, .. }
            | ClassificationError::Api { details, .. }
            | ClassificationError::Configuration { details, .. }
            | ClassificationError::Unexpected { details, .. } => details,
        }
    }

    fn details_mut(&mut self) -> &mut ErrorDetails {
        match self {
            ClassificationError::ModelLoading { details, .. }
            | ClassificationError::InvalidInput { details, .. }
            | ClassificationError::Api { details, .. }
            | ClassificationError::Configuration { details, .. }
            | ClassificationError::Unexpected { details, .. } => details,
        }
    }

    /// Get HTTP status code
    ///
    /// Only used when strict error statuses are enabled; by default error
    /// bodies travel with 200.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Api => StatusCode::BAD_GATEWAY,
            ErrorKind::ModelLoading => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Configuration | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Taxonomy tag
    #[serde(rename = "error")]
    pub error_kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Diagnostic context
    #[serde(default)]
    pub details: ErrorDetails,
    /// Whether verbose diagnostics are enabled
    #[serde(default)]
    pub debug_mode: bool,
}

/// Map any error into an `ErrorResult`
///
/// Recognized `ClassificationError`s keep their tag; everything else becomes
/// `UnexpectedError`. Logs at critical severity with a stack trace on every
/// call and never fails.
pub fn handle_error(err: &(dyn std::error::Error + 'static), debug_mode: bool) -> ErrorResult {
    let (error_kind, message, details) = match err.downcast_ref::<ClassificationError>() {
        Some(known) => (known.kind(), known.message().to_string(), known.details().clone()),
        None => (ErrorKind::Unexpected, err.to_string(), ErrorDetails::new()),
    };

    let details_json = Value::Object(details.clone());
    let backtrace = Backtrace::force_capture();

    error!(
        severity = "CRITICAL",
        error_kind = %error_kind,
        details = %details_json,
        "{}: {}\n{}",
        error_kind,
        message,
        backtrace
    );

    ErrorResult {
        error_kind,
        message,
        details,
        debug_mode,
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, ClassificationError>;
