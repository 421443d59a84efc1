//! Message Classifier Library
//!
//! Classifies short messages by urgency with a zero-shot model and serves the
//! result over a JSON API and a small web form

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, AppState};
pub use models::{ClassificationResponse, ClassificationResult, RankedLabels};
pub use services::{HuggingFaceClassifier, MessageClassifier, ZeroShotClassifier};
pub use utils::error::{handle_error, AppResult, ClassificationError, ErrorKind, ErrorResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
