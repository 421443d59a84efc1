//! Service layer module
//!
//! Contains input validation, the zero-shot model client, the classification
//! pipeline and the session history store

pub mod classifier;
pub mod history;
pub mod pipeline;
pub mod validator;

pub use classifier::{HuggingFaceClassifier, ZeroShotClassifier};
pub use history::{HistoryEntry, HistoryStore};
pub use pipeline::MessageClassifier;
pub use validator::{validate_message, ValidatedMessage};
