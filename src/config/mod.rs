//! Configuration management module
//!
//! Responsible for loading and managing application configuration from
//! environment variables and an optional JSON overlay file.

pub mod file;
pub mod settings;

pub use file::FileConfig;
pub use settings::{ClassificationConfig, LoggingConfig, ModelConfig, Settings};
