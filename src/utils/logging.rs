//! Logging utilities
//!
//! Subscriber setup and helpers for keeping log lines short

use crate::config::settings::LoggingConfig;
use anyhow::Result;
use tracing::info;

/// Characters of a message included in debug logs
pub const MESSAGE_PREVIEW_CHARS: usize = 100;

/// Initialize logging system
///
/// `json` format is meant for production, `text` for development.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(config.level.as_str());

    let result = if config.format == "json" {
        builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
    } else {
        builder
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    Ok(())
}

/// Truncate a string with a note about original length
///
/// Cuts on a char boundary so multi-byte text never panics.
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    let total = s.chars().count();
    if total > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}... ({} chars truncated)", head, total - max_chars)
    } else {
        s.to_string()
    }
}
