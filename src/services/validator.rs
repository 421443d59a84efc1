//! Input validation
//!
//! Rejects blank messages and truncates long ones before any model call

use crate::utils::error::{AppResult, ClassificationError};
use tracing::{debug, warn};

/// Message that passed validation
///
/// Non-blank after trimming and at most the configured number of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMessage(String);

impl ValidatedMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validate a raw message
///
/// Length is counted in characters. Text over `max_length` is truncated, not
/// rejected.
pub fn validate_message(text: &str, max_length: usize) -> AppResult<ValidatedMessage> {
    if is_blank(text) {
        debug!("Rejecting empty or blank message");
        return Err(ClassificationError::invalid_input("Message cannot be empty"));
    }

    let length = text.chars().count();
    if length <= max_length {
        return Ok(ValidatedMessage(text.to_string()));
    }

    warn!(
        original_length = length,
        max_length,
        "Message too long ({} characters), truncated to {}",
        length,
        max_length
    );
    let truncated: String = text.chars().take(max_length).collect();

    // Leading whitespace can push every visible character past the cut
    if is_blank(&truncated) {
        return Err(ClassificationError::invalid_input("Message is blank after truncation")
            .with_detail("original_length", length)
            .with_detail("max_length", max_length));
    }

    Ok(ValidatedMessage(truncated))
}

/// Whitespace-only text
///
/// Besides Unicode whitespace, the information separators U+001C..U+001F
/// count as blank.
fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}
