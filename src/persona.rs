//! Persona system prompt: the character text prepended to every exchange.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::AppError;

/// Used when no `persona_file` is configured.
pub const DEFAULT_PERSONA: &str = "You are a friendly, concise conversational companion. \
Answer in the user's language, keep replies to a few sentences, and stay in character.";

/// Load the persona text from `path`, or fall back to [`DEFAULT_PERSONA`].
pub fn load(path: Option<&Path>) -> Result<String, AppError> {
    let Some(path) = path else {
        debug!("no persona file configured, using built-in persona");
        return Ok(DEFAULT_PERSONA.to_string());
    };

    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read persona {}: {e}", path.display())))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Config(format!("persona file {} is empty", path.display())));
    }

    debug!(path = %path.display(), chars = text.len(), "persona loaded");
    Ok(text.to_string())
}
