//! Message source resolution.

use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;

/// Resolve the message body from exactly one of an inline message or a
/// message file.
///
/// An inline message is used as given. A message file's content is trimmed
/// once. Supplying both or neither is a configuration error, and so is a
/// message that is empty after trimming.
pub fn resolve_message(inline: Option<&str>, file: Option<&Path>) -> ConfigResult<String> {
    let inline = inline.filter(|m| !m.is_empty());

    let message = match (inline, file) {
        (Some(_), Some(_)) => return Err(ConfigError::ConflictingMessageSources),
        (None, None) => return Err(ConfigError::MissingMessage),
        (Some(message), None) => message.to_string(),
        (None, Some(path)) => read_message_file(path)?,
    };

    if message.trim().is_empty() {
        return Err(ConfigError::EmptyMessage);
    }

    Ok(message)
}

/// Read a message file as UTF-8 and trim surrounding whitespace.
///
/// # Errors
///
/// Returns `ConfigError::MessageFileNotFound` if the file does not exist
/// and `ConfigError::Io` if it cannot be read.
pub fn read_message_file(path: &Path) -> ConfigResult<String> {
    if !path.exists() {
        return Err(ConfigError::MessageFileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.trim().to_string())
}
