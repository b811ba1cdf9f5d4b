//! Recipient list building and message source resolution.
//!
//! The builder applies a strict gate: only lines that are already in
//! canonical dialing format survive. Country-aware normalization is a
//! separate, opt-in step (see [`crate::normalization::normalize_lines`]).

mod message;

pub use message::{read_message_file, resolve_message};

use crate::domain::CanonicalNumber;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A candidate line that did not pass the canonical-format gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input
    pub line_number: usize,

    /// The trimmed line content
    pub content: String,
}

/// Result of scanning candidate lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientScan {
    /// Accepted recipients, in input order, duplicates kept
    pub recipients: Vec<CanonicalNumber>,

    /// Invalid entries, one per diagnostic emitted
    pub skipped: Vec<SkippedLine>,
}

/// Build a recipient list from raw candidate lines.
///
/// Lines are trimmed. Blank lines and lines starting with `#` are dropped
/// silently. Remaining lines must be "+" followed by digits; anything else
/// is skipped with a warning and recorded in [`RecipientScan::skipped`].
pub fn build_recipient_list<I, S>(lines: I) -> RecipientScan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scan = RecipientScan::default();

    for (index, raw_line) in lines.into_iter().enumerate() {
        let line = raw_line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match CanonicalNumber::new(line) {
            Ok(number) => scan.recipients.push(number),
            Err(_) => {
                tracing::warn!("Skipping invalid phone entry: {}", line);
                scan.skipped.push(SkippedLine {
                    line_number: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    scan
}

/// Read the raw lines of a recipients file.
///
/// # Errors
///
/// Returns `ConfigError::RecipientsFileNotFound` if the file does not exist
/// and `ConfigError::Io` if it cannot be read as UTF-8 text.
pub fn read_recipient_lines(path: &Path) -> ConfigResult<Vec<String>> {
    if !path.exists() {
        return Err(ConfigError::RecipientsFileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.lines().map(str::to_string).collect())
}

/// Read a recipients file and apply [`build_recipient_list`].
pub fn read_recipients_file(path: &Path) -> ConfigResult<RecipientScan> {
    let lines = read_recipient_lines(path)?;
    let scan = build_recipient_list(&lines);

    tracing::debug!(
        "Read {} recipient(s) from {} ({} skipped)",
        scan.recipients.len(),
        path.display(),
        scan.skipped.len()
    );

    Ok(scan)
}

/// Drop repeated numbers, keeping the first occurrence of each.
pub fn dedupe(numbers: Vec<CanonicalNumber>) -> Vec<CanonicalNumber> {
    let mut seen = HashSet::new();
    numbers
        .into_iter()
        .filter(|number| seen.insert(number.clone()))
        .collect()
}
