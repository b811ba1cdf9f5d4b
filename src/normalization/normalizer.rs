//! Country-aware number normalizer.

use crate::domain::{CanonicalNumber, CountryRule, CountryTable};
use crate::recipients::dedupe;
use std::fmt;

/// Why a raw value could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The input (or what is left after stripping separators) is empty.
    Empty,

    /// The requested country is not in the table.
    UnknownCountry(String),

    /// Starts with "+" but the remainder is not one or more digits.
    InvalidInternational(String),

    /// Contains characters other than digits after cleaning.
    NonDigit(String),

    /// No local prefix pattern of the country matches.
    NoMatchingPattern { number: String, country: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty number"),
            Self::UnknownCountry(country) => write!(f, "unknown country: {}", country),
            Self::InvalidInternational(number) => {
                write!(f, "invalid international number: {}", number)
            }
            Self::NonDigit(number) => write!(f, "number contains non-digit characters: {}", number),
            Self::NoMatchingPattern { number, country } => {
                write!(f, "{} does not match any {} prefix pattern", number, country)
            }
        }
    }
}

impl std::error::Error for Rejection {}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '(' || c == ')'
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize `raw` into canonical dialing format using `country`'s rules.
///
/// Whitespace, hyphens and parentheses are stripped first. A value that then
/// starts with "+" bypasses the country rules entirely and is accepted as-is
/// when the rest is one or more digits. Otherwise the first listed local
/// prefix pattern that matches decides: a pattern equal to the country code
/// keeps the number and adds "+", any other pattern is replaced by the
/// dialing code.
///
/// # Example
///
/// ```
/// use wpbot::domain::CountryTable;
/// use wpbot::normalization::normalize;
///
/// let table = CountryTable::builtin();
/// let turkey = table.get("Turkey").unwrap();
/// // The matched "05" is replaced by "+90".
/// assert_eq!(normalize("0555 123 45 67", turkey).unwrap().as_str(), "+90551234567");
/// assert_eq!(normalize("905551234567", turkey).unwrap().as_str(), "+905551234567");
/// ```
pub fn normalize(raw: &str, country: &CountryRule) -> Result<CanonicalNumber, Rejection> {
    if raw.is_empty() {
        return Err(Rejection::Empty);
    }

    let cleaned: String = raw.chars().filter(|c| !is_separator(*c)).collect();
    if cleaned.is_empty() {
        return Err(Rejection::Empty);
    }

    if let Some(rest) = cleaned.strip_prefix('+') {
        return if all_digits(rest) {
            Ok(CanonicalNumber::from_parts("+", rest))
        } else {
            Err(Rejection::InvalidInternational(cleaned))
        };
    }

    if !all_digits(&cleaned) {
        return Err(Rejection::NonDigit(cleaned));
    }

    let pattern = country
        .local_prefix_patterns()
        .iter()
        .find(|pattern| cleaned.starts_with(pattern.as_str()));

    match pattern {
        Some(pattern) if pattern == country.dialing_digits() => {
            Ok(CanonicalNumber::from_parts("+", &cleaned))
        }
        Some(pattern) => Ok(CanonicalNumber::from_parts(
            country.dialing_code(),
            &cleaned[pattern.len()..],
        )),
        None => Err(Rejection::NoMatchingPattern {
            number: cleaned,
            country: country.name().to_string(),
        }),
    }
}

/// Normalize `raw` for the country named `country` in `table`.
pub fn normalize_for(
    raw: &str,
    table: &CountryTable,
    country: &str,
) -> Result<CanonicalNumber, Rejection> {
    if raw.is_empty() {
        return Err(Rejection::Empty);
    }

    let rule = table
        .get(country)
        .ok_or_else(|| Rejection::UnknownCountry(country.to_string()))?;

    normalize(raw, rule)
}

/// Turkish shorthand kept for existing callers.
pub fn normalize_tr(raw: &str, table: &CountryTable) -> Result<CanonicalNumber, Rejection> {
    normalize_for(raw, table, "Turkey")
}

/// Result of normalizing a list of raw lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    /// Normalized numbers in input order
    pub numbers: Vec<CanonicalNumber>,

    /// Lines that were rejected, with the reason
    pub rejected: Vec<(String, Rejection)>,
}

/// Normalize every candidate line for one country.
///
/// Lines are trimmed; blank lines and `#` comments are skipped silently.
/// Each rejected line is logged and kept in [`NormalizedBatch::rejected`].
/// With `unique` set, repeated numbers are dropped keeping the first.
pub fn normalize_lines<I, S>(
    lines: I,
    table: &CountryTable,
    country: &str,
    unique: bool,
) -> NormalizedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = NormalizedBatch::default();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match normalize_for(line, table, country) {
            Ok(number) => batch.numbers.push(number),
            Err(rejection) => {
                tracing::warn!("Skipping {}: {}", line, rejection);
                batch.rejected.push((line.to_string(), rejection));
            }
        }
    }

    if unique {
        batch.numbers = dedupe(batch.numbers);
    }

    batch
}
