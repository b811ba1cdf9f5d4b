//! CanonicalNumber value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

static CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]+$").expect("Failed to compile canonical number regex"));

/// Check whether `value` is in canonical dialing format: a leading "+"
/// followed by at least one ASCII digit and nothing else.
pub fn is_canonical(value: &str) -> bool {
    CANONICAL_RE.is_match(value)
}

/// A phone number in canonical dialing format (`+` then digits).
///
/// The format is E.164-like but is not checked against real numbering plans.
/// Values are immutable once constructed.
///
/// # Example
///
/// ```
/// use wpbot::domain::CanonicalNumber;
///
/// let number = CanonicalNumber::new("+905551234567").unwrap();
/// assert_eq!(number.as_str(), "+905551234567");
/// assert_eq!(number.digits_only(), "905551234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
    /// Create a new CanonicalNumber, validating the format.
    ///
    /// No separators are stripped here; use [`crate::normalization::normalize`]
    /// for raw user input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidCanonicalNumber` if the value is not
    /// "+" followed only by digits.
    pub fn new(number: impl Into<String>) -> Result<Self, ValidationError> {
        let number = number.into();

        if !is_canonical(&number) {
            return Err(ValidationError::InvalidCanonicalNumber(number));
        }

        Ok(Self(number))
    }

    /// Build from a dialing code and a digit-only remainder that the caller
    /// has already validated.
    pub(crate) fn from_parts(dialing_code: &str, digits: &str) -> Self {
        let number = format!("{}{}", dialing_code, digits);
        debug_assert!(is_canonical(&number), "invalid canonical number {}", number);
        Self(number)
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The number without its leading "+".
    pub fn digits_only(&self) -> &str {
        &self.0[1..]
    }
}

// Serde support - serialize as string
impl Serialize for CanonicalNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for CanonicalNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CanonicalNumber::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for CanonicalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
