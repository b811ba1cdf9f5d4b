//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is not "+" followed by one or more digits.
    InvalidCanonicalNumber(String),

    /// A country rule has an empty name.
    EmptyCountryName,

    /// A country rule's dialing code is not "+" followed by digits.
    InvalidDialingCode { country: String, code: String },

    /// A country rule has an empty or non-digit local prefix pattern.
    InvalidPrefixPattern { country: String, pattern: String },

    /// Two rules in one table share a name.
    DuplicateCountry(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanonicalNumber(number) => {
                write!(f, "Not a canonical phone number: {}", number)
            }
            Self::EmptyCountryName => write!(f, "Country name cannot be empty"),
            Self::InvalidDialingCode { country, code } => {
                write!(f, "Invalid dialing code for {}: {}", country, code)
            }
            Self::InvalidPrefixPattern { country, pattern } => {
                write!(f, "Invalid local prefix pattern for {}: {:?}", country, pattern)
            }
            Self::DuplicateCountry(name) => write!(f, "Duplicate country: {}", name),
        }
    }
}

impl std::error::Error for ValidationError {}
