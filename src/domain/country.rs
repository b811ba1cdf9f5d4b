//! Country dialing rules.
//!
//! A [`CountryTable`] is built once at process start (either the built-in
//! table or one loaded from JSON) and passed explicitly to whatever needs it.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Dialing rules for one country.
///
/// `local_prefix_patterns` are tried in listed order and the first prefix
/// match wins, so the order is part of the rule. A `CountryRule` is always
/// valid: it can only be built through [`CountryRule::new`] or by
/// deserializing, and both run [`CountryRule::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CountryRuleDef")]
pub struct CountryRule {
    name: String,
    dialing_code: String,
    local_prefix_patterns: Vec<String>,
    description: String,
}

/// Unvalidated wire form of a [`CountryRule`].
#[derive(Deserialize)]
struct CountryRuleDef {
    name: String,
    dialing_code: String,
    local_prefix_patterns: Vec<String>,
    #[serde(default)]
    description: String,
}

impl TryFrom<CountryRuleDef> for CountryRule {
    type Error = ValidationError;

    fn try_from(def: CountryRuleDef) -> Result<Self, Self::Error> {
        let rule = Self {
            name: def.name,
            dialing_code: def.dialing_code,
            local_prefix_patterns: def.local_prefix_patterns,
            description: def.description,
        };
        rule.validate()?;
        Ok(rule)
    }
}

impl CountryRule {
    /// Create a validated rule.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the name is empty, the dialing code is
    /// not "+" followed by digits, or a pattern is empty or contains a non-digit.
    pub fn new(
        name: impl Into<String>,
        dialing_code: impl Into<String>,
        patterns: &[&str],
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let rule = Self {
            name: name.into(),
            dialing_code: dialing_code.into(),
            local_prefix_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            description: description.into(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Check the rule's invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyCountryName);
        }

        if !super::phone::is_canonical(&self.dialing_code) {
            return Err(ValidationError::InvalidDialingCode {
                country: self.name.clone(),
                code: self.dialing_code.clone(),
            });
        }

        for pattern in &self.local_prefix_patterns {
            if pattern.is_empty() || !pattern.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::InvalidPrefixPattern {
                    country: self.name.clone(),
                    pattern: pattern.clone(),
                });
            }
        }

        Ok(())
    }

    /// Display name, also the lookup key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// International dialing code, e.g. "+90".
    pub fn dialing_code(&self) -> &str {
        &self.dialing_code
    }

    /// Digit prefixes that locally formatted numbers begin with, in match order.
    pub fn local_prefix_patterns(&self) -> &[String] {
        &self.local_prefix_patterns
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The dialing code without its leading "+".
    pub fn dialing_digits(&self) -> &str {
        self.dialing_code
            .strip_prefix('+')
            .unwrap_or(&self.dialing_code)
    }
}

// (name, dialing code, local prefix patterns, description)
type BuiltinRule = (&'static str, &'static str, &'static [&'static str], &'static str);

const BUILTIN_COUNTRIES: &[BuiltinRule] = &[
    ("Turkey", "+90", &["90", "05", "5"], "Turkish mobile numbers"),
    ("United States", "+1", &["1"], "US/Canada numbers"),
    ("United Kingdom", "+44", &["44", "07"], "UK mobile numbers"),
    ("Germany", "+49", &["49", "01"], "German mobile numbers"),
    ("France", "+33", &["33", "06", "07"], "French mobile numbers"),
    ("Italy", "+39", &["39", "03"], "Italian mobile numbers"),
    ("Spain", "+34", &["34", "06"], "Spanish mobile numbers"),
    ("Netherlands", "+31", &["31", "06"], "Dutch mobile numbers"),
    ("Belgium", "+32", &["32", "04"], "Belgian mobile numbers"),
    ("Switzerland", "+41", &["41", "07"], "Swiss mobile numbers"),
    ("Austria", "+43", &["43", "06"], "Austrian mobile numbers"),
    ("Poland", "+48", &["48", "05"], "Polish mobile numbers"),
    ("Czech Republic", "+420", &["420", "07"], "Czech mobile numbers"),
    ("Hungary", "+36", &["36", "06"], "Hungarian mobile numbers"),
    ("Romania", "+40", &["40", "07"], "Romanian mobile numbers"),
    ("Bulgaria", "+359", &["359", "08"], "Bulgarian mobile numbers"),
    ("Greece", "+30", &["30", "06"], "Greek mobile numbers"),
    ("Portugal", "+351", &["351", "09"], "Portuguese mobile numbers"),
    ("Sweden", "+46", &["46", "07"], "Swedish mobile numbers"),
    ("Norway", "+47", &["47", "04"], "Norwegian mobile numbers"),
    ("Denmark", "+45", &["45", "02"], "Danish mobile numbers"),
    ("Finland", "+358", &["358", "04"], "Finnish mobile numbers"),
    ("Russia", "+7", &["7", "08"], "Russian mobile numbers"),
    ("China", "+86", &["86", "01"], "Chinese mobile numbers"),
    ("Japan", "+81", &["81", "09"], "Japanese mobile numbers"),
    ("South Korea", "+82", &["82", "01"], "South Korean mobile numbers"),
    ("India", "+91", &["91", "09"], "Indian mobile numbers"),
    ("Brazil", "+55", &["55", "01"], "Brazilian mobile numbers"),
    ("Mexico", "+52", &["52", "04"], "Mexican mobile numbers"),
    ("Argentina", "+54", &["54", "01"], "Argentine mobile numbers"),
    ("Australia", "+61", &["61", "04"], "Australian mobile numbers"),
    ("New Zealand", "+64", &["64", "02"], "New Zealand mobile numbers"),
    ("South Africa", "+27", &["27", "08"], "South African mobile numbers"),
    ("Egypt", "+20", &["20", "01"], "Egyptian mobile numbers"),
    ("Saudi Arabia", "+966", &["966", "05"], "Saudi mobile numbers"),
    ("UAE", "+971", &["971", "05"], "UAE mobile numbers"),
    ("Israel", "+972", &["972", "05"], "Israeli mobile numbers"),
    ("Iran", "+98", &["98", "09"], "Iranian mobile numbers"),
    ("Pakistan", "+92", &["92", "03"], "Pakistani mobile numbers"),
    ("Bangladesh", "+880", &["880", "01"], "Bangladeshi mobile numbers"),
    ("Thailand", "+66", &["66", "08"], "Thai mobile numbers"),
    ("Vietnam", "+84", &["84", "03"], "Vietnamese mobile numbers"),
    ("Indonesia", "+62", &["62", "08"], "Indonesian mobile numbers"),
    ("Malaysia", "+60", &["60", "01"], "Malaysian mobile numbers"),
    ("Singapore", "+65", &["65", "08"], "Singaporean mobile numbers"),
    ("Philippines", "+63", &["63", "09"], "Filipino mobile numbers"),
];

/// Name of the country used when none is configured.
pub const DEFAULT_COUNTRY: &str = "Turkey";

/// An immutable set of country rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryTable {
    rules: Vec<CountryRule>,
}

impl CountryTable {
    /// The built-in table of mobile numbering rules.
    pub fn builtin() -> Self {
        let rules = BUILTIN_COUNTRIES
            .iter()
            .map(|(name, code, patterns, description)| CountryRule {
                name: name.to_string(),
                dialing_code: code.to_string(),
                local_prefix_patterns: patterns.iter().map(|p| p.to_string()).collect(),
                description: description.to_string(),
            })
            .collect();

        Self { rules }
    }

    /// Build a table from caller-supplied rules, validating each one.
    ///
    /// # Errors
    ///
    /// Returns the first rule's `ValidationError`, or
    /// `ValidationError::DuplicateCountry` when two rules share a name
    /// (compared case-insensitively).
    pub fn from_rules(rules: Vec<CountryRule>) -> Result<Self, ValidationError> {
        for (i, rule) in rules.iter().enumerate() {
            rule.validate()?;
            if rules[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&rule.name))
            {
                return Err(ValidationError::DuplicateCountry(rule.name.clone()));
            }
        }

        Ok(Self { rules })
    }

    /// Look up a rule by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&CountryRule> {
        let name = name.trim();
        self.rules
            .iter()
            .find(|rule| rule.name.eq_ignore_ascii_case(name))
    }

    /// Rules in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryRule> {
        self.rules.iter()
    }

    /// Rules sorted by name, for listing.
    pub fn sorted_by_name(&self) -> Vec<&CountryRule> {
        let mut rules: Vec<&CountryRule> = self.rules.iter().collect();
        rules.sort_by(|a, b| a.name.cmp(&b.name));
        rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::builtin()
    }
}
