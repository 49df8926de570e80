//! Person records: line-oriented `KEY: value` text.
//!
//! Only `NAME` and `GENDER` are interpreted. Everything else stays in the raw
//! text, which is what the inspector shows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name shown for a record without a `NAME:` line.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Recorded sex of a person.
///
/// Defaults to `Male` when the `GENDER:` line is absent or holds anything
/// other than `M`/`F`. Records in the wild rely on this default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    /// Parse a `GENDER:` value, case-insensitively. Unrecognized values yield the default.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "F" => Sex::Female,
            _ => Sex::Male,
        }
    }

    pub fn code(self) -> char {
        match self {
            Sex::Male => 'M',
            Sex::Female => 'F',
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A parsed person record together with its original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub sex: Sex,
    /// Whether the record had a `NAME:` line at all.
    pub has_name: bool,
    #[serde(skip)]
    pub raw: String,
}

impl Profile {
    /// Parse a record. Never fails: missing fields fall back to their defaults.
    pub fn parse(raw: &str) -> Self {
        let mut name = None;
        let mut sex = None;
        for line in raw.lines() {
            if name.is_none()
                && let Some(value) = line.strip_prefix("NAME:")
            {
                name = Some(value.trim().to_string());
            } else if sex.is_none()
                && let Some(value) = line.strip_prefix("GENDER:")
            {
                sex = Some(Sex::parse_lenient(value));
            }
        }

        Self {
            has_name: name.is_some(),
            name: name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            sex: sex.unwrap_or_default(),
            raw: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_gender() {
        let profile = Profile::parse("NAME: Anna Weber\nGENDER: f\nBORN: 1921\n");
        assert_eq!(profile.name, "Anna Weber");
        assert_eq!(profile.sex, Sex::Female);
        assert!(profile.has_name);
        assert!(profile.raw.contains("BORN: 1921"));
    }

    #[test]
    fn test_missing_gender_defaults_to_male() {
        let profile = Profile::parse("NAME: Karl\n");
        assert_eq!(profile.sex, Sex::Male);
    }

    #[test]
    fn test_unrecognized_gender_defaults_to_male() {
        assert_eq!(Profile::parse("NAME: X\nGENDER: other").sex, Sex::Male);
        assert_eq!(Sex::parse_lenient(" F "), Sex::Female);
        assert_eq!(Sex::parse_lenient("m"), Sex::Male);
    }

    #[test]
    fn test_missing_name_is_unknown() {
        let profile = Profile::parse("GENDER: F");
        assert_eq!(profile.name, UNKNOWN_NAME);
        assert!(!profile.has_name);
    }

    #[test]
    fn test_first_name_line_wins() {
        let profile = Profile::parse("NAME: First\nNAME: Second");
        assert_eq!(profile.name, "First");
    }
}
