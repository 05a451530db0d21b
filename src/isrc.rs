//! International Standard Recording Code value type

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IsrcError {
    #[error("Invalid ISRC length: {0}")]
    Length(String),
    #[error("Invalid ISRC country code: {0}")]
    CountryCode(String),
    #[error("Invalid ISRC registrant code: {0}")]
    RegistrantCode(String),
    #[error("Invalid ISRC year or designation: {0}")]
    Digits(String),
}

/// An ISRC stored in its compact 12-character form, e.g. `USS1Z9900001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isrc {
    code: String,
}

impl Isrc {
    /// Parse an ISRC, with or without the hyphens after the first three groups
    pub fn parse(input: &str) -> Result<Self, IsrcError> {
        let groups = [2usize, 3, 2, 5];
        let mut code = String::with_capacity(12);
        let mut rest = input.trim();

        for (index, width) in groups.iter().enumerate() {
            let group = rest
                .get(..*width)
                .ok_or_else(|| IsrcError::Length(input.to_string()))?;
            rest = &rest[*width..];

            let valid = match index {
                0 => group.chars().all(|c| c.is_ascii_uppercase()),
                1 => group.chars().all(|c| c.is_ascii_alphanumeric()),
                _ => group.chars().all(|c| c.is_ascii_digit()),
            };
            if !valid {
                return Err(match index {
                    0 => IsrcError::CountryCode(input.to_string()),
                    1 => IsrcError::RegistrantCode(input.to_string()),
                    _ => IsrcError::Digits(input.to_string()),
                });
            }
            code.push_str(group);

            if index < 3 {
                rest = rest.strip_prefix('-').unwrap_or(rest);
            }
        }

        if !rest.is_empty() {
            return Err(IsrcError::Length(input.to_string()));
        }

        Ok(Self { code })
    }

    pub fn country_code(&self) -> &str {
        &self.code[0..2]
    }

    pub fn registrant_code(&self) -> &str {
        &self.code[2..5]
    }

    pub fn year(&self) -> &str {
        &self.code[5..7]
    }

    pub fn designation(&self) -> &str {
        &self.code[7..12]
    }

    /// Compact form, as submitted to MusicBrainz
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Display form `CC-XXX-YY-NNNNN`
    pub fn hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.country_code(),
            self.registrant_code(),
            self.year(),
            self.designation()
        )
    }
}

impl fmt::Display for Isrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl FromStr for Isrc {
    type Err = IsrcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Isrc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hyphenated_and_compact_agree() {
        let hyphenated = Isrc::parse("US-S1Z-99-00001").unwrap();
        let compact = Isrc::parse("USS1Z9900001").unwrap();
        assert_eq!(hyphenated, compact);
        assert_eq!(compact.to_string(), "USS1Z9900001");
        assert_eq!(compact.hyphenated(), "US-S1Z-99-00001");
    }

    #[test]
    fn test_parse_partial_hyphens() {
        let isrc = Isrc::parse("GBAYE-0000351").unwrap();
        assert_eq!(isrc.country_code(), "GB");
        assert_eq!(isrc.registrant_code(), "AYE");
        assert_eq!(isrc.year(), "00");
        assert_eq!(isrc.designation(), "00351");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            Isrc::parse("us-s1z-99-00001"),
            Err(IsrcError::CountryCode(_))
        ));
        assert!(matches!(
            Isrc::parse("US-S!Z-99-00001"),
            Err(IsrcError::RegistrantCode(_))
        ));
        assert!(matches!(
            Isrc::parse("US-S1Z-9X-00001"),
            Err(IsrcError::Digits(_))
        ));
        assert!(matches!(Isrc::parse("USS1Z99"), Err(IsrcError::Length(_))));
        assert!(matches!(
            Isrc::parse("USS1Z99000011"),
            Err(IsrcError::Length(_))
        ));
    }

    #[test]
    fn test_serializes_compact() {
        let isrc: Isrc = "US-S1Z-99-00001".parse().unwrap();
        assert_eq!(serde_json::to_string(&isrc).unwrap(), "\"USS1Z9900001\"");
    }
}
