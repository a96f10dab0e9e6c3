//! ISO 3166-1 alpha-2 country code.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input is not two ASCII letters.
    #[error("country code must be two letters, got {0:?}")]
    Invalid(String),
}

/// A two-letter country code, always upper-case.
///
/// ```
/// use jolananas_core::CountryCode;
///
/// assert_eq!(CountryCode::parse(" fr ").unwrap().as_str(), "FR");
/// assert!(CountryCode::parse("FRA").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// France, the storefront's home market.
    pub const FRANCE: Self = Self(*b"FR");

    /// Parse a country code, trimming whitespace and upper-casing.
    ///
    /// # Errors
    ///
    /// Returns `CountryCodeError::Invalid` unless the trimmed input is exactly
    /// two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let trimmed = s.trim();
        match trimmed.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(CountryCodeError::Invalid(s.to_owned())),
        }
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction
        core::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(CountryCode::parse("be").unwrap().as_str(), "BE");
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(CountryCode::parse("").is_err());
        assert!(CountryCode::parse("F").is_err());
        assert!(CountryCode::parse("F1").is_err());
        assert!(CountryCode::parse("FRA").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let code: CountryCode = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(code.as_str(), "DE");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"DE\"");
        assert!(serde_json::from_str::<CountryCode>("\"Deutschland\"").is_err());
    }
}
