//! Saved address domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jolananas_core::sanitize::{MAX_LINE_CHARS, sanitize_line};
use jolananas_core::{AddressId, CountryCode, UserId};

/// A user's saved shipping address.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    /// Optional nickname ("Maison", "Bureau").
    pub label: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub province: Option<String>,
    pub country_code: CountryCode,
    pub phone: Option<String>,
    /// At most one address per user is the default.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Address fields as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub label: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    #[serde(default)]
    pub province: Option<String>,
    pub country_code: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// A sanitized, validated [`AddressInput`] ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAddress {
    pub label: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub province: Option<String>,
    pub country_code: CountryCode,
    pub phone: Option<String>,
    pub is_default: bool,
}

impl AddressInput {
    /// Sanitize every field and check the required ones.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<ValidAddress, String> {
        let required = |value: &str, field: &str| {
            let clean = sanitize_line(value, MAX_LINE_CHARS);
            if clean.is_empty() {
                Err(format!("{field} is required"))
            } else {
                Ok(clean)
            }
        };

        let country_code = CountryCode::parse(&self.country_code)
            .map_err(|e| format!("country_code: {e}"))?;

        Ok(ValidAddress {
            label: optional_line(self.label.as_deref()),
            first_name: required(&self.first_name, "first_name")?,
            last_name: required(&self.last_name, "last_name")?,
            company: optional_line(self.company.as_deref()),
            address1: required(&self.address1, "address1")?,
            address2: optional_line(self.address2.as_deref()),
            city: required(&self.city, "city")?,
            zip: required(&self.zip, "zip")?,
            province: optional_line(self.province.as_deref()),
            country_code,
            phone: optional_line(self.phone.as_deref()),
            is_default: self.is_default,
        })
    }
}

/// Sanitize an optional single-line field, mapping blank to `None`.
#[must_use]
pub fn optional_line(value: Option<&str>) -> Option<String> {
    value
        .map(|v| sanitize_line(v, MAX_LINE_CHARS))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> AddressInput {
        AddressInput {
            label: Some("  Maison ".to_string()),
            first_name: "Jeanne".to_string(),
            last_name: "Baret".to_string(),
            company: Some("   ".to_string()),
            address1: "12 rue des Ananas".to_string(),
            address2: None,
            city: "Nantes".to_string(),
            zip: "44000".to_string(),
            province: None,
            country_code: "fr".to_string(),
            phone: None,
            is_default: false,
        }
    }

    #[test]
    fn test_validate_trims_and_normalizes() {
        let valid = input().validate().unwrap();
        assert_eq!(valid.label.as_deref(), Some("Maison"));
        assert_eq!(valid.company, None);
        assert_eq!(valid.country_code, CountryCode::FRANCE);
    }

    #[test]
    fn test_validate_requires_fields() {
        let mut missing_city = input();
        missing_city.city = " ".to_string();
        assert_eq!(missing_city.validate().unwrap_err(), "city is required");

        let mut bad_country = input();
        bad_country.country_code = "France".to_string();
        assert!(bad_country.validate().unwrap_err().starts_with("country_code"));
    }
}
