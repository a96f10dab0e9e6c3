//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JOLANANAS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JOLANANAS_BASE_URL` - Public URL for the storefront
//! - `JOLANANAS_SESSION_SECRET` - Session cookie signing secret (min 64 chars, high entropy)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., jolananas.myshopify.com)
//! - `SHOPIFY_STOREFRONT_TOKEN` - Storefront API private access token
//! - `SHOPIFY_ADMIN_TOKEN` - Admin API access token
//!
//! ## Optional
//! - `JOLANANAS_HOST` - Bind address (default: 127.0.0.1)
//! - `JOLANANAS_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `API_RETRY_ATTEMPTS` - Attempts per external call, 1 to 10 (default: 3)
//! - `API_RETRY_DELAY_MS` - Delay between attempts (default: 500)
//! - `GEOCODE_GOUV_URL` - BAN address API base URL
//! - `GEOCODE_PHOTON_URL` - Photon base URL
//! - `GEOCODE_NOMINATIM_URL` - Nominatim base URL
//! - `GEOCODE_USER_AGENT` - User agent sent to geocoders
//! - `GEOCODE_TIMEOUT_MS` - Per-provider timeout (default: 2500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tower_sessions::cookie::Key;

/// Cookie signing keys are 64 bytes.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_RETRY_ATTEMPTS: u32 = 10;

const DEFAULT_GOUV_URL: &str = "https://api-adresse.data.gouv.fr";
const DEFAULT_PHOTON_URL: &str = "https://photon.komoot.io";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Key signing the session cookie
    pub session_key: Key,
    /// Shopify API configuration
    pub shopify: ShopifyConfig,
    /// Retry policy for external calls
    pub retry: RetryConfig,
    /// Address autocomplete providers
    pub geocode: GeocodeConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront and Admin API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., jolananas.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_token: SecretString,
    /// Admin API access token
    pub admin_token: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_token", &"[REDACTED]")
            .field("admin_token", &"[REDACTED]")
            .finish()
    }
}

/// Fixed-attempt retry settings shared by every outbound client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Geocoding provider endpoints for address autocomplete.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// French government address API (BAN)
    pub gouv_url: String,
    /// Photon API
    pub photon_url: String,
    /// Nominatim API
    pub nominatim_url: String,
    /// User agent (Nominatim's usage policy requires one)
    pub user_agent: String,
    /// Per-provider request timeout
    pub timeout: Duration,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            gouv_url: DEFAULT_GOUV_URL.to_string(),
            photon_url: DEFAULT_PHOTON_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: Duration::from_millis(2500),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("JOLANANAS_DATABASE_URL")?;
        let host = get_env_or_default("JOLANANAS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("JOLANANAS_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("JOLANANAS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("JOLANANAS_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("JOLANANAS_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("JOLANANAS_BASE_URL".to_string(), e.to_string())
        })?;
        let session_secret = get_validated_secret("JOLANANAS_SESSION_SECRET")?;
        let session_key = build_session_key(&session_secret, "JOLANANAS_SESSION_SECRET")?;

        let shopify = ShopifyConfig::from_env()?;
        let retry = RetryConfig::from_env()?;
        let geocode = GeocodeConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_key,
            shopify,
            retry,
            geocode,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_token: get_validated_secret("SHOPIFY_STOREFRONT_TOKEN")?,
            admin_token: get_validated_secret("SHOPIFY_ADMIN_TOKEN")?,
        })
    }

    /// Storefront GraphQL endpoint.
    #[must_use]
    pub fn storefront_endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store, self.api_version
        )
    }

    /// Admin REST base URL (no trailing slash).
    #[must_use]
    pub fn admin_base_url(&self) -> String {
        format!("https://{}/admin/api/{}", self.store, self.api_version)
    }
}

impl RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let attempts = parse_env_or("API_RETRY_ATTEMPTS", 3_u32)?;
        if !(1..=MAX_RETRY_ATTEMPTS).contains(&attempts) {
            return Err(ConfigError::InvalidEnvVar(
                "API_RETRY_ATTEMPTS".to_string(),
                format!("must be between 1 and {MAX_RETRY_ATTEMPTS} (got {attempts})"),
            ));
        }
        let delay_ms = parse_env_or("API_RETRY_DELAY_MS", 500_u64)?;

        Ok(Self {
            attempts,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

impl GeocodeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms = parse_env_or("GEOCODE_TIMEOUT_MS", 2500_u64)?;

        Ok(Self {
            gouv_url: get_base_url("GEOCODE_GOUV_URL", DEFAULT_GOUV_URL)?,
            photon_url: get_base_url("GEOCODE_PHOTON_URL", DEFAULT_PHOTON_URL)?,
            nominatim_url: get_base_url("GEOCODE_NOMINATIM_URL", DEFAULT_NOMINATIM_URL)?,
            user_agent: get_optional_env("GEOCODE_USER_AGENT").unwrap_or_else(default_user_agent),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn default_user_agent() -> String {
    format!("jolananas-storefront/{}", env!("CARGO_PKG_VERSION"))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional numeric environment variable.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Get a base URL, validated and without trailing slash.
fn get_base_url(key: &str, default: &str) -> Result<String, ConfigError> {
    let raw = get_env_or_default(key, default);
    url::Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Build the cookie signing key from a session secret of sufficient length.
fn build_session_key(secret: &SecretString, var_name: &str) -> Result<Key, ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Key::try_from(value.as_bytes())
        .map_err(|e| ConfigError::InsecureSecret(var_name.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify() -> ShopifyConfig {
        ShopifyConfig {
            store: "jolananas.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_token: SecretString::from("super_private_storefront_token"),
            admin_token: SecretString::from("shpat_super_private_admin_token"),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_session_key_too_short() {
        let secret = SecretString::from("short");
        assert!(build_session_key(&secret, "TEST_SESSION").is_err());

        // Enough for the entropy check, not for a signing key
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6");
        assert!(build_session_key(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_session_key_from_long_secret() {
        let secret = SecretString::from("a".repeat(64));
        let key = build_session_key(&secret, "TEST_SESSION").unwrap();
        assert_eq!(key, build_session_key(&secret, "TEST_SESSION").unwrap());
        assert_eq!(format!("{key:?}"), "Key");
    }

    #[test]
    fn test_shopify_endpoints() {
        let config = shopify();
        assert_eq!(
            config.storefront_endpoint(),
            "https://jolananas.myshopify.com/api/2026-01/graphql.json"
        );
        assert_eq!(
            config.admin_base_url(),
            "https://jolananas.myshopify.com/admin/api/2026-01"
        );
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", shopify());

        assert!(debug_output.contains("jolananas.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_private_storefront_token"));
        assert!(!debug_output.contains("shpat_super_private_admin_token"));
    }

    #[test]
    fn test_geocode_defaults() {
        let config = GeocodeConfig::default();
        assert_eq!(config.gouv_url, "https://api-adresse.data.gouv.fr");
        assert!(config.user_agent.starts_with("jolananas-storefront/"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_socket_addr_and_https() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://jolananas.com".to_string(),
            session_key: Key::from(&[7; 64]),
            shopify: shopify(),
            retry: RetryConfig::default(),
            geocode: GeocodeConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(config.is_https());
    }
}
