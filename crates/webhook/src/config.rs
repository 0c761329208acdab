//! Webhook service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_WEBHOOK_SECRET` - Shared secret for webhook HMAC verification
//! - `SHOPIFY_STORE_URL` - Store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ADMIN_API_TOKEN` - Admin API access token (HIGH PRIVILEGE)
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM` - Email sender address
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-01)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `PO_RECIPIENTS` - Comma-separated purchase-order recipients
//!   (default: haroon@behope.ca)
//! - `RISK_RECIPIENTS` - Recipients for high-risk review emails
//!   (default: the `PO_RECIPIENTS` list)
//! - `WARNING_RECIPIENTS` - Recipients for address-warning review emails
//!   (default: the `PO_RECIPIENTS` list)
//! - `SUPPLIER_ACCOUNT_NUMBER` - Merchant account number quoted on POs
//!   (default: 62317)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `ADDRESS_CHECK_URL` - Address verification service base URL
//! - `ADDRESS_CHECK_API_KEY` - Address verification service API key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Webhook service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared secret for webhook signature verification
    pub webhook_secret: SecretString,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Email (SMTP) configuration
    pub email: EmailConfig,
    /// Recipient lists and purchase-order framing
    pub notifications: NotificationConfig,
    /// Address verification service (optional - unset disables the gate)
    pub address_check: Option<AddressCheckConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store domain (e.g., your-store.myshopify.com)
    pub store_url: String,
    /// Admin API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - order and product access)
    pub api_token: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_url", &self.store_url)
            .field("api_version", &self.api_version)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Recipient lists and purchase-order framing.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Recipients of the standard purchase-order email.
    pub po_recipients: Vec<String>,
    /// Recipients of the high-risk review email.
    pub risk_recipients: Vec<String>,
    /// Recipients of the address-warning review email.
    pub warning_recipients: Vec<String>,
    /// Merchant account number quoted in the purchase-order body.
    pub account_number: String,
}

/// Address verification service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct AddressCheckConfig {
    /// Service base URL
    pub base_url: String,
    /// Service API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for AddressCheckConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressCheckConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AddressCheckConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let base_url = get_optional_env("ADDRESS_CHECK_URL");
        let api_key = get_optional_env("ADDRESS_CHECK_API_KEY");

        match (base_url, api_key) {
            (Some(url), Some(key)) => {
                validate_secret_strength(&key, "ADDRESS_CHECK_API_KEY")?;
                Ok(Some(Self {
                    base_url: url,
                    api_key: SecretString::from(key),
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADDRESS_CHECK_*".to_string(),
                "Both ADDRESS_CHECK_URL and ADDRESS_CHECK_API_KEY must be set together"
                    .to_string(),
            )),
        }
    }
}

impl Config {
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

        let host = get_env_or_default("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let webhook_secret = get_validated_secret("SHOPIFY_WEBHOOK_SECRET")?;
        let shopify = ShopifyConfig::from_env()?;
        let email = EmailConfig::from_env()?;
        let notifications = NotificationConfig::from_env();
        let address_check = AddressCheckConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            webhook_secret,
            shopify,
            email,
            notifications,
            address_check,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store_url: get_required_env("SHOPIFY_STORE_URL")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2024-01"),
            api_token: get_validated_secret("SHOPIFY_ADMIN_API_TOKEN")?,
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            smtp_host: get_required_env("SMTP_HOST")?,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_validated_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("SMTP_FROM")?,
        })
    }
}

impl NotificationConfig {
    fn from_env() -> Self {
        let po_recipients = get_recipient_list("PO_RECIPIENTS")
            .unwrap_or_else(|| vec!["haroon@behope.ca".to_string()]);
        let risk_recipients =
            get_recipient_list("RISK_RECIPIENTS").unwrap_or_else(|| po_recipients.clone());
        let warning_recipients =
            get_recipient_list("WARNING_RECIPIENTS").unwrap_or_else(|| po_recipients.clone());

        Self {
            po_recipients,
            risk_recipients,
            warning_recipients,
            account_number: get_env_or_default("SUPPLIER_ACCOUNT_NUMBER", "62317"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated recipient list from the environment.
///
/// Returns `None` when the variable is unset or contains no addresses.
fn get_recipient_list(key: &str) -> Option<Vec<String>> {
    let raw = get_optional_env(key)?;
    let recipients: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if recipients.is_empty() {
        None
    } else {
        Some(recipients)
    }
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
    let len = s.len() as f64;
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

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API tokens have high entropy)
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

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-webhook-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_shopify_config_debug_redacts_token() {
        let config = ShopifyConfig {
            store_url: "test-store.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            api_token: SecretString::from("shpat_9f8e7d6c5b4a"),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("test-store.myshopify.com"));
        assert!(debug_output.contains("2024-01"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_9f8e7d6c5b4a"));
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: "orders@behope.ca".to_string(),
            smtp_password: SecretString::from("kq9mz3vx8w2r"),
            from_address: "orders@behope.ca".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("smtp.gmail.com"));
        assert!(debug_output.contains("587"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("kq9mz3vx8w2r"));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            webhook_secret: SecretString::from("x".repeat(32)),
            shopify: ShopifyConfig {
                store_url: "test-store.myshopify.com".to_string(),
                api_version: "2024-01".to_string(),
                api_token: SecretString::from("shpat_test"),
            },
            email: EmailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                smtp_username: "user".to_string(),
                smtp_password: SecretString::from("pass"),
                from_address: "orders@behope.ca".to_string(),
            },
            notifications: NotificationConfig {
                po_recipients: vec!["haroon@behope.ca".to_string()],
                risk_recipients: vec!["haroon@behope.ca".to_string()],
                warning_recipients: vec!["haroon@behope.ca".to_string()],
                account_number: "62317".to_string(),
            },
            address_check: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
