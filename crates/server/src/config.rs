//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GEMINI_API_KEY` - Google Gemini API key
//!
//! ## Optional
//! - `LINGOFY_HOST` - Bind address (default: 127.0.0.1)
//! - `LINGOFY_PORT` - Listen port (default: 3001)
//! - `LINGOFY_CORS_ORIGIN` - Origin allowed to call the API (default: `http://localhost:5173`)
//! - `LINGOFY_LOG_JSON` - Emit JSON logs when set
//! - `GEMINI_CHAT_MODEL` - Chat model ID (default: gemini-2.5-flash)
//! - `GEMINI_IMAGE_MODEL` - Image model ID (default: gemini-2.5-flash-image)
//! - `GEMINI_BASE_URL` - API base URL (default: `https://generativelanguage.googleapis.com`)
//! - `GEMINI_TIMEOUT_SECS` - Request timeout in seconds (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Values people paste into `.env` files before they have a real key.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "gemini_api_key",
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

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origin allowed by CORS
    pub cors_origin: HeaderValue,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Gemini configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Google Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: SecretString,
    /// Model used for the assistant chat
    pub chat_model: String,
    /// Model used for product image generation
    pub image_model: String,
    /// API base URL, without the `/v1beta` prefix
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Configuration with default models against `base_url`.
    #[must_use]
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let timeout = get_env_or_default(
            "GEMINI_TIMEOUT_SECS",
            &DEFAULT_GEMINI_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("GEMINI_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            api_key: get_validated_secret("GEMINI_API_KEY")?,
            chat_model: get_env_or_default("GEMINI_CHAT_MODEL", DEFAULT_CHAT_MODEL),
            image_model: get_env_or_default("GEMINI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            base_url: get_env_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            timeout: Duration::from_secs(timeout),
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("LINGOFY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LINGOFY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("LINGOFY_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LINGOFY_PORT".to_string(), e.to_string()))?;
        let cors_origin = parse_origin(&get_env_or_default(
            "LINGOFY_CORS_ORIGIN",
            DEFAULT_CORS_ORIGIN,
        ))?;
        let log_json = get_optional_env("LINGOFY_LOG_JSON").is_some_and(|v| is_truthy(&v));

        let gemini = GeminiConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = sample_rate("SENTRY_SAMPLE_RATE").unwrap_or(1.0);
        let sentry_traces_sample_rate = sample_rate("SENTRY_TRACES_SAMPLE_RATE").unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            cors_origin,
            log_json,
            gemini,
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

// =============================================================================
// Helpers
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// A Sentry sample rate in `0.0..=1.0`, or `None` if unset or invalid.
fn sample_rate(key: &str) -> Option<f32> {
    get_optional_env(key)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|rate| (0.0..=1.0).contains(rate))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a CORS origin into a header value.
fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let origin = origin.trim().trim_end_matches('/');
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar(
            "LINGOFY_CORS_ORIGIN".to_string(),
            format!("expected an http(s) origin, got {origin:?}"),
        ));
    }
    HeaderValue::from_str(origin)
        .map_err(|e| ConfigError::InvalidEnvVar("LINGOFY_CORS_ORIGIN".to_string(), e.to_string()))
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

    #[allow(clippy::cast_precision_loss)] // Key lengths are tiny
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder values and obviously fake keys.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
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
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let err = validate_secret_strength("your-gemini-key", "GEMINI_API_KEY").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));

        assert!(validate_secret_strength("GEMINI_API_KEY", "GEMINI_API_KEY").is_err());
    }

    #[test]
    fn test_low_entropy_key_rejected() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaa", "GEMINI_API_KEY").is_err());
    }

    #[test]
    fn test_realistic_key_accepted() {
        assert!(
            validate_secret_strength("AIzaSyD3kq9Lm2Vb7Rt0Wp4Hn6Jc8Xz1Fg5Qe", "GEMINI_API_KEY")
                .is_ok()
        );
    }

    #[test]
    fn test_parse_origin() {
        assert_eq!(
            parse_origin("http://localhost:5173/").unwrap(),
            "http://localhost:5173"
        );
        assert!(parse_origin("localhost:5173").is_err());
        assert!(parse_origin("https://studio.lingofy.app\n").is_ok());
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = GeminiConfig::new(
            SecretString::from("AIzaSyD3kq9Lm2Vb7Rt0Wp4Hn6Jc8Xz1Fg5Qe"),
            "http://localhost",
        );
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("AIzaSy"));
        assert!(debug.contains("gemini-2.5-flash-image"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            log_json: false,
            gemini: GeminiConfig::new(SecretString::from("k"), DEFAULT_GEMINI_BASE_URL),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
    }
}
