//! Storefront configuration loaded from environment variables.
//!
//! Nothing is strictly required: every variable has a documented default so a
//! local checkout runs against a placeholder project. Values that are present
//! but unparsable are rejected.
//!
//! # Environment Variables
//!
//! ## Sanity
//! - `SANITY_PROJECT_ID` - Sanity project ID (default: your-project-id)
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - Dated API version (default: 2024-01-01)
//! - `SANITY_API_TOKEN` - Bearer token for private datasets
//! - `SANITY_USE_CDN` - Read through the API CDN (default: false)
//! - `SANITY_API_BASE_URL` - Override the API host (proxies, tests)
//! - `SANITY_CACHE_TTL_SECS` - Response cache TTL, 0 disables (default: 300)
//! - `SANITY_TIMEOUT_SECS` - HTTP timeout (default: 10)
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//!
//! ## Pricing
//! - `SHIPPING_FLAT_FEE` - Flat shipping fee (default: 9.99)
//! - `FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 100)
//! - `TAX_RATE` - Tax rate as a fraction (default: 0.08)
//!
//! ## Simulated services
//! - `AUTH_SIMULATED_DELAY_MS` - Delay of the stand-in identity provider (default: 1000)
//! - `CONTACT_SIMULATED_DELAY_MS` - Delay of the stand-in contact delivery (default: 1000)
//! - `NEWSLETTER_SIMULATED_DELAY_MS` - Delay of the stand-in newsletter signup (default: 1000)
//!
//! ## Logging
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment name reported to Sentry
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Default Sanity project ID placeholder.
pub const DEFAULT_PROJECT_ID: &str = "your-project-id";
/// Default Sanity dataset.
pub const DEFAULT_DATASET: &str = "production";
/// Default Sanity API version.
pub const DEFAULT_API_VERSION: &str = "2024-01-01";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Sanity content API configuration
    pub sanity: SanityConfig,
    /// Shipping and tax rules
    pub pricing: PricingConfig,
    /// Delay of the simulated identity provider
    pub auth_delay: Duration,
    /// Delay of the simulated contact form delivery
    pub contact_delay: Duration,
    /// Delay of the simulated newsletter signup
    pub newsletter_delay: Duration,
    /// Emit logs as JSON instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Sanity content API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Sanity project ID
    pub project_id: String,
    /// Dataset name (e.g., production)
    pub dataset: String,
    /// Dated API version (e.g., 2024-01-01)
    pub api_version: String,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Read through `apicdn.sanity.io` instead of the live API
    pub use_cdn: bool,
    /// Explicit API base URL, overriding the derived host
    pub api_base_url: Option<String>,
    /// Response cache TTL (zero disables the cache)
    pub cache_ttl: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("use_cdn", &self.use_cdn)
            .field("api_base_url", &self.api_base_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: None,
            use_cdn: false,
            api_base_url: None,
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Shipping and tax rules applied to the cart summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Flat shipping fee charged at or below the threshold
    pub shipping_flat_fee: Decimal,
    /// Subtotal strictly above which shipping is free
    pub free_shipping_threshold: Decimal,
    /// Tax rate as a fraction of the subtotal (0.08 = 8%)
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_flat_fee: Decimal::new(999, 2),
            free_shipping_threshold: Decimal::from(100),
            tax_rate: Decimal::new(8, 2),
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
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("STOREFRONT_HOST", "127.0.0.1")?,
            port: parse_env_or_default("STOREFRONT_PORT", "3000")?,
            base_url: validate_url(
                "STOREFRONT_BASE_URL",
                get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
            )?,
            sanity: SanityConfig::from_env()?,
            pricing: PricingConfig::from_env()?,
            auth_delay: Duration::from_millis(parse_env_or_default(
                "AUTH_SIMULATED_DELAY_MS",
                "1000",
            )?),
            contact_delay: Duration::from_millis(parse_env_or_default(
                "CONTACT_SIMULATED_DELAY_MS",
                "1000",
            )?),
            newsletter_delay: Duration::from_millis(parse_env_or_default(
                "NEWSLETTER_SIMULATED_DELAY_MS",
                "1000",
            )?),
            json_logs: parse_log_format(&get_env_or_default("LOG_FORMAT", "text"))?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            sanity: SanityConfig::default(),
            pricing: PricingConfig::default(),
            auth_delay: Duration::from_secs(1),
            contact_delay: Duration::from_secs(1),
            newsletter_delay: Duration::from_secs(1),
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl SanityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_env_or_default("SANITY_PROJECT_ID", DEFAULT_PROJECT_ID),
            dataset: get_env_or_default("SANITY_DATASET", DEFAULT_DATASET),
            api_version: get_env_or_default("SANITY_API_VERSION", DEFAULT_API_VERSION),
            token: get_optional_env("SANITY_API_TOKEN").map(SecretString::from),
            use_cdn: parse_bool_env("SANITY_USE_CDN", false)?,
            api_base_url: get_optional_env("SANITY_API_BASE_URL")
                .map(|url| validate_url("SANITY_API_BASE_URL", url))
                .transpose()?,
            cache_ttl: Duration::from_secs(parse_env_or_default("SANITY_CACHE_TTL_SECS", "300")?),
            timeout: Duration::from_secs(parse_env_or_default("SANITY_TIMEOUT_SECS", "10")?),
        })
    }

    /// Base URL of the query API, without the version segment.
    ///
    /// `https://<project>.api.sanity.io` for live reads,
    /// `https://<project>.apicdn.sanity.io` when the CDN is enabled.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        if let Some(base) = &self.api_base_url {
            return base.trim_end_matches('/').to_string();
        }
        let host = if self.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!("https://{}.{host}", self.project_id)
    }

    /// Full URL of the GROQ query endpoint for the configured dataset.
    #[must_use]
    pub fn query_url(&self) -> String {
        let version = self.api_version.trim_start_matches('v');
        format!(
            "{}/v{version}/data/query/{}",
            self.api_base_url(),
            self.dataset
        )
    }
}

impl PricingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            shipping_flat_fee: parse_env_or_default("SHIPPING_FLAT_FEE", "9.99")?,
            free_shipping_threshold: parse_env_or_default("FREE_SHIPPING_THRESHOLD", "100")?,
            tax_rate: parse_env_or_default("TAX_RATE", "0.08")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional, non-blank environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// `LOG_FORMAT` is `text` or `json`; returns whether JSON was chosen.
fn parse_log_format(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(false),
        "json" => Ok(true),
        other => Err(ConfigError::InvalidEnvVar(
            "LOG_FORMAT".to_string(),
            format!("expected text or json, got {other}"),
        )),
    }
}

/// Reject values that are not absolute URLs.
fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    url::Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value)
}

/// Parse an environment variable, falling back to a default literal.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag accepting true/false, 1/0, yes/no, on/off.
fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_bool(key, &raw))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
