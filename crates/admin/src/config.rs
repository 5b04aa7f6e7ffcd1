//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATEGORY_DISPLAY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `CATEGORY_DISPLAY_BASE_URL` - Public URL of this service
//!
//! ## Optional
//! - `CATEGORY_DISPLAY_HOST` - Bind address (default: 127.0.0.1)
//! - `CATEGORY_DISPLAY_PORT` - Listen port (default: 3001)
//! - `CATEGORY_DISPLAY_STOREFRONT_URL` - Base URL for category links (default: base URL)
//! - `CATEGORY_DISPLAY_PLACEHOLDER_IMAGE` - Image used for categories without a thumbnail
//! - `CATEGORY_DISPLAY_COUNT_LABEL` - Word rendered after the product count (default: products)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use category_display_core::sanitize_text_field;

const DEFAULT_PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";
const DEFAULT_COUNT_LABEL: &str = "products";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this service (no trailing slash)
    pub base_url: String,
    /// Rendering options for the category display fragment
    pub render: RenderConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Options that shape the rendered category display fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Base URL category links are built from (no trailing slash)
    pub storefront_url: String,
    /// Image shown for categories without a thumbnail
    pub placeholder_image_url: String,
    /// Word shown after the product count
    pub count_label: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            storefront_url: String::new(),
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            count_label: DEFAULT_COUNT_LABEL.to_owned(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env
            .optional("CATEGORY_DISPLAY_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("CATEGORY_DISPLAY_DATABASE_URL".to_owned()))?;
        let host = env
            .or_default("CATEGORY_DISPLAY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("CATEGORY_DISPLAY_HOST", &e))?;
        let port = env
            .or_default("CATEGORY_DISPLAY_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| invalid("CATEGORY_DISPLAY_PORT", &e))?;
        let base_url = parse_base_url("CATEGORY_DISPLAY_BASE_URL", &env.required("CATEGORY_DISPLAY_BASE_URL")?)?;

        let render = RenderConfig {
            storefront_url: match env.optional("CATEGORY_DISPLAY_STOREFRONT_URL") {
                Some(url) => parse_base_url("CATEGORY_DISPLAY_STOREFRONT_URL", &url)?,
                None => base_url.clone(),
            },
            placeholder_image_url: env
                .or_default("CATEGORY_DISPLAY_PLACEHOLDER_IMAGE", DEFAULT_PLACEHOLDER_IMAGE),
            count_label: sanitize_text_field(
                &env.or_default("CATEGORY_DISPLAY_COUNT_LABEL", DEFAULT_COUNT_LABEL),
            ),
        };

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            render,
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

    /// Whether the service is served over HTTPS (drives the `Secure` cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_owned())
    }
}

fn invalid(key: &str, err: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_owned(), err.to_string())
}

/// Validate an absolute http(s) URL and strip any trailing slash.
fn parse_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(key, &e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(key, &"must be an http or https URL"));
    }
    Ok(url.as_str().trim_end_matches('/').to_owned())
}
