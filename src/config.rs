//! Client configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::time::Duration;

/// Default GraphQL endpoint for a locally running gateway.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080/query";

/// URI scheme embedded in friend QR codes.
pub const DEFAULT_FRIEND_QR_SCHEME: &str = "fitnessapp";

/// Identity tokens live one hour upstream; we treat them as expired after 55 minutes.
pub const DEFAULT_TOKEN_CACHE_TTL_SECS: u64 = 55 * 60;

/// Renewal fires ahead of the cache expiry.
pub const DEFAULT_TOKEN_RENEWAL_INTERVAL_SECS: u64 = 50 * 60;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint of the remote data gateway
    pub gateway_url: String,
    /// Firebase Web API key (public, identifies the project)
    pub firebase_api_key: String,
    /// Firebase Storage bucket for profile and group images
    pub storage_bucket: String,
    /// RevenueCat public API key
    pub revenuecat_api_key: Option<String>,
    /// Deployment environment ("development", "preview", "production")
    pub app_env: String,
    /// Production banner ad unit
    pub banner_unit_id: Option<String>,
    /// URI scheme for friend QR payloads
    pub friend_qr_scheme: String,
    /// How long a fetched identity token is trusted
    pub token_cache_ttl: Duration,
    /// Interval of the background token renewal
    pub token_renewal_interval: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            firebase_api_key: "test_api_key".to_string(),
            storage_bucket: "test-bucket.appspot.com".to_string(),
            revenuecat_api_key: None,
            app_env: "development".to_string(),
            banner_unit_id: None,
            friend_qr_scheme: DEFAULT_FRIEND_QR_SCHEME.to_string(),
            token_cache_ttl: Duration::from_secs(DEFAULT_TOKEN_CACHE_TTL_SECS),
            token_renewal_interval: Duration::from_secs(DEFAULT_TOKEN_RENEWAL_INTERVAL_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let token_cache_ttl = parse_secs("TOKEN_CACHE_TTL_SECS", DEFAULT_TOKEN_CACHE_TTL_SECS)?;
        let token_renewal_interval = parse_secs(
            "TOKEN_RENEWAL_INTERVAL_SECS",
            DEFAULT_TOKEN_RENEWAL_INTERVAL_SECS,
        )?;

        if token_renewal_interval >= token_cache_ttl {
            return Err(ConfigError::Invalid(
                "TOKEN_RENEWAL_INTERVAL_SECS",
                "must be shorter than TOKEN_CACHE_TTL_SECS".to_string(),
            ));
        }

        Ok(Self {
            gateway_url: env::var("GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            storage_bucket: env::var("FIREBASE_STORAGE_BUCKET").unwrap_or_default(),
            revenuecat_api_key: env::var("REVENUECAT_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            banner_unit_id: env::var("ADMOB_BANNER_UNIT_ID").ok(),
            friend_qr_scheme: env::var("FRIEND_QR_SCHEME")
                .unwrap_or_else(|_| DEFAULT_FRIEND_QR_SCHEME.to_string()),
            token_cache_ttl,
            token_renewal_interval,
        })
    }

    /// Whether this is a production build (real ads, real purchases).
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn parse_secs(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid(name, e.to_string())),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
