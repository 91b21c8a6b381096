//! Runtime configuration for the dashboard services
//!
//! Settings are read from `SALON_*` environment variables on top of
//! built-in defaults.

use ::config::{Config, Environment};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Base URL of the salon REST API
pub const DEFAULT_UPSTREAM_URL: &str = "https://beautysalongates-production.up.railway.app/api/v1";

/// Session lifetime when none is configured (30 days)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

const MIN_SECRET_LEN: usize = 32;

/// Settings shared by the auth and api services
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Upstream salon API base URL
    pub upstream_url: String,
    /// Public base URL of the dashboard api service, used for same-origin proxy calls
    pub dashboard_url: String,
    /// HMAC secret for signing session tokens
    pub session_secret: String,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
    /// Listen address of the auth service
    pub auth_bind: String,
    /// Listen address of the api service
    pub api_bind: String,
    /// Connect timeout for upstream calls, in seconds
    pub connect_timeout_secs: u64,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
}

impl Settings {
    /// Load settings from the environment
    ///
    /// # Environment Variables
    /// - `SALON_UPSTREAM_URL`: upstream base URL (default: the production salon API)
    /// - `SALON_DASHBOARD_URL`: api service base URL (default: "http://localhost:3001")
    /// - `SALON_SESSION_SECRET`: session signing secret, at least 32 bytes (required)
    /// - `SALON_SESSION_TTL_SECS`: session lifetime (default: 2592000)
    /// - `SALON_AUTH_BIND`: auth service address (default: "0.0.0.0:3000")
    /// - `SALON_API_BIND`: api service address (default: "0.0.0.0:3001")
    /// - `SALON_CONNECT_TIMEOUT_SECS`: upstream connect timeout (default: 20)
    /// - `SALON_COOKIE_SECURE`: mark the session cookie `Secure` (default: false)
    pub fn from_env() -> ConfigResult<Self> {
        let settings: Settings = Config::builder()
            .set_default("upstream_url", DEFAULT_UPSTREAM_URL)?
            .set_default("dashboard_url", "http://localhost:3001")?
            .set_default("session_ttl_secs", DEFAULT_SESSION_TTL_SECS as i64)?
            .set_default("auth_bind", "0.0.0.0:3000")?
            .set_default("api_bind", "0.0.0.0:3001")?
            .set_default("connect_timeout_secs", 20_i64)?
            .set_default("cookie_secure", false)?
            .add_source(Environment::with_prefix("SALON"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> ConfigResult<()> {
        if self.session_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "session_secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "session_ttl_secs must be greater than zero".to_string(),
            ));
        }

        for (name, url) in [
            ("upstream_url", &self.upstream_url),
            ("dashboard_url", &self.dashboard_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got {}",
                    name, url
                )));
            }
        }

        Ok(())
    }
}
