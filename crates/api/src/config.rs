use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::jwt::AuthConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Which persistence backend serves users and products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process maps; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("expected 'postgres' or 'memory', got '{other}'")),
        }
    }
}

/// Per-client request budget.
///
/// A client may spend `max_requests` at once; spent requests come back one
/// at a time, spread evenly over `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// 100 requests per 15 minutes.
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    /// Time after which one spent request is available again.
    pub fn replenish_period(&self) -> Duration {
        self.window / self.max_requests.max(1)
    }

    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let max_requests: u32 = parse_or(get, "RATE_LIMIT_MAX", defaults.max_requests)?;
        let window_secs: u64 =
            parse_or(get, "RATE_LIMIT_WINDOW_SECS", defaults.window.as_secs())?;

        if max_requests == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_MAX",
                reason: "must be positive".into(),
            });
        }
        if window_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_WINDOW_SECS",
                reason: "must be positive".into(),
            });
        }

        let config = Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        };
        if config.replenish_period().is_zero() {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_MAX",
                reason: format!("too large for a {window_secs}s window"),
            });
        }
        Ok(config)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the token secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// `APP_ENV=production` turns on `Secure` cookies.
    pub production: bool,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    /// Root directory for uploaded files (default: `uploads`).
    pub uploads_dir: PathBuf,
    pub rate_limit: RateLimitConfig,
    /// Token secrets and lifetimes.
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `APP_ENV`                | `development`              |
    /// | `STORE_BACKEND`          | `postgres`                 |
    /// | `DATABASE_URL`           | -- (required for postgres) |
    /// | `UPLOADS_DIR`            | `uploads`                  |
    /// | `RATE_LIMIT_MAX`         | `100`                      |
    /// | `RATE_LIMIT_WINDOW_SECS` | `900`                      |
    ///
    /// Token settings are documented on [`AuthConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "PORT", 3000)?;

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?;

        let production = get("APP_ENV").as_deref() == Some("production");

        let store_backend: StoreBackend = parse_or(&get, "STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = get("DATABASE_URL").filter(|url| !url.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let uploads_dir = PathBuf::from(get("UPLOADS_DIR").unwrap_or_else(|| "uploads".into()));

        let rate_limit = RateLimitConfig::from_lookup(&get)?;

        let auth = AuthConfig::from_lookup(&get)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            production,
            store_backend,
            database_url,
            uploads_dir,
            rate_limit,
            auth,
        })
    }
}

/// Parse `key` through `get`, falling back to `default` when unset.
pub(crate) fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
