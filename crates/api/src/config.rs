use std::time::Duration;

use recette_persistance::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Downstream connection settings.
    pub persistance: PersistanceConfig,
    /// Read cache sizing and expiry.
    pub cache: CacheConfig,
    /// Offload pool sizing for the async lookup endpoint.
    pub offload: OffloadConfig,
    /// Maintainer contact shown on `/api/status`.
    pub contact: ContactInfo,
}

/// Where and how to reach MS-Persistance.
#[derive(Debug, Clone)]
pub struct PersistanceConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entries per cache region.
    pub max_capacity: u64,
    /// Entries expire this long after insertion.
    pub time_to_live: Duration,
    /// Entries expire this long after their last read.
    pub time_to_idle: Duration,
}

#[derive(Debug, Clone)]
pub struct OffloadConfig {
    pub max_workers: usize,
    pub queue_capacity: usize,
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Default for PersistanceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 500,
            time_to_live: Duration::from_secs(600),
            time_to_idle: Duration::from_secs(300),
        }
    }
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            queue_capacity: 100,
            shutdown_timeout: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                            | Default                 |
    /// |------------------------------------|-------------------------|
    /// | `HOST`                             | `0.0.0.0`               |
    /// | `PORT`                             | `8080`                  |
    /// | `CORS_ORIGINS`                     | `*`                     |
    /// | `REQUEST_TIMEOUT_SECS`             | `30`                    |
    /// | `MS_PERSISTANCE_URL`               | `http://localhost:8090` |
    /// | `PERSISTANCE_CONNECT_TIMEOUT_SECS` | `5`                     |
    /// | `PERSISTANCE_READ_TIMEOUT_SECS`    | `10`                    |
    /// | `CACHE_MAX_CAPACITY`               | `500`                   |
    /// | `CACHE_TTL_SECS`                   | `600`                   |
    /// | `CACHE_TTI_SECS`                   | `300`                   |
    /// | `ASYNC_MAX_WORKERS`                | `10`                    |
    /// | `ASYNC_QUEUE_CAPACITY`             | `100`                   |
    /// | `ASYNC_SHUTDOWN_TIMEOUT_SECS`      | `60`                    |
    /// | `USERNAME`, `USEREMAIL`            | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_parse("PORT", 8080);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);

        let persistance = PersistanceConfig {
            base_url: std::env::var("MS_PERSISTANCE_URL")
                .unwrap_or_else(|_| "http://localhost:8090".into()),
            connect_timeout: Duration::from_secs(env_parse("PERSISTANCE_CONNECT_TIMEOUT_SECS", 5)),
            read_timeout: Duration::from_secs(env_parse("PERSISTANCE_READ_TIMEOUT_SECS", 10)),
        };

        let cache = CacheConfig {
            max_capacity: env_parse("CACHE_MAX_CAPACITY", 500),
            time_to_live: Duration::from_secs(env_parse("CACHE_TTL_SECS", 600)),
            time_to_idle: Duration::from_secs(env_parse("CACHE_TTI_SECS", 300)),
        };

        let offload = OffloadConfig {
            max_workers: env_parse("ASYNC_MAX_WORKERS", 10),
            queue_capacity: env_parse("ASYNC_QUEUE_CAPACITY", 100),
            shutdown_timeout: Duration::from_secs(env_parse("ASYNC_SHUTDOWN_TIMEOUT_SECS", 60)),
        };

        let contact = ContactInfo {
            name: std::env::var("USERNAME").ok().filter(|s| !s.is_empty()),
            email: std::env::var("USEREMAIL").ok().filter(|s| !s.is_empty()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            persistance,
            cache,
            offload,
            contact,
        }
    }

    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// Panics at startup on an unparseable value so misconfiguration fails fast.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
