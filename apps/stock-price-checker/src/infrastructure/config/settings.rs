//! Service Configuration Settings
//!
//! Configuration types for the stock price checker, loaded from environment
//! variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Default quote proxy.
pub const DEFAULT_QUOTE_API_BASE_URL: &str = "https://stock-price-checker-proxy.freecodecamp.rocks";

/// Storage backend for stock records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Turso database file.
    #[default]
    Turso,
    /// Process-local map, lost on restart.
    Memory,
}

impl StorageBackend {
    /// Parse backend name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown names.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "turso" => Ok(Self::Turso),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORAGE_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }

    /// Get the backend name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Turso => "turso",
            Self::Memory => "memory",
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Listen address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Directory served under `/public`.
    pub public_dir: PathBuf,
    /// Directory holding `index.html`.
    pub views_dir: PathBuf,
}

impl ServerSettings {
    /// Socket address to bind.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            public_dir: PathBuf::from("public"),
            views_dir: PathBuf::from("views"),
        }
    }
}

/// Quote proxy client settings.
#[derive(Debug, Clone)]
pub struct QuoteApiSettings {
    /// Base URL; `/v1/stock/{symbol}/quote` is appended.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for QuoteApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Stock record storage settings.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Database path for the Turso backend.
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Turso,
            database_path: "stock-price-checker.db".to_string(),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Quote proxy settings.
    pub quote_api: QuoteApiSettings,
    /// Storage settings.
    pub storage: StorageSettings,
}

impl AppConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerSettings::default();
        let server = ServerSettings {
            host: parse_var(&lookup, "HOST", server_defaults.host)?,
            port: parse_var(&lookup, "PORT", server_defaults.port)?,
            public_dir: lookup("PUBLIC_DIR").map_or(server_defaults.public_dir, PathBuf::from),
            views_dir: lookup("VIEWS_DIR").map_or(server_defaults.views_dir, PathBuf::from),
        };

        let quote_defaults = QuoteApiSettings::default();
        let quote_api = QuoteApiSettings {
            base_url: non_empty(&lookup, "QUOTE_API_BASE_URL")
                .unwrap_or(quote_defaults.base_url),
            timeout: Duration::from_secs(parse_var(
                &lookup,
                "QUOTE_API_TIMEOUT_SECS",
                quote_defaults.timeout.as_secs(),
            )?),
        };

        let storage_defaults = StorageSettings::default();
        let storage = StorageSettings {
            backend: non_empty(&lookup, "STORAGE_BACKEND")
                .map_or(Ok(storage_defaults.backend), |s| StorageBackend::parse(&s))?,
            database_path: non_empty(&lookup, "DB").unwrap_or(storage_defaults.database_path),
        };

        Ok(Self {
            server,
            quote_api,
            storage,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has a value that cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup, key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}
