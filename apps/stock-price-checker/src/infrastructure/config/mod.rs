//! Configuration Module
//!
//! Environment-driven settings for the HTTP server, quote proxy client and
//! stock storage.

mod settings;

pub use settings::{
    AppConfig, ConfigError, DEFAULT_QUOTE_API_BASE_URL, QuoteApiSettings, ServerSettings,
    StorageBackend, StorageSettings,
};
