#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Stock Price Checker - Quote Lookup with Like Tracking
//!
//! An HTTP service that returns the latest price of one or two stocks from
//! the quote proxy and keeps a per-symbol set of distinct clients that liked
//! each stock.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core types with no external dependencies
//!   - `stock`: Symbols, client identities, like records
//!   - `quote`: Quote values and failure reasons
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Quote source and stock repository interfaces
//!   - `services`: Like ledger (find-or-create, idempotent likes)
//!   - `use_cases`: Stock lookup orchestration
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `quote_proxy`: REST client for the quote proxy
//!   - `persistence`: Turso and in-memory repositories
//!   - `http`: Axum router, request parsing, response shaping
//!   - `config`: Environment configuration
//!   - `health`: Health check and metrics routes
//!   - `metrics`, `telemetry`: Prometheus recorder and tracing subscriber
//!
//! # Data Flow
//!
//! ```text
//!                          ┌──────────────┐     ┌─────────────┐
//! GET /api/stock-prices ──►│ LookupStocks │──┬─►│ Quote Proxy │ (per symbol)
//!                          │   use case   │  │  └─────────────┘
//!                          └──────────────┘  │  ┌─────────────┐
//!                                            └─►│ Like Ledger │──► Turso
//!                                               └─────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core types with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::quote::{GENERIC_QUOTE_ERROR, Quote, QuoteError};
pub use domain::stock::{ClientId, StockRecord, Symbol};

// Application
pub use application::ports::{QuoteProviderPort, RepositoryError, StockRepository};
pub use application::services::{LedgerError, LikeLedger};
pub use application::use_cases::{
    LookupError, LookupStocksUseCase, StockLookup, StockQuery, SymbolResult,
};

// Infrastructure config
pub use infrastructure::config::{AppConfig, ConfigError, StorageBackend};

// Adapters
pub use infrastructure::http::{AppState, WebSettings, create_router};
pub use infrastructure::persistence::{InMemoryStockRepository, TursoStockRepository};
pub use infrastructure::quote_proxy::{QuoteProxyAdapter, QuoteProxyError};

// Health
pub use infrastructure::health::HealthState;

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
