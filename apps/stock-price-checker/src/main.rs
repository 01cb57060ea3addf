//! Stock Price Checker Binary
//!
//! Starts the HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stock-price-checker
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP listen port (default: 3000)
//! - `HOST`: HTTP listen address (default: 0.0.0.0)
//! - `DB`: Turso database path, `:memory:` allowed (default: stock-price-checker.db)
//! - `STORAGE_BACKEND`: turso | memory (default: turso)
//! - `QUOTE_API_BASE_URL`: Quote proxy (default: <https://stock-price-checker-proxy.freecodecamp.rocks>)
//! - `QUOTE_API_TIMEOUT_SECS`: Quote request timeout (default: 10)
//! - `PUBLIC_DIR`: Static asset directory (default: public)
//! - `VIEWS_DIR`: Landing page directory (default: views)
//! - `OTEL_ENABLED`: Enable OpenTelemetry export (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: stock-price-checker)
//! - `RUST_LOG`: Log filter (default: stock_price_checker=info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use stock_price_checker::{
    AppConfig, AppState, HealthState, InMemoryStockRepository, LookupStocksUseCase,
    QuoteProxyAdapter, StockRepository, StorageBackend, TursoStockRepository, WebSettings,
    create_router, init_metrics, init_telemetry,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    // Initialize telemetry (OpenTelemetry + tracing)
    let _telemetry_guard = init_telemetry().context("failed to initialize telemetry")?;

    tracing::info!("Starting Stock Price Checker");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = AppConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let quotes = Arc::new(
        QuoteProxyAdapter::new(&config.quote_api).context("failed to create quote proxy client")?,
    );

    match config.storage.backend {
        StorageBackend::Turso => {
            let repository = TursoStockRepository::open(&config.storage.database_path)
                .await
                .with_context(|| {
                    format!("failed to open database {}", config.storage.database_path)
                })?;
            serve(&config, quotes, Arc::new(repository)).await
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, likes are lost on restart");
            serve(&config, quotes, Arc::new(InMemoryStockRepository::new())).await
        }
    }
}

/// Serve HTTP until a shutdown signal arrives.
async fn serve<R>(
    config: &AppConfig,
    quotes: Arc<QuoteProxyAdapter>,
    repository: Arc<R>,
) -> anyhow::Result<()>
where
    R: StockRepository + 'static,
{
    let web = WebSettings {
        public_dir: config.server.public_dir.clone(),
        views_dir: config.server.views_dir.clone(),
        quote_origin: quotes.origin(),
    };
    let state = AppState {
        lookup_stocks: Arc::new(LookupStocksUseCase::new(quotes, repository)),
        health: Arc::new(HealthState::new(env!("CARGO_PKG_VERSION"))),
    };
    let app = create_router(state, &web);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server listening");

    let shutdown_token = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown_token.clone()));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_token.cancelled_owned())
    .await
    .context("HTTP server failed")?;

    tracing::info!("Stock Price Checker stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &AppConfig) {
    tracing::info!(
        addr = %config.server.bind_addr(),
        storage = config.storage.backend.as_str(),
        database = %config.storage.database_path,
        quote_api = %config.quote_api.base_url,
        quote_timeout_secs = config.quote_api.timeout.as_secs(),
        "Configuration loaded"
    );
    tracing::debug!(
        public_dir = %config.server.public_dir.display(),
        views_dir = %config.server.views_dir.display(),
        "Static directories"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();

    tracing::info!("Graceful shutdown started");
}
