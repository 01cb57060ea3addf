//! HTTP Controller (Driver Adapter)
//!
//! Axum router for the stock price API, the landing page and static assets.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::application::ports::{QuoteProviderPort, StockRepository};
use crate::application::use_cases::{LookupStocksUseCase, StockQuery};
use crate::infrastructure::health::{self, HealthState};

use super::request::{StockPricesParams, client_id};
use super::response::{ApiError, StockPricesResponse};
use super::security;

/// Application state shared across handlers.
pub struct AppState<Q, R>
where
    Q: QuoteProviderPort,
    R: StockRepository,
{
    /// Use case for stock lookups.
    pub lookup_stocks: Arc<LookupStocksUseCase<Q, R>>,
    /// Health endpoint state.
    pub health: Arc<HealthState>,
}

impl<Q, R> Clone for AppState<Q, R>
where
    Q: QuoteProviderPort,
    R: StockRepository,
{
    fn clone(&self) -> Self {
        Self {
            lookup_stocks: Arc::clone(&self.lookup_stocks),
            health: Arc::clone(&self.health),
        }
    }
}

/// Filesystem and header settings for the web surface.
#[derive(Debug, Clone)]
pub struct WebSettings {
    /// Directory served under `/public`.
    pub public_dir: PathBuf,
    /// Directory holding `index.html`.
    pub views_dir: PathBuf,
    /// Quote proxy origin allowed by the CSP `connect-src`.
    pub quote_origin: String,
}

/// Create the HTTP router with all endpoints.
pub fn create_router<Q, R>(state: AppState<Q, R>, web: &WebSettings) -> Router
where
    Q: QuoteProviderPort + 'static,
    R: StockRepository + 'static,
{
    let health_routes = health::router(Arc::clone(&state.health));

    let router = Router::new()
        .route("/api/stock-prices", get(stock_prices::<Q, R>))
        .route("/api/stock-prices/", get(stock_prices::<Q, R>))
        .with_state(state)
        .merge(health_routes)
        .route_service("/", ServeFile::new(web.views_dir.join("index.html")))
        .nest_service("/public", ServeDir::new(&web.public_dir))
        .fallback(not_found);

    security::apply(router, &web.quote_origin)
}

/// Stock price lookup endpoint.
async fn stock_prices<Q, R>(
    State(state): State<AppState<Q, R>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<StockPricesResponse>, ApiError>
where
    Q: QuoteProviderPort + 'static,
    R: StockRepository + 'static,
{
    let params = StockPricesParams::from_pairs(pairs);
    let client = client_id(&headers, peer.ip());

    let query = StockQuery::from_values(params.stocks).inspect_err(|e| {
        tracing::debug!(client_id = %client, error = %e, "Rejected stock price request");
    })?;

    tracing::debug!(client_id = %client, like = params.like, ?query, "Looking up stocks");
    let lookup = state
        .lookup_stocks
        .execute(query, params.like, &client)
        .await?;

    Ok(Json(lookup.into()))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
