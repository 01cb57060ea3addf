//! Integration tests for the stock price API.
//!
//! Runs the full router on a real listener, against a mocked quote proxy and
//! a Turso database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use stock_price_checker::infrastructure::config::QuoteApiSettings;
use stock_price_checker::{
    AppState, HealthState, LookupStocksUseCase, QuoteProxyAdapter, StockRepository,
    TursoStockRepository, WebSettings, create_router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    shutdown: CancellationToken,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl TestServer {
    async fn get(&self, uri: &str, forwarded_for: Option<&str>) -> (u16, Value) {
        let mut request = self.client.get(format!("{}{uri}", self.base_url));
        if let Some(ip) = forwarded_for {
            request = request.header("x-forwarded-for", ip);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

async fn mock_quote_proxy() -> MockServer {
    let server = MockServer::start().await;
    for (symbol, price) in [("GOOG", 786.5), ("MSFT", 62.3), ("TSLA", 250.0)] {
        Mock::given(method("GET"))
            .and(path(format!("/v1/stock/{symbol}/quote")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"symbol": symbol, "latestPrice": price})),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/v1/stock/BOGUS/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Unknown symbol")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/stock/DOWN/quote"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    server
}

async fn spawn_app<R: StockRepository + 'static>(proxy: &MockServer, repository: R) -> TestServer {
    let quotes = Arc::new(
        QuoteProxyAdapter::new(&QuoteApiSettings {
            base_url: proxy.uri(),
            timeout: Duration::from_secs(2),
        })
        .unwrap(),
    );
    let web = WebSettings {
        public_dir: "public".into(),
        views_dir: "views".into(),
        quote_origin: quotes.origin(),
    };
    let state = AppState {
        lookup_stocks: Arc::new(LookupStocksUseCase::new(quotes, Arc::new(repository))),
        health: Arc::new(HealthState::new("test")),
    };
    let app = create_router(state, &web);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(token.cancelled_owned())
        .await
        .unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
        shutdown,
    }
}

async fn turso_app(proxy: &MockServer) -> TestServer {
    spawn_app(proxy, TursoStockRepository::open(":memory:").await.unwrap()).await
}

#[tokio::test]
async fn viewing_one_stock() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (status, body) = app.get("/api/stock-prices?stock=goog", None).await;

    assert_eq!(status, 200);
    assert_eq!(body["stockData"]["stock"], "GOOG");
    assert_eq!(body["stockData"]["price"], 786.5);
    assert_eq!(body["stockData"]["likes"], 0);
}

#[tokio::test]
async fn liking_one_stock_twice_from_same_address() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (_, first) = app.get("/api/stock-prices?stock=GOOG&like=true", None).await;
    let (_, second) = app.get("/api/stock-prices?stock=GOOG&like=true", None).await;

    assert_eq!(first["stockData"]["likes"], 1);
    assert_eq!(second["stockData"]["likes"], 1);
}

#[tokio::test]
async fn forwarded_addresses_count_as_distinct_clients() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    app.get("/api/stock-prices?stock=TSLA&like=true", Some("203.0.113.1"))
        .await;
    app.get("/api/stock-prices?stock=TSLA&like=true", Some("203.0.113.2, 10.0.0.9"))
        .await;
    let (_, body) = app
        .get("/api/stock-prices?stock=TSLA&like=true", Some("203.0.113.1"))
        .await;

    assert_eq!(body["stockData"]["likes"], 2);
}

#[tokio::test]
async fn viewing_two_stocks_with_like() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;
    app.get("/api/stock-prices?stock=MSFT&like=true", Some("198.51.100.1"))
        .await;

    let (status, body) = app
        .get("/api/stock-prices?stock=GOOG&stock=MSFT&like=true", None)
        .await;

    assert_eq!(status, 200);
    let data = body["stockData"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["stock"], "GOOG");
    assert_eq!(data[1]["stock"], "MSFT");
    assert_eq!(data[0]["rel_likes"], -1);
    assert_eq!(data[1]["rel_likes"], 1);
    assert_eq!(
        data[0]["rel_likes"].as_i64().unwrap(),
        -data[1]["rel_likes"].as_i64().unwrap()
    );
}

#[tokio::test]
async fn unknown_symbol_reports_upstream_reason() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (status, body) = app.get("/api/stock-prices?stock=bogus", None).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"stockData": {"error": "Unknown symbol", "stock": "BOGUS"}})
    );
}

#[tokio::test]
async fn upstream_outage_reports_generic_reason() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (_, body) = app.get("/api/stock-prices?stock=down", None).await;

    assert_eq!(
        body["stockData"]["error"],
        "External API error or invalid stock symbol"
    );
    assert!(body["stockData"].get("price").is_none());
}

#[tokio::test]
async fn pair_with_failed_quote_is_rejected_as_whole() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (status, body) = app
        .get("/api/stock-prices?stock=GOOG&stock=BOGUS", None)
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"error": "External API error: one or more stocks could not be fetched"})
    );
}

#[tokio::test]
async fn three_symbols_are_a_bad_request() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (status, body) = app
        .get("/api/stock-prices?stock=A&stock=B&stock=C", None)
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "expected one or two stock symbols, got 3");
}

#[tokio::test]
async fn concurrent_first_likes_are_all_counted() {
    let proxy = mock_quote_proxy().await;
    let app = Arc::new(turso_app(&proxy).await);

    let requests: Vec<_> = (1..=8)
        .map(|i| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                app.get(
                    "/api/stock-prices?stock=TSLA&like=true",
                    Some(&format!("192.0.2.{i}")),
                )
                .await
            })
        })
        .collect();
    for request in requests {
        let (status, _) = request.await.unwrap();
        assert_eq!(status, 200);
    }

    let (_, body) = app.get("/api/stock-prices?stock=TSLA", None).await;
    assert_eq!(body["stockData"]["likes"], 8);
}

#[tokio::test]
async fn health_endpoint_is_served() {
    let proxy = mock_quote_proxy().await;
    let app = turso_app(&proxy).await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}
