//! HTTP/REST API adapter.
//!
//! Inbound adapter serving the stock price endpoint, the landing page and
//! static assets.

mod controller;
mod request;
mod response;
mod security;

pub use controller::{AppState, WebSettings, create_router};
pub use request::{StockPricesParams, client_id};
pub use response::*;
pub use security::content_security_policy;
