//! Quote Proxy Adapter
//!
//! Implementation of `QuoteProviderPort` over the stock quote proxy's REST
//! API (`GET /v1/stock/{symbol}/quote`).

mod adapter;
mod api_types;
mod error;

pub use adapter::QuoteProxyAdapter;
pub use error::QuoteProxyError;
