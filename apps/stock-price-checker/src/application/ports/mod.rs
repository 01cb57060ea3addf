//! Port Interfaces
//!
//! Contracts the application layer depends on. Infrastructure adapters
//! implement them.
//!
//! ## Driven Ports (Outbound)
//!
//! - `QuoteProviderPort`: latest price lookup against the quote source
//! - `StockRepository`: persisted stock records and their likers

mod quote_provider_port;
mod stock_repository_port;

pub use quote_provider_port::QuoteProviderPort;
pub use stock_repository_port::{RepositoryError, StockRepository};
