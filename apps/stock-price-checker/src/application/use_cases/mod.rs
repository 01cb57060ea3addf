//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod lookup_stocks;

pub use lookup_stocks::{
    LookupError, LookupStocksUseCase, StockLookup, StockQuery, SymbolResult,
};
