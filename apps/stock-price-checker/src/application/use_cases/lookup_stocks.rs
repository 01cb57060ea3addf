//! Lookup Stocks Use Case
//!
//! Resolves one or two symbols. Each symbol runs on its own spawned task,
//! where the quote fetch and the like update are joined.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{QuoteProviderPort, StockRepository};
use crate::application::services::{LedgerError, LikeLedger};
use crate::domain::stock::{ClientId, Symbol};
use crate::infrastructure::metrics;

/// Errors that abort a whole lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Zero or more than two symbols were requested.
    #[error("expected one or two stock symbols, got {0}")]
    InvalidArity(usize),

    /// A symbol was not valid UTF-8 once decoded.
    #[error("invalid stock symbol: {0:?}")]
    InvalidSymbol(String),

    /// The like storage failed for one of the symbols.
    #[error("{0}")]
    Storage(String),

    /// A per-symbol task panicked or was cancelled.
    #[error("lookup task failed: {0}")]
    TaskFailed(String),
}

impl From<LedgerError> for LookupError {
    fn from(err: LedgerError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Requested symbols, by arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockQuery {
    /// A single symbol.
    One(Symbol),
    /// A pair, in request order.
    Two(Symbol, Symbol),
}

impl StockQuery {
    /// Build a query from raw `stock` values, normalizing each to uppercase.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidArity` unless exactly one or two values
    /// are given, and `LookupError::InvalidSymbol` for a value carrying the
    /// replacement character left by lossy percent-decoding.
    pub fn from_values<I, S>(values: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut symbols: Vec<Symbol> = values.into_iter().map(Symbol::new).collect();
        if let Some(bad) = symbols
            .iter()
            .find(|s| s.as_str().contains(char::REPLACEMENT_CHARACTER))
        {
            return Err(LookupError::InvalidSymbol(bad.to_string()));
        }
        match symbols.len() {
            1 => Ok(Self::One(symbols.remove(0))),
            2 => {
                let second = symbols.remove(1);
                let first = symbols.remove(0);
                Ok(Self::Two(first, second))
            }
            n => Err(LookupError::InvalidArity(n)),
        }
    }

    /// Label used for metrics.
    #[must_use]
    pub const fn arity(&self) -> &'static str {
        match self {
            Self::One(_) => "one",
            Self::Two(..) => "two",
        }
    }
}

/// Outcome for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolResult {
    /// Requested symbol (uppercase).
    pub symbol: Symbol,
    /// Latest price, absent when the fetch failed.
    pub price: Option<f64>,
    /// Distinct likers after this request.
    pub like_count: u64,
    /// Reason the fetch failed.
    pub error: Option<String>,
}

impl SymbolResult {
    /// Whether the quote fetch failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Lookup results, mirroring the query arity.
#[derive(Debug, Clone, PartialEq)]
pub enum StockLookup {
    /// Result for a single symbol.
    One(SymbolResult),
    /// Results for a pair, in request order.
    Two(SymbolResult, SymbolResult),
}

/// Use case for looking up stock prices and recording likes.
pub struct LookupStocksUseCase<Q, R>
where
    Q: QuoteProviderPort,
    R: StockRepository,
{
    quotes: Arc<Q>,
    ledger: Arc<LikeLedger<R>>,
}

impl<Q, R> LookupStocksUseCase<Q, R>
where
    Q: QuoteProviderPort + 'static,
    R: StockRepository + 'static,
{
    /// Create a new `LookupStocksUseCase`.
    pub fn new(quotes: Arc<Q>, repository: Arc<R>) -> Self {
        Self {
            quotes,
            ledger: Arc::new(LikeLedger::new(repository)),
        }
    }

    /// Look up every symbol in `query`, recording a like from `client` when
    /// `like` is set.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Storage` if the like storage failed for any
    /// symbol and `LookupError::TaskFailed` if a per-symbol task did not
    /// complete.
    pub async fn execute(
        &self,
        query: StockQuery,
        like: bool,
        client: &ClientId,
    ) -> Result<StockLookup, LookupError> {
        metrics::record_lookup(query.arity());

        match query {
            StockQuery::One(symbol) => {
                let result = self.spawn_lookup(symbol, like, client).await;
                Ok(StockLookup::One(flatten(result)?))
            }
            StockQuery::Two(first, second) => {
                let (a, b) = tokio::join!(
                    self.spawn_lookup(first, like, client),
                    self.spawn_lookup(second, like, client),
                );
                Ok(StockLookup::Two(flatten(a)?, flatten(b)?))
            }
        }
    }

    fn spawn_lookup(
        &self,
        symbol: Symbol,
        like: bool,
        client: &ClientId,
    ) -> tokio::task::JoinHandle<Result<SymbolResult, LedgerError>> {
        let quotes = Arc::clone(&self.quotes);
        let ledger = Arc::clone(&self.ledger);
        let client = client.clone();

        tokio::spawn(async move {
            let (quote, likes) = tokio::join!(
                quotes.fetch_quote(&symbol),
                ledger.record_like(&symbol, like, &client),
            );

            let like_count = likes.inspect_err(|e| {
                tracing::error!(%symbol, client_id = %client, error = %e, "Failed to record like");
                metrics::record_storage_error();
            })?;

            Ok(match quote {
                Ok(quote) => SymbolResult {
                    symbol,
                    price: Some(quote.price),
                    like_count,
                    error: None,
                },
                Err(e) => SymbolResult {
                    symbol,
                    price: None,
                    like_count,
                    error: Some(e.reason().to_string()),
                },
            })
        })
    }
}

fn flatten(
    joined: Result<Result<SymbolResult, LedgerError>, tokio::task::JoinError>,
) -> Result<SymbolResult, LookupError> {
    match joined {
        Ok(result) => Ok(result?),
        Err(e) => {
            tracing::error!(error = %e, "Lookup task failed");
            Err(LookupError::TaskFailed(e.to_string()))
        }
    }
}
