//! Stock Repository Port (Driven Port)
//!
//! Persistence contract for stock records. Symbol uniqueness and liker
//! uniqueness must be enforced atomically by the implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::stock::{ClientId, StockRecord, Symbol};

/// Errors from stock persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// A record for this symbol already exists.
    #[error("stock {0} already exists")]
    DuplicateSymbol(String),

    /// No record exists for this symbol.
    #[error("stock {0} not found")]
    NotFound(String),

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(String),
}

/// Port for stock record persistence.
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Find the record for `symbol`.
    async fn find_by_symbol(&self, symbol: &Symbol) -> Result<Option<StockRecord>, RepositoryError>;

    /// Insert a new record with its initial likers.
    ///
    /// Fails with `RepositoryError::DuplicateSymbol` if the symbol is taken.
    async fn insert(&self, record: &StockRecord) -> Result<(), RepositoryError>;

    /// Add `liker` to the record unless already present and return the
    /// record as stored afterwards.
    ///
    /// Fails with `RepositoryError::NotFound` if no record exists.
    async fn add_liker(
        &self,
        symbol: &Symbol,
        liker: &ClientId,
    ) -> Result<StockRecord, RepositoryError>;
}
