//! In-memory stock repository.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::{RepositoryError, StockRepository};
use crate::domain::stock::{ClientId, StockRecord, Symbol};

/// In-memory implementation of `StockRepository`.
///
/// Records are lost on restart. Used for tests and `STORAGE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct InMemoryStockRepository {
    records: Mutex<HashMap<Symbol, StockRecord>>,
}

impl InMemoryStockRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl StockRepository for InMemoryStockRepository {
    async fn find_by_symbol(&self, symbol: &Symbol) -> Result<Option<StockRecord>, RepositoryError> {
        Ok(self.records.lock().get(symbol).cloned())
    }

    async fn insert(&self, record: &StockRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock();
        if records.contains_key(record.symbol()) {
            return Err(RepositoryError::DuplicateSymbol(record.symbol().to_string()));
        }
        records.insert(record.symbol().clone(), record.clone());
        Ok(())
    }

    async fn add_liker(&self, symbol: &Symbol, liker: &ClientId) -> Result<StockRecord, RepositoryError> {
        let mut records = self.records.lock();
        let record = records
            .get_mut(symbol)
            .ok_or_else(|| RepositoryError::NotFound(symbol.to_string()))?;
        record.add_liker(liker.clone());
        Ok(record.clone())
    }
}
