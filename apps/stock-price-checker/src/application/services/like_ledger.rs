//! Like Ledger Service
//!
//! Finds or creates the record for a symbol, applies an idempotent like and
//! reports the resulting distinct-liker count.
//!
//! Two requests can both miss the record for a new symbol and race to create
//! it. The repository rejects the second insert with
//! `RepositoryError::DuplicateSymbol`; the loser re-reads the winner's record
//! and applies its like as an update.

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{RepositoryError, StockRepository};
use crate::domain::stock::{ClientId, StockRecord, Symbol};
use crate::infrastructure::metrics;

/// Maximum find-or-create rounds before a creation conflict is reported.
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Errors from the like ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The stock storage failed.
    #[error("stock storage failed for {symbol}: {source}")]
    Storage {
        /// Symbol being recorded.
        symbol: String,
        /// Underlying repository error.
        source: RepositoryError,
    },
}

impl LedgerError {
    fn storage(symbol: &Symbol, source: RepositoryError) -> Self {
        Self::Storage {
            symbol: symbol.to_string(),
            source,
        }
    }
}

/// Records likes against persisted stock records.
pub struct LikeLedger<R>
where
    R: StockRepository,
{
    repository: Arc<R>,
}

impl<R> LikeLedger<R>
where
    R: StockRepository,
{
    /// Create a ledger over an opened repository.
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record an optional like from `client` and return the like count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the repository fails, or if the
    /// record could not be created after `MAX_CREATE_ATTEMPTS` rounds.
    pub async fn record_like(
        &self,
        symbol: &Symbol,
        like: bool,
        client: &ClientId,
    ) -> Result<u64, LedgerError> {
        let mut last_conflict = None;

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let existing = self
                .repository
                .find_by_symbol(symbol)
                .await
                .map_err(|e| LedgerError::storage(symbol, e))?;

            if let Some(record) = existing {
                return self.update_existing(record, like, client).await;
            }

            let record = StockRecord::first_seen(symbol.clone(), like, client);
            match self.repository.insert(&record).await {
                Ok(()) => {
                    tracing::debug!(%symbol, like, "Created stock record");
                    if like {
                        metrics::record_like();
                    }
                    return Ok(record.like_count());
                }
                Err(e @ RepositoryError::DuplicateSymbol(_)) => {
                    tracing::debug!(%symbol, attempt, "Stock record created concurrently, retrying as update");
                    last_conflict = Some(e);
                }
                Err(e) => return Err(LedgerError::storage(symbol, e)),
            }
        }

        let conflict = last_conflict
            .unwrap_or_else(|| RepositoryError::DuplicateSymbol(symbol.to_string()));
        Err(LedgerError::storage(symbol, conflict))
    }

    async fn update_existing(
        &self,
        record: StockRecord,
        like: bool,
        client: &ClientId,
    ) -> Result<u64, LedgerError> {
        if !like || record.has_liker(client) {
            return Ok(record.like_count());
        }

        let updated = self
            .repository
            .add_liker(record.symbol(), client)
            .await
            .map_err(|e| LedgerError::storage(record.symbol(), e))?;

        metrics::record_like();
        Ok(updated.like_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryStockRepository;
    use async_trait::async_trait;
    use mockall::{Sequence, mock};

    mock! {
        Repo {}

        #[async_trait]
        impl StockRepository for Repo {
            async fn find_by_symbol(&self, symbol: &Symbol) -> Result<Option<StockRecord>, RepositoryError>;
            async fn insert(&self, record: &StockRecord) -> Result<(), RepositoryError>;
            async fn add_liker(&self, symbol: &Symbol, liker: &ClientId) -> Result<StockRecord, RepositoryError>;
        }
    }

    fn ledger() -> LikeLedger<InMemoryStockRepository> {
        LikeLedger::new(Arc::new(InMemoryStockRepository::new()))
    }

    #[tokio::test]
    async fn view_creates_empty_record() {
        let ledger = ledger();
        let count = ledger
            .record_like(&Symbol::new("TSLA"), false, &"1.1.1.1".into())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn like_is_idempotent_per_client() {
        let ledger = ledger();
        let symbol = Symbol::new("GOLD");
        let client = ClientId::new("1.1.1.1");

        assert_eq!(ledger.record_like(&symbol, true, &client).await.unwrap(), 1);
        assert_eq!(ledger.record_like(&symbol, true, &client).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn likes_from_distinct_clients_accumulate() {
        let ledger = ledger();
        let symbol = Symbol::new("AMZN");

        ledger.record_like(&symbol, false, &"a".into()).await.unwrap();
        assert_eq!(ledger.record_like(&symbol, true, &"a".into()).await.unwrap(), 1);
        assert_eq!(ledger.record_like(&symbol, true, &"b".into()).await.unwrap(), 2);
        // A plain view never lowers the count.
        assert_eq!(ledger.record_like(&symbol, false, &"c".into()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_likes_are_not_lost() {
        let ledger = Arc::new(ledger());
        let symbol = Symbol::new("NVDA");

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                let symbol = symbol.clone();
                tokio::spawn(async move {
                    ledger
                        .record_like(&symbol, true, &ClientId::new(format!("10.0.0.{i}")))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let count = ledger.record_like(&symbol, false, &"x".into()).await.unwrap();
        assert_eq!(count, 16);
    }

    #[tokio::test]
    async fn creation_race_is_retried_as_update() {
        let symbol = Symbol::new("T");
        let winner = StockRecord::first_seen(symbol.clone(), true, &"winner".into());
        let mut seq = Sequence::new();
        let mut repo = MockRepo::new();

        repo.expect_find_by_symbol()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r| Err(RepositoryError::DuplicateSymbol(r.symbol().to_string())));
        let found = winner.clone();
        repo.expect_find_by_symbol()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_add_liker()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |s, liker| {
                let mut record = StockRecord::with_likers(s.clone(), [ClientId::new("winner")]);
                record.add_liker(liker.clone());
                Ok(record)
            });

        let ledger = LikeLedger::new(Arc::new(repo));
        let count = ledger.record_like(&symbol, true, &"loser".into()).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn persistent_conflict_is_a_storage_error() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_symbol()
            .times(MAX_CREATE_ATTEMPTS as usize)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(MAX_CREATE_ATTEMPTS as usize)
            .returning(|r| Err(RepositoryError::DuplicateSymbol(r.symbol().to_string())));

        let ledger = LikeLedger::new(Arc::new(repo));
        let err = ledger
            .record_like(&Symbol::new("T"), false, &"a".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Storage {
                source: RepositoryError::DuplicateSymbol(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn database_failure_propagates() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_symbol()
            .returning(|_| Err(RepositoryError::Database("disk I/O error".to_string())));

        let ledger = LikeLedger::new(Arc::new(repo));
        let err = ledger
            .record_like(&Symbol::new("T"), true, &"a".into())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Storage {
                symbol: "T".to_string(),
                source: RepositoryError::Database("disk I/O error".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn existing_liker_skips_write() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_symbol().returning(|s| {
            Ok(Some(StockRecord::with_likers(s.clone(), [ClientId::new("a")])))
        });
        repo.expect_add_liker().never();

        let ledger = LikeLedger::new(Arc::new(repo));
        let count = ledger
            .record_like(&Symbol::new("T"), true, &"a".into())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
