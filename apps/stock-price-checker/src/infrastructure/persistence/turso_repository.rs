//! Turso stock repository.
//!
//! Schema:
//!
//! ```sql
//! stocks(symbol TEXT PRIMARY KEY NOT NULL)
//! stock_likers(symbol TEXT NOT NULL, liker TEXT NOT NULL, PRIMARY KEY (symbol, liker))
//! ```
//!
//! All statements run on one connection behind an async mutex, so calls do
//! not interleave. Writes run inside a transaction and are rolled back as a
//! whole on failure.

use async_trait::async_trait;
use tokio::sync::Mutex;
use turso::{Builder, Connection, Database, Value};

use crate::application::ports::{RepositoryError, StockRepository};
use crate::domain::stock::{ClientId, StockRecord, Symbol};

const CREATE_STOCKS: &str = "CREATE TABLE IF NOT EXISTS stocks (symbol TEXT PRIMARY KEY NOT NULL)";

const CREATE_STOCK_LIKERS: &str = "CREATE TABLE IF NOT EXISTS stock_likers (\
     symbol TEXT NOT NULL, \
     liker TEXT NOT NULL, \
     PRIMARY KEY (symbol, liker))";

/// Turso-backed implementation of `StockRepository`.
pub struct TursoStockRepository {
    _db: Database,
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for TursoStockRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TursoStockRepository").finish_non_exhaustive()
    }
}

impl TursoStockRepository {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// `:memory:` opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database cannot be opened
    /// or the schema cannot be created.
    pub async fn open(path: &str) -> Result<Self, RepositoryError> {
        let db = Builder::new_local(path).build().await.map_err(db_error)?;
        let conn = db.connect().map_err(db_error)?;

        conn.execute(CREATE_STOCKS, ()).await.map_err(db_error)?;
        conn.execute(CREATE_STOCK_LIKERS, ()).await.map_err(db_error)?;

        tracing::info!(path, "Opened stock database");
        Ok(Self {
            _db: db,
            conn: Mutex::new(conn),
        })
    }
}

fn db_error(err: turso::Error) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}

async fn stock_exists(conn: &Connection, symbol: &Symbol) -> Result<bool, RepositoryError> {
    let mut rows = conn
        .query("SELECT symbol FROM stocks WHERE symbol = ?", [symbol.as_str()])
        .await
        .map_err(db_error)?;
    Ok(rows.next().await.map_err(db_error)?.is_some())
}

async fn load_likers(conn: &Connection, symbol: &Symbol) -> Result<Vec<ClientId>, RepositoryError> {
    let mut rows = conn
        .query(
            "SELECT liker FROM stock_likers WHERE symbol = ?",
            [symbol.as_str()],
        )
        .await
        .map_err(db_error)?;

    let mut likers = Vec::new();
    while let Some(row) = rows.next().await.map_err(db_error)? {
        match row.get_value(0).map_err(db_error)? {
            Value::Text(liker) => likers.push(ClientId::new(liker)),
            other => {
                return Err(RepositoryError::Database(format!(
                    "unexpected liker value for {symbol}: {other:?}"
                )));
            }
        }
    }
    Ok(likers)
}

async fn load_record(conn: &Connection, symbol: &Symbol) -> Result<Option<StockRecord>, RepositoryError> {
    if !stock_exists(conn, symbol).await? {
        return Ok(None);
    }
    let likers = load_likers(conn, symbol).await?;
    Ok(Some(StockRecord::with_likers(symbol.clone(), likers)))
}

async fn insert_liker(conn: &Connection, symbol: &Symbol, liker: &ClientId) -> Result<(), RepositoryError> {
    conn.execute(
        "INSERT INTO stock_likers (symbol, liker) VALUES (?, ?)",
        [symbol.as_str(), liker.as_str()],
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

async fn begin(conn: &Connection) -> Result<(), RepositoryError> {
    conn.execute("BEGIN", ()).await.map_err(db_error)?;
    Ok(())
}

/// Commit on success, roll back on failure.
async fn finish<T>(conn: &Connection, result: Result<T, RepositoryError>) -> Result<T, RepositoryError> {
    let result = match result {
        Ok(value) => conn
            .execute("COMMIT", ())
            .await
            .map(|_| value)
            .map_err(db_error),
        Err(e) => Err(e),
    };
    if result.is_err()
        && let Err(rollback) = conn.execute("ROLLBACK", ()).await
    {
        tracing::warn!(error = %rollback, "Stock write rollback failed");
    }
    result
}

async fn insert_record(conn: &Connection, record: &StockRecord) -> Result<(), RepositoryError> {
    let symbol = record.symbol();
    if stock_exists(conn, symbol).await? {
        return Err(RepositoryError::DuplicateSymbol(symbol.to_string()));
    }

    conn.execute("INSERT INTO stocks (symbol) VALUES (?)", [symbol.as_str()])
        .await
        .map_err(db_error)?;

    for liker in record.likers() {
        insert_liker(conn, symbol, liker).await?;
    }
    Ok(())
}

async fn append_liker(
    conn: &Connection,
    symbol: &Symbol,
    liker: &ClientId,
) -> Result<StockRecord, RepositoryError> {
    let mut record = load_record(conn, symbol)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(symbol.to_string()))?;

    if record.add_liker(liker.clone()) {
        insert_liker(conn, symbol, liker).await?;
    }
    Ok(record)
}

#[async_trait]
impl StockRepository for TursoStockRepository {
    async fn find_by_symbol(&self, symbol: &Symbol) -> Result<Option<StockRecord>, RepositoryError> {
        let conn = self.conn.lock().await;
        load_record(&conn, symbol).await
    }

    async fn insert(&self, record: &StockRecord) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().await;
        begin(&conn).await?;
        let result = insert_record(&conn, record).await;
        finish(&conn, result).await
    }

    async fn add_liker(&self, symbol: &Symbol, liker: &ClientId) -> Result<StockRecord, RepositoryError> {
        let conn = self.conn.lock().await;
        begin(&conn).await?;
        let result = append_liker(&conn, symbol, liker).await;
        finish(&conn, result).await
    }
}
