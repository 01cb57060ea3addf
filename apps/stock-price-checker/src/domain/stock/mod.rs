//! Stock Record Aggregate
//!
//! A `StockRecord` is created the first time a symbol is looked up and keeps
//! the set of distinct clients that have liked it. Likers are only ever
//! added, so the like count never decreases.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects
// =============================================================================

/// A stock ticker, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol, normalizing to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identity of a client that can like a stock, derived from its network address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Create a client identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// Aggregate
// =============================================================================

/// Persisted per-symbol like ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    symbol: Symbol,
    likers: BTreeSet<ClientId>,
}

impl StockRecord {
    /// Create a record with no likers.
    #[must_use]
    pub const fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            likers: BTreeSet::new(),
        }
    }

    /// Create the record for a first lookup.
    ///
    /// When the creating request carries a like, the requesting client is
    /// the only initial liker.
    #[must_use]
    pub fn first_seen(symbol: Symbol, like: bool, client: &ClientId) -> Self {
        let mut record = Self::new(symbol);
        if like {
            record.add_liker(client.clone());
        }
        record
    }

    /// Rebuild a record from stored likers.
    #[must_use]
    pub fn with_likers(symbol: Symbol, likers: impl IntoIterator<Item = ClientId>) -> Self {
        Self {
            symbol,
            likers: likers.into_iter().collect(),
        }
    }

    /// The record's symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Iterate over the likers in a stable order.
    pub fn likers(&self) -> impl Iterator<Item = &ClientId> {
        self.likers.iter()
    }

    /// Whether `client` has already liked this stock.
    #[must_use]
    pub fn has_liker(&self, client: &ClientId) -> bool {
        self.likers.contains(client)
    }

    /// Add a liker. Returns `false` if the client was already a liker.
    pub fn add_liker(&mut self, client: ClientId) -> bool {
        self.likers.insert(client)
    }

    /// Number of distinct likers.
    #[must_use]
    pub fn like_count(&self) -> u64 {
        self.likers.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_normalizes_case() {
        assert_eq!(Symbol::new("goog").as_str(), "GOOG");
        assert_eq!(Symbol::from("Msft"), Symbol::new("MSFT"));
    }

    #[test]
    fn first_seen_without_like_is_empty() {
        let record = StockRecord::first_seen(Symbol::new("TSLA"), false, &"1.2.3.4".into());
        assert_eq!(record.like_count(), 0);
    }

    #[test]
    fn first_seen_with_like_holds_only_requester() {
        let client = ClientId::new("1.2.3.4");
        let record = StockRecord::first_seen(Symbol::new("TSLA"), true, &client);
        assert_eq!(record.like_count(), 1);
        assert!(record.has_liker(&client));
    }

    #[test]
    fn add_liker_is_idempotent() {
        let mut record = StockRecord::new(Symbol::new("GOLD"));
        assert!(record.add_liker("10.0.0.1".into()));
        assert!(!record.add_liker("10.0.0.1".into()));
        assert!(record.add_liker("10.0.0.2".into()));
        assert_eq!(record.like_count(), 2);
    }

    #[test]
    fn with_likers_collapses_duplicates() {
        let record = StockRecord::with_likers(
            Symbol::new("T"),
            ["a", "b", "a"].into_iter().map(ClientId::from),
        );
        assert_eq!(record.like_count(), 2);
        let likers: Vec<&str> = record.likers().map(ClientId::as_str).collect();
        assert_eq!(likers, vec!["a", "b"]);
    }
}
