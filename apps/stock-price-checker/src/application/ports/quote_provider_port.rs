//! Quote Provider Port

use async_trait::async_trait;

use crate::domain::quote::{Quote, QuoteError};
use crate::domain::stock::Symbol;

/// Port for looking up the latest price of a stock.
///
/// Implementations make a single attempt per call and never retry.
#[async_trait]
pub trait QuoteProviderPort: Send + Sync {
    /// Fetch the latest quote for an already-normalized symbol.
    ///
    /// # Errors
    ///
    /// Returns a `QuoteError` carrying the reason to show clients when the
    /// quote source is unreachable or reports the symbol as invalid.
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError>;
}
