//! Quote values.

use serde::Serialize;
use thiserror::Error;

/// Reason reported when the quote source cannot be reached or answers badly.
pub const GENERIC_QUOTE_ERROR: &str = "External API error or invalid stock symbol";

/// Latest price for a symbol, as reported by the quote source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Symbol echoed by the quote source. Its casing may differ from the request.
    pub symbol: String,
    /// Latest trade price.
    pub price: f64,
}

/// A failed quote lookup.
///
/// Carries the reason shown to clients: either the upstream's own message or
/// [`GENERIC_QUOTE_ERROR`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct QuoteError {
    reason: String,
}

impl QuoteError {
    /// Error with an upstream-reported reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Error for transport failures and undecodable replies.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(GENERIC_QUOTE_ERROR)
    }

    /// The reason shown to clients.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
