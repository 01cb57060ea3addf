//! Quote proxy error types.

use thiserror::Error;

use crate::domain::quote::QuoteError;
use crate::infrastructure::metrics::QuoteErrorKind;

/// Errors from the quote proxy adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteProxyError {
    /// Request failed before a response arrived, including timeouts.
    #[error("Network error: {0}")]
    Network(String),

    /// Proxy answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Body was not a recognizable quote payload.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Payload carried no usable `latestPrice`.
    #[error("Quote has no numeric price")]
    MissingPrice,

    /// Proxy reported its own error for the symbol.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Base URL cannot carry a path.
    #[error("Invalid quote proxy URL: {0}")]
    InvalidUrl(String),
}

impl QuoteProxyError {
    /// Metric label for this failure.
    #[must_use]
    pub const fn kind(&self) -> QuoteErrorKind {
        match self {
            Self::Network(_) => QuoteErrorKind::Network,
            Self::Status(_) => QuoteErrorKind::Status,
            Self::JsonParse(_) => QuoteErrorKind::Decode,
            Self::MissingPrice => QuoteErrorKind::MissingPrice,
            Self::Upstream(_) => QuoteErrorKind::Upstream,
            Self::InvalidUrl(_) => QuoteErrorKind::InvalidUrl,
        }
    }
}

impl From<QuoteProxyError> for QuoteError {
    fn from(err: QuoteProxyError) -> Self {
        match err {
            QuoteProxyError::Upstream(reason) => Self::new(reason),
            QuoteProxyError::Network(_)
            | QuoteProxyError::Status(_)
            | QuoteProxyError::JsonParse(_)
            | QuoteProxyError::MissingPrice
            | QuoteProxyError::InvalidUrl(_) => Self::generic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::GENERIC_QUOTE_ERROR;
    use test_case::test_case;

    #[test_case(QuoteProxyError::Network("connection refused".into()) ; "network")]
    #[test_case(QuoteProxyError::Status(502) ; "status")]
    #[test_case(QuoteProxyError::JsonParse("expected value".into()) ; "json")]
    #[test_case(QuoteProxyError::MissingPrice ; "missing price")]
    fn transport_failures_use_generic_reason(err: QuoteProxyError) {
        assert_eq!(QuoteError::from(err).reason(), GENERIC_QUOTE_ERROR);
    }

    #[test]
    fn upstream_reason_is_kept() {
        let err = QuoteError::from(QuoteProxyError::Upstream("Invalid symbol".into()));
        assert_eq!(err.reason(), "Invalid symbol");
    }
}
