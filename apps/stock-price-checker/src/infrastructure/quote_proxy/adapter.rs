//! Quote proxy adapter implementing `QuoteProviderPort`.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::api_types::QuoteResponse;
use super::error::QuoteProxyError;
use crate::application::ports::QuoteProviderPort;
use crate::domain::quote::{Quote, QuoteError};
use crate::domain::stock::Symbol;
use crate::infrastructure::config::QuoteApiSettings;
use crate::infrastructure::metrics;

/// Quote source backed by the stock quote proxy.
///
/// One GET per call. No caching or retries.
#[derive(Debug, Clone)]
pub struct QuoteProxyAdapter {
    client: Client,
    base_url: Url,
}

impl QuoteProxyAdapter {
    /// Create a new adapter from settings.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(settings: &QuoteApiSettings) -> Result<Self, QuoteProxyError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| QuoteProxyError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(QuoteProxyError::InvalidUrl(settings.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| QuoteProxyError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Origin of the proxy, e.g. `https://host:port`.
    #[must_use]
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// URL of the quote endpoint for `symbol`, percent-encoded as one segment.
    fn quote_url(&self, symbol: &Symbol) -> Result<Url, QuoteProxyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| QuoteProxyError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "stock", symbol.as_str(), "quote"]);
        Ok(url)
    }

    async fn request_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteProxyError> {
        let url = self.quote_url(symbol)?;
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteProxyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteProxyError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| QuoteProxyError::Network(e.to_string()))?;
        metrics::record_quote_fetch_duration(started.elapsed());

        let decoded: QuoteResponse =
            serde_json::from_slice(&body).map_err(|e| QuoteProxyError::JsonParse(e.to_string()))?;
        let (echo, price) = decoded.into_price(symbol.as_str())?;

        Ok(Quote {
            symbol: echo,
            price,
        })
    }
}

#[async_trait]
impl QuoteProviderPort for QuoteProxyAdapter {
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        self.request_quote(symbol).await.map_err(|e| {
            tracing::warn!(%symbol, kind = e.kind().as_str(), error = %e, "Quote fetch failed");
            metrics::record_quote_error(e.kind());
            QuoteError::from(e)
        })
    }
}
