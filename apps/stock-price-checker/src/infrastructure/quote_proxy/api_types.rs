//! Quote proxy response types.
//!
//! The proxy answers unknown symbols with a bare JSON string and known ones
//! with an IEX-style quote object. Only the fields used here are modeled.

use serde::Deserialize;
use serde_json::Value;

use super::error::QuoteProxyError;

/// Any body the quote endpoint is known to return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuoteResponse {
    /// Bare message such as `"Unknown symbol"`.
    Message(String),
    /// Quote object.
    Quote(QuotePayload),
}

/// Quote object from the proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotePayload {
    /// Symbol echoed by the proxy.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Latest price, a number or a numeric string.
    #[serde(rename = "latestPrice", default)]
    pub latest_price: Option<Value>,
    /// Error reported in place of a quote.
    #[serde(default)]
    pub error: Option<Value>,
}

impl QuoteResponse {
    /// Extract the echoed symbol and price.
    ///
    /// `requested` stands in for the echo when the payload has none.
    pub fn into_price(self, requested: &str) -> Result<(String, f64), QuoteProxyError> {
        match self {
            Self::Message(reason) => Err(QuoteProxyError::Upstream(reason)),
            Self::Quote(payload) => payload.into_price(requested),
        }
    }
}

impl QuotePayload {
    fn into_price(self, requested: &str) -> Result<(String, f64), QuoteProxyError> {
        if let Some(error) = self.error.filter(is_truthy) {
            let reason = match error {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(QuoteProxyError::Upstream(reason));
        }

        let price = self
            .latest_price
            .as_ref()
            .and_then(parse_price)
            .ok_or(QuoteProxyError::MissingPrice)?;

        Ok((self.symbol.unwrap_or_else(|| requested.to_string()), price))
    }
}

/// Whether an `error` field reports an error. Empty strings, `false`, zero
/// and `null` do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}
