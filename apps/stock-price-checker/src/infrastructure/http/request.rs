//! HTTP request parsing.

use std::net::IpAddr;

use axum::http::HeaderMap;

use crate::domain::stock::ClientId;

/// Header carrying the original client address behind a proxy.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Query parameters of `GET /api/stock-prices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPricesParams {
    /// Every `stock` value, in request order.
    pub stocks: Vec<String>,
    /// Whether the request likes the stocks.
    pub like: bool,
}

impl StockPricesParams {
    /// Collect parameters from decoded query pairs.
    ///
    /// `like` is set only when exactly one `like` value is present and it is
    /// the literal `true`.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut stocks = Vec::new();
        let mut likes = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "stock" => stocks.push(value),
                "like" => likes.push(value),
                _ => {}
            }
        }

        let like = matches!(likes.as_slice(), [only] if only == "true");
        Self { stocks, like }
    }
}

/// Identify the client: first entry of `X-Forwarded-For` if present and
/// non-empty, else the peer address.
#[must_use]
pub fn client_id(headers: &HeaderMap, peer: IpAddr) -> ClientId {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map_or_else(
            || ClientId::new(peer.to_canonical().to_string()),
            ClientId::new,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use test_case::test_case;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn collects_repeated_stocks_in_order() {
        let params = StockPricesParams::from_pairs(pairs(&[
            ("stock", "amzn"),
            ("foo", "bar"),
            ("stock", "t"),
        ]));
        assert_eq!(params.stocks, vec!["amzn", "t"]);
        assert!(!params.like);
    }

    #[test_case(&[("like", "true")], true ; "literal true")]
    #[test_case(&[("like", "TRUE")], false ; "case sensitive")]
    #[test_case(&[("like", "1")], false ; "numeric")]
    #[test_case(&[("like", "false")], false ; "literal false")]
    #[test_case(&[("like", "true"), ("like", "true")], false ; "repeated")]
    #[test_case(&[], false ; "absent")]
    fn like_flag(raw: &[(&str, &str)], expected: bool) {
        assert_eq!(StockPricesParams::from_pairs(pairs(raw)).like, expected);
    }

    #[test]
    fn forwarded_for_first_token_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR,
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        let id = client_id(&headers, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(id.as_str(), "203.0.113.7");
    }

    #[test]
    fn empty_forwarded_for_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static(""));
        let id = client_id(&headers, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(id.as_str(), "192.0.2.1");
    }

    #[test]
    fn mapped_ipv6_peer_is_canonical() {
        let peer = IpAddr::V6(Ipv4Addr::new(192, 0, 2, 1).to_ipv6_mapped());
        assert_eq!(client_id(&HeaderMap::new(), peer).as_str(), "192.0.2.1");
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert_eq!(client_id(&HeaderMap::new(), v6).as_str(), "::1");
    }
}
