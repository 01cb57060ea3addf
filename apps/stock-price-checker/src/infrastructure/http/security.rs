//! Security and CORS response headers applied to every route.

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

/// Policy used when the quote origin cannot be placed in a header.
const SELF_ONLY_CSP: &str = "default-src 'self'; script-src 'self' https://code.jquery.com; \
     style-src 'self'; connect-src 'self'; img-src 'self' data:";

/// Content Security Policy allowing the landing page's jQuery CDN and
/// `fetch` calls to the quote proxy origin.
#[must_use]
pub fn content_security_policy(quote_origin: &str) -> String {
    format!(
        "default-src 'self'; script-src 'self' https://code.jquery.com; style-src 'self'; \
         connect-src 'self' {quote_origin}; img-src 'self' data:"
    )
}

/// Wrap `router` with the security headers and a permissive CORS policy.
pub fn apply(router: Router, quote_origin: &str) -> Router {
    let csp = HeaderValue::from_str(&content_security_policy(quote_origin)).unwrap_or_else(|e| {
        tracing::warn!(quote_origin, error = %e, "Quote origin not usable in CSP, omitting it");
        HeaderValue::from_static(SELF_ONLY_CSP)
    });

    router
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("same-origin"),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
