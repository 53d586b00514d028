// ABOUTME: Baseline security headers added to every response
// ABOUTME: Existing headers set by handlers are left alone

use axum::http::{header, HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

/// Layer stack setting nosniff, frame denial, and a strict referrer policy.
pub fn security_headers(
) -> ServiceBuilder<Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>> {
    ServiceBuilder::new()
        .layer(if_missing(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(if_missing(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        // Credentials travel in the query string on the post-login redirect
        .layer(if_missing(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
}

fn if_missing(name: HeaderName, value: HeaderValue) -> HeaderLayer {
    SetResponseHeaderLayer::if_not_present(name, value)
}
