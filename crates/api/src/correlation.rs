//! Request correlation across the two services.
//!
//! Every inbound request carries an `x-request-id`, kept when the caller sent
//! one and generated otherwise. The id is recorded on the request span, echoed
//! on the response, and put in scope for the handler so the customer client
//! forwards it on outbound calls.

use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use shipment::{REQUEST_ID, REQUEST_ID_HEADER};
use tracing::Span;

fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok())
}

/// Span for one HTTP request, tagged with its correlation id.
pub fn make_request_span(request: &axum::http::Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = request_id(request.headers()).unwrap_or("-"),
    )
}

/// Runs the handler with the request's correlation id in scope.
pub async fn scope_request_id(request: Request, next: Next) -> Response {
    match request_id(request.headers()).map(str::to_owned) {
        Some(id) => REQUEST_ID.scope(id, next.run(request)).await,
        None => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_request_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, "abc-123".parse().unwrap());
        assert_eq!(request_id(&headers), Some("abc-123"));
    }
}
