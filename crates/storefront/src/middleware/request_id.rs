//! Request ID middleware for request tracing and correlation.
//!
//! An `x-request-id` supplied by a proxy is kept; otherwise a UUID v4 is
//! generated. The id is recorded on the current span, tagged on the Sentry
//! scope and echoed back in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Pick the incoming id when it is usable, else mint one.
fn resolve_request_id(incoming: Option<&HeaderValue>) -> String {
    incoming
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_upstream_id() {
        let upstream = HeaderValue::from_static("abc-123");
        assert_eq!(resolve_request_id(Some(&upstream)), "abc-123");
    }

    #[test]
    fn test_generates_uuid_when_missing_or_blank() {
        let generated = resolve_request_id(None);
        assert!(Uuid::parse_str(&generated).is_ok());

        let blank = HeaderValue::from_static("  ");
        assert!(Uuid::parse_str(&resolve_request_id(Some(&blank))).is_ok());
    }
}
