//! Request tracking middleware
//!
//! Every request gets a TypeID request id (`req_<uuidv7>`) in `x-request-id`
//! unless the caller already sent one. The id is echoed on the response and
//! recorded on the request's trace span. Credentials are masked before
//! headers reach the logs.

use axum::http::{HeaderName, HeaderValue, Request};
use mti::prelude::*;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::MakeSpan,
};
use tracing::Span;

/// Prefix of generated request ids
pub const REQUEST_ID_PREFIX: &str = "req";

/// Header carrying the request id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Generates `req_<uuidv7>` ids; time-sortable, so log order follows arrival order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = REQUEST_ID_PREFIX.create_type_id::<V7>();
        let header_value = HeaderValue::from_str(id.as_str()).ok()?;
        Some(RequestId::new(header_value))
    }
}

/// Span per request carrying method, path and request id
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id,
        )
    }
}

/// Create a request ID layer that generates type-safe request IDs.
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeTypedRequestId)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(REQUEST_ID_HEADER)
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS.iter().copied().map(HeaderName::from_static))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_typed_request_id() {
        let mut maker = MakeTypedRequestId;
        let request = Request::builder().body(()).unwrap();

        let id = maker.make_request_id(&request).unwrap();
        let header_value = id.into_header_value();
        let id_str = header_value.to_str().unwrap();
        assert!(id_str.starts_with("req_"));
        // prefix (3) + underscore (1) + suffix (26)
        assert_eq!(id_str.len(), 30);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut maker = MakeTypedRequestId;
        let request = Request::builder().body(()).unwrap();
        let first = maker.make_request_id(&request).unwrap().into_header_value();
        let second = maker.make_request_id(&request).unwrap().into_header_value();
        assert_ne!(first, second);
    }

    #[test]
    fn test_sensitive_headers_constant() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(SENSITIVE_HEADERS.contains(&"cookie"));
    }
}
