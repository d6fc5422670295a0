// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Creates a span per HTTP request carrying method, path and the x-request-id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use http::Request;
use tower_http::request_id::RequestId;
use tower_http::trace::{
    DefaultOnRequest, DefaultOnResponse, HttpMakeClassifier, MakeSpan, TraceLayer,
};
use tracing::{Level, Span};

/// Header used for request correlation
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the `http_request` span for every request
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        create_request_span(request)
    }
}

/// Create a tracing span for an HTTP request
///
/// The request id is read from the `RequestId` extension set by
/// `SetRequestIdLayer`, so that layer has to run first.
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        user_id = tracing::field::Empty,
        auth_method = tracing::field::Empty,
    )
}

/// `TraceLayer` emitting one span per request and a response event with latency
#[must_use]
pub fn trace_layer(
) -> TraceLayer<HttpMakeClassifier, RequestSpan, DefaultOnRequest, DefaultOnResponse> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_span_uses_request_id_extension() {
        let mut request = Request::builder()
            .uri("/api/recipes/?page=2")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(RequestId::new(HeaderValue::from_static("req-123")));

        let span = create_request_span(&request);
        // Disabled when no subscriber is installed; creation must not panic
        let _ = span.id();
    }
}
