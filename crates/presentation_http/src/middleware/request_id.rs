//! Request ID middleware for HTTP request correlation
//!
//! Every request gets a fresh, server-generated [`RequestId`]. It is stored
//! in the request extensions, recorded on the `http_request` span and echoed
//! in the `X-Request-Id` response header. Handlers reuse it as the storage
//! key for uploaded and synthesized audio, so a client-supplied header is
//! never trusted.

use axum::{body::Body, extract::Request, http::header::HeaderValue, response::Response};
use domain::RequestId;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::Instrument;

/// The header name for the request ID
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Layer that adds request ID handling to HTTP services
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create a new request ID layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that assigns a request ID to each request
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = RequestId::new();
        request.extensions_mut().insert(request_id);

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        // Take the service that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;

                if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Router, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn request_id_layer_new() {
        let layer = RequestIdLayer::new();
        assert!(std::mem::size_of_val(&layer) == 0);
    }

    async fn echo_id(Extension(id): Extension<RequestId>) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn header_matches_extension() {
        let app = Router::new()
            .route("/", get(echo_id))
            .layer(RequestIdLayer::new());

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(header.as_bytes(), &body[..]);
        assert!(RequestId::parse(&header).is_ok());
    }

    #[tokio::test]
    async fn client_header_is_replaced() {
        let app = Router::new()
            .route("/", get(echo_id))
            .layer(RequestIdLayer::new());

        let supplied = "00000000-0000-0000-0000-000000000000";
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, supplied)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(response.headers().get(REQUEST_ID_HEADER).unwrap(), supplied);
    }
}
