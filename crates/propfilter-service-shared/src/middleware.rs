//! HTTP middleware for the property filter service.
//!
//! This module provides:
//! - [`RequestId`]: Newtype for correlation ID extraction/generation
//! - [`extract_or_generate_request_id`]: Extract X-Request-ID header or generate UUID v7
//! - [`RequestSpanLayer`]: Tower middleware that runs each request in a tracing span
//! - [`panic_to_error`]: Turns a handler panic into an [`ApiError`]
//!
//! # Request ID Propagation
//!
//! The middleware extracts the `X-Request-ID` header if present, otherwise
//! generates a new UUID v7 (time-sortable). The ID is recorded on the request
//! span and echoed back in the `x-request-id` response header.

use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use axum::response::IntoResponse;
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the request correlation ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Missing, empty or non UTF-8 headers all lead to a fresh ID.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string from a request path.
pub fn normalize_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Convert a handler panic into an unclassified error.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom` so that
/// panics are rendered by the error chain like any other failure.
pub fn panic_to_error(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::unclassified("Internal Server Error")
        .with_cause(format!("panic: {detail}"))
        .into_response()
}

/// Tower layer that wraps each request in an `info` span.
///
/// The span carries the request ID, method and path. Completion is logged
/// with the response status and latency.
#[derive(Debug, Clone, Default)]
pub struct RequestSpanLayer;

impl<S> Layer<S> for RequestSpanLayer {
    type Service = RequestSpan<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestSpan { inner }
    }
}

/// Middleware service created by [`RequestSpanLayer`].
#[derive(Debug, Clone)]
pub struct RequestSpan<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestSpan<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = RequestSpanFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();

        let request_id = extract_or_generate_request_id(req.headers());
        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %normalize_path(req.uri().path()),
            remote_addr = remote_addr.as_deref().unwrap_or("-"),
        );

        let future = {
            let _enter = span.enter();
            tracing::info!("handling request");
            self.inner.call(req)
        };

        RequestSpanFuture {
            inner: future,
            start,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that logs completion and sets the request ID header.
    pub struct RequestSpanFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for RequestSpanFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let mut result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let latency_ms = this.start.elapsed().as_secs_f64() * 1000.0;
        match &mut result {
            Ok(response) => {
                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response
                        .headers_mut()
                        .insert(REQUEST_ID_HEADER.clone(), value);
                }
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency_ms,
                    "request completed"
                );
            }
            Err(_) => {
                tracing::error!(latency_ms = latency_ms, "request failed");
            }
        }

        Poll::Ready(result)
    }
}
