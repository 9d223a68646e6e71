//! Router construction.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware::from_fn_with_state,
    routing::post,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::chain::{not_found, translate_errors};
use crate::handler::filter_properties;
use crate::middleware::{panic_to_error, RequestSpanLayer};
use crate::state::AppState;

/// Build the service router.
///
/// `POST /` is the only route; every other method or path reaches the
/// not-found fallback. Layers, innermost first: panic catching, body limit,
/// error translation, request span, CORS headers.
///
/// The fallback never reads the request body, so a malformed JSON body sent
/// to an unknown path is answered with 404 rather than 400.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(filter_properties).fallback(not_found))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_to_error))
        .layer(DefaultBodyLimit::max(state.body_limit()))
        .layer(from_fn_with_state(state.errors(), translate_errors))
        .layer(RequestSpanLayer)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .with_state(state)
}
