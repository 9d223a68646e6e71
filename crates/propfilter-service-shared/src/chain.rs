//! Error translation chain.
//!
//! Failures are turned into HTTP responses by an ordered list of stages. Each
//! stage either forwards a (possibly reclassified) error to the next stage or
//! produces the final response:
//!
//! ```text
//! fallback ──► not_found ──┐
//! handler  ─────────────────┴─► malformed_body ─► verbose (development only) ─► terse
//! ```
//!
//! `not_found` is the router fallback and only runs when no route matched.
//! The classifiers never respond; exactly one responder terminates the chain.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, trace, warn};

use crate::config::Environment;
use crate::error::{ApiError, ErrorKind};

/// What a stage does with the error it received.
pub enum Disposition {
    /// Pass the error on to the next stage.
    Forward(ApiError),
    /// End the chain with this response.
    Respond(Response),
}

/// A single step of the chain.
pub type Stage = fn(ApiError) -> Disposition;

/// Ordered error-to-response translation.
#[derive(Debug, Clone)]
pub struct ErrorChain {
    stages: Vec<(&'static str, Stage)>,
}

impl ErrorChain {
    /// Build the chain for the given mode.
    ///
    /// The verbose responder is only installed in development; the terse
    /// responder is always last.
    pub fn new(environment: Environment) -> Self {
        let mut stages: Vec<(&'static str, Stage)> =
            vec![("malformed_body", classify_malformed_body as Stage)];
        if environment.is_development() {
            stages.push(("verbose", respond_verbose as Stage));
        }
        stages.push(("terse", respond_terse as Stage));
        Self { stages }
    }

    /// Stage names in dispatch order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(name, _)| *name).collect()
    }

    /// Run `err` through the stages until one of them responds.
    pub fn dispatch(&self, err: ApiError) -> Response {
        let mut current = err;
        for (name, stage) in &self.stages {
            match stage(current) {
                Disposition::Forward(next) => {
                    trace!(stage = *name, kind = %next.kind(), "error forwarded");
                    current = next;
                }
                Disposition::Respond(response) => return response,
            }
        }
        terse_response(current)
    }
}

/// Router fallback: manufactures the not-found error for unmatched requests.
pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}

/// Replace a JSON syntax failure with the client-facing 400; forward
/// everything else untouched.
pub fn classify_malformed_body(err: ApiError) -> Disposition {
    if err.kind() != ErrorKind::BodySyntax {
        return Disposition::Forward(err);
    }
    Disposition::Forward(ApiError::malformed_body().with_cause(err.message()))
}

/// Respond with message, status and diagnostic trace.
pub fn respond_verbose(err: ApiError) -> Disposition {
    log_failure(&err);
    let status = err.effective_status();
    let body = VerboseBody {
        error: err.message(),
        status: status.as_u16(),
        stack: err.trace(),
    };
    Disposition::Respond((status, Json(body)).into_response())
}

/// Respond with the message only.
pub fn respond_terse(err: ApiError) -> Disposition {
    log_failure(&err);
    Disposition::Respond(terse_response(err))
}

fn terse_response(err: ApiError) -> Response {
    let body = TerseBody {
        error: err.message(),
    };
    (err.effective_status(), Json(body)).into_response()
}

fn log_failure(err: &ApiError) {
    let status = err.effective_status();
    if status.is_server_error() {
        error!(kind = %err.kind(), status = status.as_u16(), error = %err, "request failed");
    } else {
        warn!(kind = %err.kind(), status = status.as_u16(), error = %err, "request rejected");
    }
}

#[derive(Serialize)]
struct TerseBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct VerboseBody<'a> {
    error: &'a str,
    status: u16,
    stack: String,
}

/// Middleware that renders errors parked by [`ApiError::into_response`].
///
/// Responses without a parked error pass through unchanged.
pub async fn translate_errors(
    State(chain): State<Arc<ErrorChain>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<ApiError>() {
        Some(err) => chain.dispatch(err),
        None => response,
    }
}
