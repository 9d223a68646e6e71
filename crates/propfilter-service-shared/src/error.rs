//! Request-scoped errors and their classification.
//!
//! Every failure that ends a request is an [`ApiError`]. Handlers return it
//! through `Result`, and the [`ErrorChain`](crate::ErrorChain) decides how it
//! is rendered. An `ApiError` records where it was raised so that verbose
//! responses can include a diagnostic trace.

use std::fmt;
use std::panic::Location;

use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use propfilter_lib::Error as LibError;

/// Message returned when the request body has no `payload` field.
pub const MISSING_PAYLOAD_MESSAGE: &str = "The payload of properties is missing in the request.";

/// Message returned when the request body is not valid JSON.
pub const MALFORMED_BODY_MESSAGE: &str = "Could not decode request: JSON parsing failed";

/// Message returned when no route matches the request.
pub const NOT_FOUND_MESSAGE: &str = "Not Found!!!";

/// Classification of a request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request body had no `payload` field.
    MissingPayload,
    /// The request body failed to parse as JSON. Not yet classified.
    BodySyntax,
    /// A JSON syntax failure after classification.
    MalformedBody,
    /// No route matched the request.
    RouteNotFound,
    /// The filtering step rejected.
    StepFailure,
    /// Anything else.
    Unclassified,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingPayload => "MissingPayload",
            Self::BodySyntax => "BodySyntax",
            Self::MalformedBody => "MalformedBody",
            Self::RouteNotFound => "RouteNotFound",
            Self::StepFailure => "StepFailure",
            Self::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

/// A classified request failure.
///
/// `status` is only set when the failure carries an explicit HTTP status;
/// responders fall back to 500 otherwise.
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    origin: &'static Location<'static>,
    causes: Vec<String>,
}

impl ApiError {
    /// Create an error of the given kind without an explicit status.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            origin: Location::caller(),
            causes: Vec::new(),
        }
    }

    /// The request body did not contain a `payload` field.
    ///
    /// Carries no explicit status, so it is answered with 500.
    #[track_caller]
    pub fn missing_payload() -> Self {
        Self::new(ErrorKind::MissingPayload, MISSING_PAYLOAD_MESSAGE)
    }

    /// The request body could not be parsed as JSON.
    #[track_caller]
    pub fn body_syntax(detail: impl fmt::Display) -> Self {
        Self::new(ErrorKind::BodySyntax, detail.to_string()).with_status(StatusCode::BAD_REQUEST)
    }

    /// A body syntax failure rewritten for the client.
    #[track_caller]
    pub fn malformed_body() -> Self {
        Self::new(ErrorKind::MalformedBody, MALFORMED_BODY_MESSAGE)
            .with_status(StatusCode::BAD_REQUEST)
    }

    /// No route matched the request.
    #[track_caller]
    pub fn route_not_found() -> Self {
        Self::new(ErrorKind::RouteNotFound, NOT_FOUND_MESSAGE).with_status(StatusCode::NOT_FOUND)
    }

    /// Any failure without a dedicated kind.
    #[track_caller]
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, message)
    }

    /// Set an explicit HTTP status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Record an underlying cause for the diagnostic trace.
    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.causes.push(cause.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The explicit status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The status the response is sent with: the explicit one, or 500.
    pub fn effective_status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Diagnostic trace: kind and message, the source location the error was
    /// raised at, then one line per recorded cause.
    pub fn trace(&self) -> String {
        let mut trace = format!("{}: {}\n    at {}", self.kind, self.message, self.origin);
        for cause in &self.causes {
            trace.push_str("\n    caused by: ");
            trace.push_str(cause);
        }
        trace
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<LibError> for ApiError {
    #[track_caller]
    fn from(error: LibError) -> Self {
        match error {
            LibError::StepFailed => Self::new(ErrorKind::StepFailure, error.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    #[track_caller]
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(err) => Self::body_syntax(err.body_text()),
            JsonRejection::MissingJsonContentType(_) => Self::missing_payload(),
            other => Self::unclassified(other.body_text()).with_status(other.status()),
        }
    }
}

impl From<BytesRejection> for ApiError {
    #[track_caller]
    fn from(rejection: BytesRejection) -> Self {
        Self::unclassified(rejection.body_text()).with_status(rejection.status())
    }
}

/// Parks the error in the response extensions.
///
/// The response body is left empty; the `translate_errors` middleware picks
/// the error up and renders it through the error chain.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.effective_status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}
