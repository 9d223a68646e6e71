//! Request types and validation for HTTP endpoints.

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use propfilter_lib::PropertyRecord;

use crate::error::ApiError;

/// Validation trait for request types.
pub trait Validate {
    /// Validate the request, returning the error that should end it.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Body of `POST /`.
///
/// Fields other than `payload` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Properties to filter. `null` is treated the same as a missing key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<PropertyRecord>>,
}

impl FilterRequest {
    pub fn new(payload: Vec<PropertyRecord>) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    /// Decode a `POST /` body.
    ///
    /// An empty body, or one not declared as JSON, decodes to a request
    /// without a payload. Anything else must be a JSON object.
    #[track_caller]
    pub fn from_body(headers: &HeaderMap, body: &Bytes) -> Result<Self, ApiError> {
        if body.is_empty() || !has_json_content_type(headers) {
            return Ok(Self::default());
        }
        match Json::<Self>::from_bytes(body) {
            Ok(Json(request)) => Ok(request),
            Err(rejection) => Err(ApiError::from(rejection)),
        }
    }
}

/// `application/json` or any `application/*+json` type, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

impl Validate for FilterRequest {
    #[track_caller]
    fn validate(&self) -> Result<(), ApiError> {
        if self.payload.is_none() {
            return Err(ApiError::missing_payload());
        }
        Ok(())
    }
}
