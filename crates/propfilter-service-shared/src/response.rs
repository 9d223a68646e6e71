//! Response body for successful filter requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use propfilter_lib::{FilteredProperty, PropertyRecord};

/// `{ "response": [...] }` body returned by `POST /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResponse {
    pub response: Vec<FilteredProperty>,
}

impl FilterResponse {
    /// Reshape surviving records, keeping their order.
    pub fn from_records(records: &[PropertyRecord]) -> Self {
        Self {
            response: records.iter().map(FilteredProperty::from).collect(),
        }
    }
}

impl IntoResponse for FilterResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
