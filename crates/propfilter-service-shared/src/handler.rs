//! The property filter handler.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
};
use tracing::info;

use crate::error::ApiError;
use crate::request::{FilterRequest, Validate};
use crate::response::FilterResponse;
use crate::state::AppState;

/// Handle `POST /` requests.
///
/// Requires a `payload` array, runs it through the filter step and returns the
/// surviving records reshaped as `{concataddress, type, workflow}`. Every
/// failure is returned as an [`ApiError`] for the error chain to render; the
/// handler never writes an error body itself.
pub async fn filter_properties(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<FilterResponse, ApiError> {
    let request = FilterRequest::from_body(&headers, &body?)?;
    request.validate()?;

    let records = request.payload.unwrap_or_default();
    let received = records.len();
    info!(received, "filtering properties");

    let survivors = state.filter_step().run(records).await?;
    let response = FilterResponse::from_records(&survivors);

    info!(received, kept = response.response.len(), "properties filtered");
    Ok(response)
}
