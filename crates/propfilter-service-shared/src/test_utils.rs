//! Test utilities for handler and router testing.
//!
//! Fixtures live in `docs/fixtures/` at the workspace root.

use std::path::PathBuf;

use axum::Router;
use serde_json::{json, Value};

use propfilter_lib::FilterStep;

use crate::config::Environment;
use crate::router::build_router;
use crate::state::AppState;

/// Directory holding the JSON fixtures.
pub const FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures");

/// Absolute path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(FIXTURE_DIR).join(name)
}

/// Load a fixture file as JSON.
///
/// # Panics
///
/// Panics if the fixture is missing or not valid JSON. This indicates a test
/// configuration issue.
pub fn fixture_json(name: &str) -> Value {
    let path = fixture_path(name);
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {:?}: {}", path, e));
    serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("fixture {:?} is not valid JSON: {}", path, e))
}

/// Two-record request body: one pending and one completed `htv` property.
pub fn sample_request() -> Value {
    json!({
        "payload": [
            {
                "address": {
                    "buildingNumber": "28",
                    "lat": -33.912542000000002,
                    "lon": 151.00293199999999,
                    "postcode": "2198",
                    "state": "NSW",
                    "street": "Donington Ave",
                    "suburb": "Georges Hall"
                },
                "propertyTypeId": 3,
                "readyState": "init",
                "reference": "aqsdasd",
                "shortId": "6Laj49N3PiwZ",
                "status": 0,
                "type": "htv",
                "workflow": "pending"
            },
            {
                "address": {
                    "buildingNumber": "Level 6",
                    "postcode": "2060",
                    "state": "NSW",
                    "street": "146 Arthur Street",
                    "suburb": "North Sydney"
                },
                "propertyTypeId": 3,
                "readyState": "init",
                "reference": "asdasd",
                "shortId": "E9eQVYEMkub2",
                "status": 4,
                "type": "htv",
                "valfirm": null,
                "workflow": "completed"
            }
        ]
    })
}

/// Expected response for [`sample_request`].
pub fn sample_response() -> Value {
    json!({
        "response": [
            {
                "concataddress": "Level 6 146 Arthur Street North Sydney NSW 2060",
                "type": "htv",
                "workflow": "completed"
            }
        ]
    })
}

/// State with the default (always proceeding) filter step.
pub fn test_state(environment: Environment) -> AppState {
    AppState::new(FilterStep::default(), environment)
}

/// Router built on [`test_state`].
pub fn test_router(environment: Environment) -> Router {
    build_router(test_state(environment))
}

/// Router whose filter step always rejects.
pub fn failing_router(environment: Environment) -> Router {
    build_router(AppState::new(FilterStep::failing(), environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_load() {
        let request = fixture_json("properties.json");
        assert!(request["payload"].is_array());

        let expected = fixture_json("properties_expected.json");
        assert!(expected["response"].is_array());
    }

    #[test]
    fn test_sample_request_has_two_records() {
        assert_eq!(sample_request()["payload"].as_array().unwrap().len(), 2);
    }
}
