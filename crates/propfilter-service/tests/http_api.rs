use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use propfilter_lib::{FilterStep, StepDecision};
use propfilter_service_shared::test_utils::{
    failing_router, fixture_json, sample_request, sample_response, test_router, test_state,
};
use propfilter_service_shared::{
    build_router, AppState, Environment, MALFORMED_BODY_MESSAGE, MISSING_PAYLOAD_MESSAGE,
    NOT_FOUND_MESSAGE,
};

fn server(environment: Environment) -> TestServer {
    TestServer::new(test_router(environment)).expect("test server starts")
}

#[tokio::test]
async fn filters_sample_payload() {
    let server = server(Environment::Development);
    let response = server.post("/").json(&sample_request()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), sample_response());
}

#[tokio::test]
async fn filters_fixture_payload_in_order() {
    let server = server(Environment::Production);
    let response = server
        .post("/")
        .json(&fixture_json("properties.json"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        fixture_json("properties_expected.json")
    );
}

#[tokio::test]
async fn empty_payload_returns_empty_response() {
    let server = server(Environment::Production);
    let response = server.post("/").json(&json!({ "payload": [] })).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "response": [] }));
}

#[tokio::test]
async fn records_of_unexpected_shape_are_dropped() {
    let server = server(Environment::Production);
    let response = server
        .post("/")
        .json(&json!({
            "payload": [
                { "type": "htv", "workflow": "completed", "address": { "street": "A St" } },
                { "type": 7, "workflow": "pending", "address": "n/a" },
                "not a record",
                { "type": "htv", "workflow": "completed", "address": "n/a" }
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "response": [
                { "concataddress": " A St   ", "type": "htv", "workflow": "completed" },
                { "concataddress": "    ", "type": "htv", "workflow": "completed" }
            ]
        })
    );
}

#[tokio::test]
async fn missing_payload_in_production_is_terse_500() {
    let server = server(Environment::Production);
    let response = server.post("/").json(&json!({ "NO_payload": [] })).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": MISSING_PAYLOAD_MESSAGE })
    );
}

#[tokio::test]
async fn missing_payload_in_development_is_verbose() {
    let server = server(Environment::Development);
    let response = server.post("/").json(&json!({ "NO_payload": [] })).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"], MISSING_PAYLOAD_MESSAGE);
    assert_eq!(body["status"], 500);
    let stack = body["stack"].as_str().expect("stack present");
    assert!(stack.starts_with("MissingPayload: "));
    assert!(stack.contains("handler.rs"));
}

#[tokio::test]
async fn malformed_json_is_400() {
    for environment in [Environment::Development, Environment::Production] {
        let server = server(environment);
        let response = server
            .post("/")
            .bytes(Bytes::from_static(b"{\"payload\": [ { \"type\": "))
            .content_type("application/json")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"], MALFORMED_BODY_MESSAGE);
        assert_eq!(body.get("stack").is_some(), environment.is_development());
    }
}

#[tokio::test]
async fn malformed_json_in_production_has_only_error() {
    let server = server(Environment::Production);
    let response = server
        .post("/")
        .bytes(Bytes::from_static(b"not json"))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": MALFORMED_BODY_MESSAGE })
    );
}

#[tokio::test]
async fn payload_of_wrong_shape_is_unprocessable() {
    let server = server(Environment::Production);
    let response = server.post("/").json(&json!({ "payload": {} })).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert!(body["error"].is_string());
    assert_ne!(body["error"], MALFORMED_BODY_MESSAGE);
}

#[tokio::test]
async fn non_json_content_type_is_a_missing_payload() {
    let server = server(Environment::Production);
    let response = server.post("/").text(r#"{"payload": []}"#).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": MISSING_PAYLOAD_MESSAGE })
    );
}

#[tokio::test]
async fn empty_json_body_is_a_missing_payload() {
    let server = server(Environment::Production);
    let response = server
        .post("/")
        .bytes(Bytes::new())
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": MISSING_PAYLOAD_MESSAGE })
    );
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let state = test_state(Environment::Production).with_body_limit(16);
    let server = TestServer::new(build_router(state)).expect("test server starts");
    let response = server.post("/").json(&sample_request()).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn unmatched_path_is_404() {
    let server = server(Environment::Production);
    let response = server.post("/properties").json(&sample_request()).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": NOT_FOUND_MESSAGE })
    );
}

#[tokio::test]
async fn malformed_json_to_unmatched_path_is_404() {
    let server = server(Environment::Production);
    let response = server
        .post("/nowhere")
        .bytes(Bytes::from_static(b"not json"))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": NOT_FOUND_MESSAGE })
    );
}

#[tokio::test]
async fn other_methods_on_root_are_404() {
    let server = server(Environment::Production);

    for response in [
        server.get("/").await,
        server.put("/").json(&sample_request()).await,
        server.delete("/").await,
    ] {
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": NOT_FOUND_MESSAGE })
        );
    }
}

#[tokio::test]
async fn not_found_in_development_includes_status_and_stack() {
    let server = server(Environment::Development);
    let response = server.get("/nowhere").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"], NOT_FOUND_MESSAGE);
    assert_eq!(body["status"], 404);
    assert!(body["stack"].is_string());
}

#[tokio::test]
async fn step_failure_is_forwarded_to_chain() {
    let server = TestServer::new(failing_router(Environment::Production)).expect("server");
    let response = server.post("/").json(&sample_request()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Something went wrong!" })
    );
}

#[tokio::test]
async fn step_failure_in_development_has_trace() {
    let server = TestServer::new(failing_router(Environment::Development)).expect("server");
    let response = server.post("/").json(&sample_request()).await;

    let body = response.json::<Value>();
    assert_eq!(body["error"], "Something went wrong!");
    assert_eq!(body["status"], 500);
    assert!(body["stack"]
        .as_str()
        .expect("stack present")
        .starts_with("StepFailure: "));
}

#[tokio::test]
async fn injected_decision_controls_outcome() {
    let step = FilterStep::with_decision(|records| {
        if records.len() > 1 {
            StepDecision::Fail
        } else {
            StepDecision::Proceed
        }
    });
    let router = build_router(AppState::new(step, Environment::Production));
    let server = TestServer::new(router).expect("server");

    let single = server
        .post("/")
        .json(&json!({ "payload": [{ "type": "htv", "workflow": "completed" }] }))
        .await;
    assert_eq!(single.status_code(), StatusCode::OK);
    assert_eq!(
        single.json::<Value>(),
        json!({ "response": [{ "concataddress": "    ", "type": "htv", "workflow": "completed" }] })
    );

    let batch = server.post("/").json(&sample_request()).await;
    assert_eq!(batch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn panics_are_rendered_by_the_chain() {
    let step = FilterStep::with_decision(|_| panic!("decision exploded"));
    let router = build_router(AppState::new(step, Environment::Development));
    let server = TestServer::new(router).expect("server");

    let response = server.post("/").json(&sample_request()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["stack"]
        .as_str()
        .expect("stack present")
        .contains("panic: decision exploded"));
}

#[tokio::test]
async fn cors_headers_on_success_and_errors() {
    let server = server(Environment::Production);

    for response in [
        server.post("/").json(&sample_request()).await,
        server.get("/missing").await,
    ] {
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(response.header("access-control-allow-credentials"), "true");
    }
}

#[tokio::test]
async fn request_id_is_echoed() {
    let server = server(Environment::Production);
    let response = server
        .post("/")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-abc"),
        )
        .json(&sample_request())
        .await;

    assert_eq!(response.header("x-request-id"), "req-abc");
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let server = server(Environment::Production);
    let response = server.post("/").json(&sample_request()).await;

    let id = response.header("x-request-id");
    assert_eq!(id.to_str().expect("ascii id").len(), 36);
}
