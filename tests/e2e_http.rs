// tests/e2e_http.rs
mod support;

use axum::http::StatusCode;
use quire_core::application::commands::articles::VersionInput;
use serde_json::json;
use support::{TestApp, empty_request, json_request, level, read_json, two_levels};
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::drafting(vec![]);
    let response = app
        .router()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn create_then_read_draft() {
    let app = TestApp::drafting(two_levels());

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/articles",
            json!({
                "user_id": 5,
                "categories": [1],
                "tags": ["intro"],
                "contents": [{"title": "Hello", "body": "World"}]
            }),
        ))
        .await
        .unwrap();
    let (status, created) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["version"], 1);
    assert_eq!(created["stage"], "DRAFT");
    assert_eq!(created["created_by"], 5);
    let id = created["id"].as_i64().unwrap();

    let response = app
        .router()
        .oneshot(empty_request("GET", &format!("/api/v1/articles/{id}?stage=draft")))
        .await
        .unwrap();
    let (status, fetched) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["contents"][0]["title"], "Hello");
    assert_eq!(fetched["categories"], json!([1]));
    assert_eq!(fetched["tags"], json!(["intro"]));

    let response = app
        .router()
        .oneshot(empty_request("GET", &format!("/api/v1/articles/{id}")))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn approval_out_of_order_is_a_conflict() {
    let app = TestApp::drafting(two_levels());
    let id = app
        .commands()
        .create(support::create(VersionInput {
            submitted: true,
            ..support::input("v1")
        }))
        .await
        .unwrap()
        .id;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/articles/{id}/versions/1/approve"),
            json!({"signature_level": "L2", "signer_id": 3}),
        ))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
    assert_eq!(body["kind"], "invalid_state");
    assert_eq!(body["message"], "Previous valid signature not found");

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/articles/{id}/versions/1/approve"),
            json!({"signature_level": {"id": 1}, "signer_id": 3}),
        ))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "REVIEWING");
    assert_eq!(body["signatures"][0]["result"], "APPROVED");
    assert_eq!(body["signatures"][0]["signature_level_id"], 1);

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/articles/{id}/versions/1/approve"),
            json!({"signature_level": "L2"}),
        ))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "VERIFIED");
}

#[tokio::test]
async fn workflow_over_http() {
    let app = TestApp::drafting(vec![level(1, "chief", 1, true)]);
    let id = app
        .commands()
        .create(support::create(support::input("v1")))
        .await
        .unwrap()
        .id;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/articles/{id}/submit"),
            json!({"user_id": 4}),
        ))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "REVIEWING");
    assert_eq!(body["submitted_by"], 4);

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/articles/{id}/release"),
            json!({}),
        ))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "RELEASED");

    let response = app
        .router()
        .oneshot(empty_request("GET", "/api/v1/articles"))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let response = app
        .router()
        .oneshot(empty_request("DELETE", &format!("/api/v1/articles/{id}")))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "archived"}));

    let response = app
        .router()
        .oneshot(empty_request("GET", &format!("/api/v1/articles/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disabled_stage_is_unprocessable() {
    let app = TestApp::drafting(vec![]);
    let response = app
        .router()
        .oneshot(empty_request("GET", "/api/v1/articles?stage=reviewing"))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "mode_disabled");
}

#[tokio::test]
async fn malformed_filters_are_bad_requests() {
    let app = TestApp::drafting(vec![]);
    for uri in ["/api/v1/articles?ids=1,x", "/api/v1/articles?stage=pending"] {
        let response = app
            .router()
            .oneshot(empty_request("GET", uri))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["kind"], "validation");
    }
}

#[tokio::test]
async fn refresh_returns_the_reloaded_chain() {
    let app = TestApp::drafting(vec![level(1, "editor", 1, true)]);
    app.levels.replace(vec![
        level(1, "editor", 1, true),
        level(2, "legal", 2, false),
    ]);

    let response = app
        .router()
        .oneshot(empty_request("POST", "/api/v1/signature-levels/refresh"))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"levels": [
            {"id": 1, "name": "editor", "sequence": 1, "required": true, "is_final": false},
            {"id": 2, "name": "legal", "sequence": 2, "required": false, "is_final": true}
        ]})
    );
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::drafting(vec![]);
    let response = app
        .router()
        .oneshot(empty_request("GET", "/api-docs/openapi.json"))
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/articles/{id}/versions/{version}/approve"].is_object());
    assert!(body["paths"]["/health"].is_object());
}
