//! End-to-end API integration tests
//!
//! These tests drive the full router (validation, handlers, classifier and
//! diagnostics layers) against the in-memory record store:
//! - User creation, listing, retrieval, update and deletion
//! - Validation and duplicate handling
//! - Pagination and filtering
//! - Error envelopes in development and production modes

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use user_management_api::api;
use user_management_api::config::{Config, RuntimeMode};
use user_management_api::infrastructure::repositories::InMemoryUserRepository;
use user_management_api::state::AppState;

/// Setup test application with a fresh store
fn setup_app_with(mode: RuntimeMode) -> Router {
    let config = Config {
        mode,
        ..Config::default()
    };
    api::router(AppState::new(Arc::new(InMemoryUserRepository::new()), config))
}

fn setup_app() -> Router {
    setup_app_with(RuntimeMode::Development)
}

/// Sends a request and returns status plus parsed JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

fn user_payload(email: &str, department: &str) -> Value {
    json!({
        "name": "Test User",
        "email": email,
        "phone": "081234567890",
        "department": department
    })
}

/// Creates a user and returns its id
async fn create_user(app: &Router, email: &str, department: &str) -> String {
    let (status, json) = send(app, "POST", "/users", Some(user_payload(email, department))).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["data"]["id"].as_str().unwrap().to_string()
}

const MISSING_ID: &str = "6f1c2b8e-4d3a-4c5b-9e7f-0a1b2c3d4e5f";

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Server is running");
    assert_eq!(json["environment"], "development");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_index_lists_endpoints() {
    let app = setup_app();

    let (status, json) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["documentation"], "/api-docs");
    assert_eq!(json["endpoints"]["users"], "/users");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_app();

    let (status, json) = send(&app, "GET", "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/users"].is_object());
    assert!(json["paths"]["/users/{id}"].is_object());
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let app = setup_app();

    for uri in ["/health", "/nope"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(headers["x-content-type-options"], "nosniff", "{uri}");
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN", "{uri}");
        assert_eq!(headers["referrer-policy"], "no-referrer", "{uri}");
        assert!(headers.contains_key("strict-transport-security"), "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_app();

    let (status, json) = send(&app, "GET", "/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "success": false, "message": "Route not found" }));
}

#[tokio::test]
async fn test_create_user_applies_defaults_and_normalization() {
    let app = setup_app();

    let payload = json!({
        "name": "  Jane Doe  ",
        "email": "Jane.Doe@Example.COM",
        "phone": "081234567890",
        "department": " Engineering "
    });
    let (status, json) = send(&app, "POST", "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User created successfully");

    let data = &json["data"];
    assert!(!data["id"].as_str().unwrap().is_empty());
    assert_eq!(data["name"], "Jane Doe");
    assert_eq!(data["email"], "jane.doe@example.com");
    assert_eq!(data["department"], "Engineering");
    assert_eq!(data["isActive"], true);
    assert_eq!(data["createdAt"], data["updatedAt"]);
}

#[tokio::test]
async fn test_create_user_with_explicit_inactive_flag() {
    let app = setup_app();

    let mut payload = user_payload("inactive@example.com", "HR");
    payload["isActive"] = json!(false);
    let (status, json) = send(&app, "POST", "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["isActive"], false);
}

#[tokio::test]
async fn test_create_user_reports_all_validation_errors() {
    let app = setup_app();

    let payload = json!({
        "name": "A",
        "email": "bad",
        "phone": "123",
        "department": "B"
    });
    let (status, json) = send(&app, "POST", "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["error"],
        "Name must be between 2 and 50 characters, \
         Invalid email format, \
         Phone must contain only digits and be at least 10 characters, \
         Department must be between 2 and 50 characters"
    );
}

#[tokio::test]
async fn test_create_user_rejects_unknown_fields() {
    let app = setup_app();

    let mut payload = user_payload("extra@example.com", "IT");
    payload["role"] = json!("admin");
    let (status, json) = send(&app, "POST", "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("role"));
}

#[tokio::test]
async fn test_create_user_rejects_non_boolean_active_flag() {
    let app = setup_app();

    let mut payload = user_payload("flag@example.com", "IT");
    payload["isActive"] = json!("yes");
    let (status, json) = send(&app, "POST", "/users", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let app = setup_app();
    create_user(&app, "dup@example.com", "IT").await;

    let (status, json) = send(
        &app,
        "POST",
        "/users",
        Some(user_payload("DUP@example.com", "HR")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Data already exists");
}

#[tokio::test]
async fn test_get_user_round_trip() {
    let app = setup_app();
    let id = create_user(&app, "get@example.com", "IT").await;

    let (status, json) = send(&app, "GET", &format!("/users/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "User retrieved successfully");
    assert_eq!(json["data"]["id"], id.as_str());
    assert_eq!(json["data"]["email"], "get@example.com");
}

#[tokio::test]
async fn test_missing_and_malformed_ids_are_not_found() {
    let app = setup_app();

    for method in ["GET", "DELETE"] {
        let (status, json) = send(&app, method, &format!("/users/{MISSING_ID}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} missing id");
        assert_eq!(json["message"], "User not found");

        let (status, json) = send(&app, method, "/users/123", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} malformed id");
        assert_eq!(json["error"], "Resource not found");
    }

    let (status, json) = send(&app, "PUT", &format!("/users/{MISSING_ID}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "User not found");

    let (status, json) = send(&app, "PUT", "/users/not-an-id", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Resource not found");
}

#[tokio::test]
async fn test_update_user_partial_fields() {
    let app = setup_app();
    let id = create_user(&app, "update@example.com", "IT").await;

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/users/{id}"),
        Some(json!({ "department": "Finance", "isActive": false })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "User updated successfully");
    assert_eq!(json["data"]["department"], "Finance");
    assert_eq!(json["data"]["isActive"], false);
    assert_eq!(json["data"]["email"], "update@example.com");
    assert_eq!(json["data"]["name"], "Test User");
}

#[tokio::test]
async fn test_empty_update_only_refreshes_updated_at() {
    let app = setup_app();
    let id = create_user(&app, "touch@example.com", "IT").await;
    let (_, before) = send(&app, "GET", &format!("/users/{id}"), None).await;

    let (status, after) = send(&app, "PUT", &format!("/users/{id}"), Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    for field in ["id", "name", "email", "phone", "department", "isActive", "createdAt"] {
        assert_eq!(after["data"][field], before["data"][field], "{field} changed");
    }

    let parse = |v: &Value| {
        chrono::DateTime::parse_from_rfc3339(v.as_str().unwrap()).unwrap()
    };
    assert!(parse(&after["data"]["updatedAt"]) > parse(&before["data"]["updatedAt"]));
}

#[tokio::test]
async fn test_update_without_body_only_refreshes_updated_at() {
    let app = setup_app();
    let id = create_user(&app, "nobody@example.com", "IT").await;
    let (_, before) = send(&app, "GET", &format!("/users/{id}"), None).await;

    let (status, after) = send(&app, "PUT", &format!("/users/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["data"]["email"], before["data"]["email"]);
    assert_eq!(after["data"]["createdAt"], before["data"]["createdAt"]);
    assert_ne!(after["data"]["updatedAt"], before["data"]["updatedAt"]);
}

#[tokio::test]
async fn test_create_without_body_reports_every_rule() {
    let app = setup_app();

    let (status, json) = send(&app, "POST", "/users", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Name must be between 2 and 50 characters, \
         Invalid email format, \
         Phone must contain only digits and be at least 10 characters, \
         Department must be between 2 and 50 characters"
    );
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let app = setup_app();

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "text/plain")
        .body(Body::from("name=Jane"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_validates_present_fields() {
    let app = setup_app();
    let id = create_user(&app, "strict@example.com", "IT").await;

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/users/{id}"),
        Some(json!({ "phone": "12-34" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Phone must contain only digits and be at least 10 characters"
    );
}

#[tokio::test]
async fn test_update_to_existing_email_is_duplicate() {
    let app = setup_app();
    create_user(&app, "taken@example.com", "IT").await;
    let id = create_user(&app, "other@example.com", "IT").await;

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/users/{id}"),
        Some(json!({ "email": "Taken@Example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Data already exists");
}

#[tokio::test]
async fn test_delete_user() {
    let app = setup_app();
    let id = create_user(&app, "delete@example.com", "IT").await;

    let (status, json) = send(&app, "DELETE", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "success": true, "message": "User deleted successfully", "data": {} })
    );

    let (status, _) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_second_page_of_fifteen() {
    let app = setup_app();
    let mut ids = Vec::new();
    for i in 1..=15 {
        ids.push(create_user(&app, &format!("user{i}@example.com"), "IT").await);
    }

    let (status, json) = send(&app, "GET", "/users?page=2&limit=10", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Users retrieved successfully");
    assert_eq!(
        json["pagination"],
        json!({ "page": 2, "limit": 10, "total": 15, "pages": 2 })
    );

    // Newest first: page two holds the five oldest records
    let listed: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = ids.iter().take(5).rev().map(String::as_str).collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn test_list_defaults_and_limit_cap() {
    let app = setup_app();
    create_user(&app, "solo@example.com", "IT").await;

    let (_, json) = send(&app, "GET", "/users", None).await;
    assert_eq!(
        json["pagination"],
        json!({ "page": 1, "limit": 10, "total": 1, "pages": 1 })
    );

    let (_, json) = send(&app, "GET", "/users?limit=100000", None).await;
    assert_eq!(json["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_list_search_matches_substrings() {
    let app = setup_app();
    create_user(&app, "a@example.com", "IT").await;
    create_user(&app, "smith@example.com", "FinTech").await;
    create_user(&app, "b@example.com", "FinTech").await;
    create_user(&app, "c@example.com", "HR").await;

    let (status, json) = send(&app, "GET", "/users?search=IT", None).await;

    assert_eq!(status, StatusCode::OK);
    // "smith" carries the term; a bare "FinTech" department does not
    let mut emails: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    emails.sort_unstable();
    assert_eq!(emails, vec!["a@example.com", "smith@example.com"]);
    assert_eq!(json["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_list_filters_by_active_flag_and_department() {
    let app = setup_app();
    create_user(&app, "eng1@example.com", "Engineering").await;
    let inactive = create_user(&app, "eng2@example.com", "Engineering").await;
    create_user(&app, "sales@example.com", "Sales").await;
    send(
        &app,
        "PUT",
        &format!("/users/{inactive}"),
        Some(json!({ "isActive": false })),
    )
    .await;

    let (_, json) = send(&app, "GET", "/users?department=engin&isActive=true", None).await;

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["email"], "eng1@example.com");
}

#[tokio::test]
async fn test_list_clamps_out_of_range_paging() {
    let app = setup_app();
    create_user(&app, "clamp@example.com", "IT").await;

    let (status, json) = send(&app, "GET", "/users?page=-1&limit=0", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["pagination"],
        json!({ "page": 1, "limit": 10, "total": 1, "pages": 1 })
    );
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_rejects_malformed_query() {
    let app = setup_app();

    let (status, json) = send(&app, "GET", "/users?page=abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_development_mode_includes_trace() {
    let app = setup_app_with(RuntimeMode::Development);

    let (_, json) = send(&app, "GET", "/users/123", None).await;

    assert!(json["trace"].as_str().unwrap().contains("MalformedId"));
}

#[tokio::test]
async fn test_production_mode_hides_trace() {
    let app = setup_app_with(RuntimeMode::Production);

    let (status, json) = send(&app, "GET", "/users/123", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "success": false, "error": "Resource not found" }));

    let (_, json) = send(&app, "POST", "/users", Some(json!({ "name": "A" }))).await;
    assert!(json.get("trace").is_none());
}

#[tokio::test]
async fn test_concurrent_creates_with_same_email() {
    let app = setup_app();

    let (first, second) = tokio::join!(
        send(&app, "POST", "/users", Some(user_payload("race@example.com", "IT"))),
        send(&app, "POST", "/users", Some(user_payload("Race@example.com", "HR"))),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
}
