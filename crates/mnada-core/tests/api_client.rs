//! `ApiClient` against a local axum server standing in for the Mnada services.

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;

use mnada_core::api::{ApiClient, ApiError, AuthService, CatalogService, TRANSPORT_FALLBACK};
use mnada_core::auth::flow::{self, LOGIN_FALLBACK};
use mnada_core::auth::{MemoryCredentialStore, Role};
use mnada_core::forms::RegistrationForm;
use mnada_core::models::{Category, ItemStatus, ItemSubmission, ReviewDecision};
use mnada_core::SessionGate;

const TOKEN: &str = "header.eyJyb2xlIjoiYXVjdGlvbmVlciJ9.sig";

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "ann" && body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({ "token": TOKEN, "role": "auctioneer" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, String) {
    match body["username"].as_str() {
        Some("taken") => (
            StatusCode::CONFLICT,
            json!({ "message": "Username already taken" }).to_string(),
        ),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
        _ => (StatusCode::CREATED, String::new()),
    }
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn auctions(headers: HeaderMap) -> (StatusCode, String) {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer garbled") => (StatusCode::OK, "not json".to_string()),
        _ if is_authorized(&headers) => (
            StatusCode::OK,
            json!([
                { "id": 1, "item": "Vintage Car", "startingPrice": 15000.0,
                  "endTime": "2026-12-01T12:00:00Z", "status": "active" },
                { "id": 2, "item": "Painting", "startingPrice": 800.0 }
            ])
            .to_string(),
        ),
        _ => (StatusCode::UNAUTHORIZED, String::new()),
    }
}

fn item(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "name": "Antique Vase",
        "description": "19th century",
        "images": ["vase.jpg"],
        "startingBid": 100.0,
        "category": "Antiques",
        "startDate": "2026-11-01T09:00:00Z",
        "endDate": "2026-11-03T09:00:00Z",
        "status": status,
    })
}

async fn submit_item(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !is_authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Not signed in" })));
    }
    let mut created = item(7, "pending");
    created["name"] = body["name"].clone();
    created["category"] = body["category"].clone();
    (StatusCode::CREATED, Json(created))
}

async fn list_items(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    match query.get("status").map(String::as_str) {
        Some("pending") => Json(json!([item(7, "pending"), item(8, "pending")])),
        _ => Json(json!([])),
    }
}

async fn review(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let decision = body["decision"].as_str().unwrap_or("pending").to_string();
    Json(item(id, &decision))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/users", post(register))
        .route("/auctions", get(auctions))
        .route("/items", post(submit_item).get(list_items))
        .route("/items/{id}/review", post(review));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn registration(username: &str) -> RegistrationForm {
    RegistrationForm {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "pw".to_string(),
        role: Role::Client,
    }
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let api = ApiClient::new(&spawn_server().await).unwrap();
    let response = api.login("ann", "pw").await.unwrap();
    assert_eq!(response.token, TOKEN);
    assert_eq!(response.role, Role::Auctioneer);
}

#[tokio::test]
async fn test_login_rejected_with_message() {
    let api = ApiClient::new(&spawn_server().await).unwrap();
    let err = api.login("ann", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 401, .. }));
    assert_eq!(err.user_message(LOGIN_FALLBACK), "Invalid credentials");
}

#[tokio::test]
async fn test_sign_in_flow_end_to_end() {
    let api = ApiClient::new(&spawn_server().await).unwrap();
    let mut gate = SessionGate::initialize(MemoryCredentialStore::new());
    let role = flow::sign_in(&api, &mut gate, "ann", "pw").await.unwrap();
    assert_eq!(role, Role::Auctioneer);
    assert_eq!(gate.credential(), Some(TOKEN));
    assert_eq!(role.dashboard().path(), "/auctioneer-dashboard");
}

#[tokio::test]
async fn test_register_outcomes() {
    let api = ApiClient::new(&spawn_server().await).unwrap();

    api.register(&registration("new").validate().unwrap())
        .await
        .unwrap();

    let err = flow::register(&api, &registration("taken")).await.unwrap_err();
    assert_eq!(
        err.user_message(flow::REGISTRATION_FALLBACK),
        "Username already taken"
    );

    let err = flow::register(&api, &registration("broken")).await.unwrap_err();
    assert_eq!(
        err.user_message(flow::REGISTRATION_FALLBACK),
        flow::REGISTRATION_FALLBACK
    );
}

#[tokio::test]
async fn test_transport_failure_uses_generic_message() {
    let api = ApiClient::new(&closed_port_url().await).unwrap();
    let err = api.login("ann", "pw").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.user_message(LOGIN_FALLBACK), TRANSPORT_FALLBACK);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_list_auctions_sends_bearer_token() {
    let base = spawn_server().await;
    let anonymous = ApiClient::new(&base).unwrap();
    let err = anonymous.list_auctions().await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 401, message: None }));

    let authed = anonymous.with_token(Some(TOKEN.to_string()));
    let auctions = authed.list_auctions().await.unwrap();
    assert_eq!(auctions.len(), 2);
    assert_eq!(auctions[0].item, "Vintage Car");
    assert_eq!(
        auctions[0].end_time,
        Some(Utc.with_ymd_and_hms(2026, 12, 1, 12, 0, 0).unwrap())
    );
    assert_eq!(auctions[1].end_time, None);
}

#[tokio::test]
async fn test_unparseable_body_is_invalid_response() {
    let api = ApiClient::new(&spawn_server().await)
        .unwrap()
        .with_token(Some("garbled".to_string()));
    let err = api.list_auctions().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_submit_and_review_items() {
    let api = ApiClient::new(&spawn_server().await)
        .unwrap()
        .with_token(Some(TOKEN.to_string()));

    let submission = ItemSubmission {
        name: "Gold Watch".to_string(),
        description: "Swiss".to_string(),
        images: vec!["watch.jpg".to_string()],
        starting_bid: 250.0,
        category: Category::JewelryWatches,
        start_date: Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).unwrap(),
    };
    let created = api.submit_item(&submission).await.unwrap();
    assert_eq!(created.id, 7);
    assert_eq!(created.name, "Gold Watch");
    assert_eq!(created.category, Category::JewelryWatches);
    assert_eq!(created.status, ItemStatus::Pending);

    let pending = api.pending_items().await.unwrap();
    assert_eq!(pending.iter().map(|i| i.id).collect::<Vec<_>>(), vec![7, 8]);

    let reviewed = api.review_item(8, ReviewDecision::Rejected).await.unwrap();
    assert_eq!(reviewed.id, 8);
    assert_eq!(reviewed.status, ItemStatus::Rejected);
}
