//! HTTP surface tests driving the router in-process.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::test_support::{memory_pool, set_stock, HospitalFixture};
use crate::web::build_app;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn search_returns_stocked_hospitals_as_json() {
    let pool = memory_pool().await;
    HospitalFixture::new("h-1", "Riverside Medical")
        .district("Riverside")
        .insert(&pool)
        .await;
    set_stock(&pool, "h-1", "O+", 3).await;

    let app = build_app(pool, None);
    let (status, body) = send(app, get("/api/search?blood_type=O%2B&district=riverside")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "h-1");
    assert_eq!(rows[0]["blood_type"], "O+");
    assert_eq!(rows[0]["units_available"], 3);
    assert!(rows[0]["distance"].is_null());
    assert_eq!(rows[0]["recent_donations"], 0);
}

#[tokio::test]
async fn search_accepts_unencoded_plus() {
    let pool = memory_pool().await;
    HospitalFixture::new("h-1", "Plus Hospital").insert(&pool).await;
    set_stock(&pool, "h-1", "AB+", 1).await;

    let (status, body) = send(build_app(pool, None), get("/api/search?blood_type=AB+")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_result_is_an_empty_array() {
    let pool = memory_pool().await;
    let (status, body) = send(build_app(pool, None), get("/api/search?blood_type=O-")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_queries_are_client_errors() {
    for uri in [
        "/api/search",
        "/api/search?blood_type=X%2B",
        "/api/search?blood_type=O%2B&radius=150",
        "/api/search?blood_type=O%2B&lat=abc&lng=1",
        "/api/search?blood_type=O%2B&lat=1",
        "/api/donor-search?radius=0",
    ] {
        let pool = memory_pool().await;
        let (status, body) = send(build_app(pool, None), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn donor_search_annotates_requested_type() {
    let pool = memory_pool().await;
    HospitalFixture::new("h-b", "Beta").insert(&pool).await;
    HospitalFixture::new("h-a", "Alpha").insert(&pool).await;

    let (status, body) = send(
        build_app(pool, None),
        get("/api/donor-search?blood_type=A-"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows[0]["name"], "Alpha");
    assert_eq!(rows[1]["name"], "Beta");
    assert_eq!(rows[0]["blood_needs"][0]["blood_type"], "A-");
    assert_eq!(rows[0]["blood_needs"][0]["units_available"], 0);
    assert_eq!(rows[0]["blood_needs"][0]["priority"], "medium");
    assert!(rows[0]["last_updated_at"].is_string());
}

#[tokio::test]
async fn districts_lists_active_districts() {
    let pool = memory_pool().await;
    HospitalFixture::new("h-1", "One").district("Uptown").insert(&pool).await;
    HospitalFixture::new("h-2", "Two").district("Downtown").insert(&pool).await;
    HospitalFixture::new("h-3", "Three").insert(&pool).await;

    let (status, body) = send(build_app(pool, None), get("/api/districts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Downtown", "Uptown"]));
}

#[tokio::test]
async fn blood_request_is_created_publicly() {
    let pool = memory_pool().await;
    HospitalFixture::new("h-1", "Request Hospital").insert(&pool).await;
    set_stock(&pool, "h-1", "B+", 4).await;

    let payload = json!({
        "requester_name": "Robin",
        "requester_phone": "555-0111",
        "requester_email": "robin@example.org",
        "blood_type": "B+",
        "units_needed": 2,
        "urgency": "critical",
        "hospital_id": "h-1"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/blood-requests")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(build_app(pool, None), request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["urgency"], "critical");
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let pool = memory_pool().await;
    let request = Request::builder()
        .method("PUT")
        .uri("/api/hospitals/h-1/inventory")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[]"))
        .unwrap();

    let (status, body) = send(build_app(pool, None), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}
