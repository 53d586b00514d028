use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use super::{body_json, body_text, test_state, RecordingProfiles};
use crate::{api, build_app};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = api::create_router(test_state());

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "calgate");
    assert_eq!(body["persistence"], false);
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn test_health_reports_persistence() {
    let state = test_state().with_profiles(Arc::new(RecordingProfiles::default()));
    let app = api::create_router(state);

    let body = body_json(app.oneshot(get("/api/health")).await.unwrap()).await;
    assert_eq!(body["persistence"], true);
}

#[tokio::test]
async fn test_home_page_links_to_sign_in() {
    let app = api::create_router(test_state());

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("href=\"/auth/google\""));
}

#[tokio::test]
async fn test_schedule_page_is_public() {
    let app = api::create_router(test_state());

    let response = app.oneshot(get("/schedule-meeting")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("/create-meeting"));
    assert!(html.contains("/upcoming-meetings"));
}

#[tokio::test]
async fn test_invalid_endpoint() {
    let app = api::create_router(test_state());

    let response = app.oneshot(get("/api/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_meeting_requires_post() {
    let app = api::create_router(test_state());

    let response = app.oneshot(get("/create-meeting")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_security_headers_applied() {
    let app = build_app(test_state(), "http://localhost:8080").unwrap();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = build_app(test_state(), "http://localhost:8080").unwrap();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/upcoming-meetings")
        .header(header::ORIGIN, "http://localhost:8080")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:8080"
    );
}

#[test]
fn test_build_app_rejects_bad_cors_origin() {
    assert!(build_app(test_state(), "not\na header").is_err());
}
