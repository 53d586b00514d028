use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{DateTime, Duration, NaiveDate};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{body_json, issue_credential, state_with, StubCalendar, StubIdentityProvider};
use crate::api;
use calgate_calendar::{Event, EventTime};

fn router_with(calendar: Arc<StubCalendar>) -> axum::Router {
    api::create_router(state_with(
        Arc::new(StubIdentityProvider::succeeding()),
        calendar,
    ))
}

fn create_request(body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/create-meeting")
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", issue_credential("u1", "ptok-A")),
        )
        .body(Body::from(body))
        .unwrap()
}

fn valid_meeting() -> Value {
    json!({
        "title": "Sprint review",
        "description": "Demo the calendar flow",
        "attendees": ["bob@example.com", "  ", "carol@example.com "],
        "startTime": "2026-03-10T09:30:00.000Z",
        "endTime": "2026-03-10T10:00:00.000Z"
    })
}

#[tokio::test]
async fn test_create_meeting_success() {
    let calendar = Arc::new(StubCalendar::default());
    let app = router_with(calendar.clone());

    let response = app
        .oneshot(create_request(valid_meeting().to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "message": "Meeting created successfully!",
            "eventId": "evt-123",
            "link": "https://calendar.google.com/event?eid=evt-123"
        })
    );

    let created = calendar.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "Sprint review");
    assert_eq!(
        created[0].attendees,
        vec!["bob@example.com".to_string(), "carol@example.com".to_string()]
    );
    assert_eq!(
        created[0].start,
        DateTime::parse_from_rfc3339("2026-03-10T09:30:00Z").unwrap()
    );
    assert_eq!(*calendar.seen_tokens.lock().unwrap(), vec!["ptok-A".to_string()]);
}

#[tokio::test]
async fn test_create_meeting_rejects_malformed_json() {
    let calendar = Arc::new(StubCalendar::default());
    let app = router_with(calendar.clone());

    let response = app
        .oneshot(create_request("{not json".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(calendar.seen_tokens.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_meeting_requires_times() {
    let app = router_with(Arc::new(StubCalendar::default()));

    let response = app
        .oneshot(create_request(json!({ "title": "No times" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_meeting_rejects_unparseable_time() {
    let calendar = Arc::new(StubCalendar::default());
    let app = router_with(calendar.clone());

    let mut meeting = valid_meeting();
    meeting["startTime"] = json!("tomorrow at nine");

    let response = app.oneshot(create_request(meeting.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Validation failed: startTime must be an RFC 3339 timestamp"
    );
    assert!(calendar.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_meeting_passes_upstream_message_through() {
    let app = router_with(Arc::new(StubCalendar::failing(400, "Invalid attendee email.")));

    let response = app
        .oneshot(create_request(valid_meeting().to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid attendee email.");
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}

fn upcoming_request() -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri("/upcoming-meetings")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", issue_credential("u1", "ptok-A")),
        )
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_upcoming_meetings_shape() {
    let timed_start = DateTime::parse_from_rfc3339("2026-01-02T15:04:00+05:30").unwrap();
    let events = vec![
        Event {
            id: "e1".to_string(),
            title: "Standup".to_string(),
            description: String::new(),
            start: EventTime::DateTime(timed_start),
            end: EventTime::DateTime(timed_start + Duration::minutes(15)),
            link: "https://calendar.google.com/event?eid=e1".to_string(),
            attendees: vec!["bob@example.com".to_string()],
        },
        Event {
            id: "e2".to_string(),
            title: "Offsite".to_string(),
            description: "All hands".to_string(),
            start: EventTime::AllDay(NaiveDate::from_ymd_opt(2026, 1, 3).unwrap()),
            end: EventTime::AllDay(NaiveDate::from_ymd_opt(2026, 1, 4).unwrap()),
            link: "https://calendar.google.com/event?eid=e2".to_string(),
            attendees: vec![],
        },
    ];
    let calendar = Arc::new(StubCalendar::with_events(events));
    let app = router_with(calendar.clone());

    let response = app.oneshot(upcoming_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["events"],
        json!([
            {
                "id": "e1",
                "title": "Standup",
                "description": "",
                "startTime": "Jan 02, 2026 03:04 PM",
                "endTime": "Jan 02, 2026 03:19 PM",
                "link": "https://calendar.google.com/event?eid=e1",
                "attendees": ["bob@example.com"]
            },
            {
                "id": "e2",
                "title": "Offsite",
                "description": "All hands",
                "startTime": "2026-01-03 (All day)",
                "endTime": "2026-01-04 (All day)",
                "link": "https://calendar.google.com/event?eid=e2",
                "attendees": []
            }
        ])
    );

    let (from, to) = calendar.listed_ranges.lock().unwrap()[0];
    assert_eq!(to - from, Duration::days(7));
    assert_eq!(body["period"]["from"], from.format("%b %d, %Y").to_string());
    assert_eq!(body["period"]["to"], to.format("%b %d, %Y").to_string());
}

#[tokio::test]
async fn test_upcoming_meetings_empty() {
    let app = router_with(Arc::new(StubCalendar::default()));

    let body = body_json(app.oneshot(upcoming_request()).await.unwrap()).await;
    assert_eq!(body["events"], json!([]));
    assert!(body["period"]["from"].is_string());
}

#[tokio::test]
async fn test_upcoming_window_is_configurable() {
    let calendar = Arc::new(StubCalendar::default());
    let state = state_with(Arc::new(StubIdentityProvider::succeeding()), calendar.clone())
        .with_upcoming_window(Duration::days(3));

    let response = api::create_router(state)
        .oneshot(upcoming_request())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (from, to) = calendar.listed_ranges.lock().unwrap()[0];
    assert_eq!(to - from, Duration::days(3));
}

#[tokio::test]
async fn test_upcoming_meetings_upstream_failure() {
    let app = router_with(Arc::new(StubCalendar::failing(401, "Invalid Credentials")));

    let response = app.oneshot(upcoming_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Invalid Credentials");
}

#[tokio::test]
async fn test_out_of_range_window_is_a_server_error() {
    let calendar = Arc::new(StubCalendar::default());
    let state = state_with(Arc::new(StubIdentityProvider::succeeding()), calendar.clone())
        .with_upcoming_window(Duration::days(100_000_000));

    let response = api::create_router(state)
        .oneshot(upcoming_request())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "CONFIGURATION_ERROR");
    assert!(calendar.seen_tokens.lock().unwrap().is_empty());
}
