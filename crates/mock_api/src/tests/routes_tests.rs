use super::*;
use axum::{body, body::Body, http::Request, response::Response};
use serde::de::DeserializeOwned;
use shared::error::ErrorCode;
use tower::ServiceExt;

use crate::seed;

fn test_app() -> Router {
    build_router(Arc::new(seed::store()), 64 * 1024)
}

async fn send_get(app: &Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    app.clone().oneshot(request).await.expect("response")
}

async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = send_get(&test_app(), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), b"ok");
}

#[tokio::test]
async fn events_are_paged_and_run_out() {
    let app = test_app();
    let total = seed::events().len();

    let first: Vec<Event> = json_body(send_get(&app, "/events?page=1&limit=10").await).await;
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].name, "Tech Conference 2023");

    let second: Vec<Event> = json_body(send_get(&app, "/events?page=2&limit=10").await).await;
    assert_eq!(second[0].id.as_str(), "11");

    let past_end = send_get(&app, "/events?page=99&limit=10").await;
    assert_eq!(past_end.status(), StatusCode::OK);
    let past_end: Vec<Event> = json_body(past_end).await;
    assert!(past_end.is_empty());

    let all: Vec<Event> = json_body(send_get(&app, "/events").await).await;
    assert_eq!(all.len(), total);
}

#[tokio::test]
async fn single_event_and_unknown_event() {
    let app = test_app();

    let event: Event = json_body(send_get(&app, "/events/3").await).await;
    assert_eq!(event.name, "Rust Meetup");

    let missing = send_get(&app, "/events/404").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let error: ApiError = json_body(missing).await;
    assert_eq!(error.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn event_attendees_may_be_empty() {
    let app = test_app();

    let attendees: Vec<Attendee> = json_body(send_get(&app, "/events/1/attendee").await).await;
    assert_eq!(attendees.len(), 3);
    assert!(attendees
        .iter()
        .all(|a| a.event_id == Some(EventId::new("1"))));

    let none = send_get(&app, "/events/6/attendee").await;
    assert_eq!(none.status(), StatusCode::OK);
    let none: Vec<Attendee> = json_body(none).await;
    assert!(none.is_empty());

    assert_eq!(
        send_get(&app, "/events/999/attendee").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn attendee_search_matches_substrings_and_404s_on_no_match() {
    let app = test_app();

    let found: Vec<Attendee> = json_body(send_get(&app, "/attendee?name=ali").await).await;
    let names: Vec<&str> = found.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Johnson", "Alicia Gomez", "Ali Hassan"]);

    assert_eq!(
        send_get(&app, "/attendee?name=zzzz").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn posted_event_is_created_and_listed() {
    let app = test_app();
    let request = Request::post("/events")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "eventName": "Launch Party",
                "eventDate": "2025-09-01",
                "eventVenue": "Dock 4",
                "ticketPrice": 30,
                "description": "Celebrating the release"
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Event = json_body(response).await;
    assert_eq!(created.id.as_str(), (seed::events().len() + 1).to_string());
    assert_eq!(created.price(), Ok(30.0));

    let fetched: Event = json_body(send_get(&app, &format!("/events/{}", created.id)).await).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let app = build_router(Arc::new(seed::store()), 16);
    let request = Request::post("/events")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "eventName": "A very long event name that exceeds the limit",
                "eventDate": "2025-09-01",
                "eventVenue": "Dock 4",
                "ticketPrice": 30,
                "description": ""
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
