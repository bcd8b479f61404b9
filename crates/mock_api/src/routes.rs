use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Attendee, Event, EventId},
    error::ApiError,
    protocol::{AttendeeSearchQuery, EventPageQuery, NewEvent},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info};

use crate::store::EventStore;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn build_router(store: Arc<EventStore>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/events", get(list_events).post(create_event))
        .route("/events/:event_id", get(get_event))
        .route("/events/:event_id/attendee", get(event_attendees))
        .route("/attendee", get(search_attendees))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(store)
}

fn not_found(what: impl std::fmt::Display) -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, Json(ApiError::not_found(what)))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_events(
    State(store): State<Arc<EventStore>>,
    Query(query): Query<EventPageQuery>,
) -> Json<Vec<Event>> {
    let events = store.list_events(query).await;
    debug!(page = ?query.page, limit = ?query.limit, returned = events.len(), "listed events");
    Json(events)
}

async fn create_event(
    State(store): State<Arc<EventStore>>,
    Json(new_event): Json<NewEvent>,
) -> (StatusCode, Json<Event>) {
    let event = store.create_event(new_event).await;
    info!(event_id = %event.id, name = %event.name, "created event");
    (StatusCode::CREATED, Json(event))
}

async fn get_event(
    State(store): State<Arc<EventStore>>,
    Path(event_id): Path<String>,
) -> ApiResult<Event> {
    let event_id = EventId::new(event_id);
    store
        .get_event(&event_id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(format!("event {event_id}")))
}

async fn event_attendees(
    State(store): State<Arc<EventStore>>,
    Path(event_id): Path<String>,
) -> ApiResult<Vec<Attendee>> {
    let event_id = EventId::new(event_id);
    store
        .attendees_of(&event_id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(format!("event {event_id}")))
}

/// Like the hosted mock API, a filter that matches nothing answers 404.
async fn search_attendees(
    State(store): State<Arc<EventStore>>,
    Query(query): Query<AttendeeSearchQuery>,
) -> ApiResult<Vec<Attendee>> {
    let found = store.search_attendees(query.name.as_deref()).await;
    debug!(query = ?query.name, matches = found.len(), "searched attendees");
    if found.is_empty() {
        return Err(not_found("attendee"));
    }
    Ok(Json(found))
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
