use std::{sync::Arc, time::Duration};

use shared::domain::{Attendee, AttendeeId, Event};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{config::ClientSettings, debounce::Debouncer, repository::EventRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No query long enough to search.
    #[default]
    Idle,
    Debouncing,
    Searching,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub status: SearchStatus,
    pub results: Vec<Attendee>,
    pub error: Option<String>,
}

#[derive(Default)]
struct SearchState {
    /// Bumped on every keystroke; a completion is applied only when its tag
    /// still matches.
    seq: u64,
    snapshot: SearchSnapshot,
}

pub type SelectionHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Search-as-you-type over attendees by name.
pub struct AttendeeSearchController {
    repo: Arc<dyn EventRepository>,
    debouncer: Debouncer,
    min_query_len: usize,
    state: Arc<Mutex<SearchState>>,
    on_select: Option<SelectionHandler>,
}

impl AttendeeSearchController {
    pub fn new(repo: Arc<dyn EventRepository>, debounce: Duration, min_query_len: usize) -> Self {
        Self {
            repo,
            debouncer: Debouncer::new(debounce),
            min_query_len,
            state: Arc::new(Mutex::new(SearchState::default())),
            on_select: None,
        }
    }

    pub fn from_settings(repo: Arc<dyn EventRepository>, settings: &ClientSettings) -> Self {
        Self::new(repo, settings.debounce(), settings.min_query_len)
    }

    /// Registers the callback that receives the event resolved by `select`.
    pub fn with_selection_handler(mut self, handler: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(handler));
        self
    }

    pub async fn on_query_changed(&self, text: &str) {
        let query = text.trim().to_string();
        let searchable = query.chars().count() >= self.min_query_len;

        let seq = {
            let mut guard = self.state.lock().await;
            guard.seq += 1;
            guard.snapshot.query = query.clone();
            if searchable {
                guard.snapshot.status = SearchStatus::Debouncing;
            } else {
                guard.snapshot.status = SearchStatus::Idle;
                guard.snapshot.results.clear();
                guard.snapshot.error = None;
            }
            guard.seq
        };

        if !searchable {
            if self.debouncer.cancel().await {
                debug!(seq, "cancelled pending attendee search");
            }
            return;
        }

        let repo = Arc::clone(&self.repo);
        let state = Arc::clone(&self.state);
        self.debouncer
            .schedule(run_search(repo, state, seq, query))
            .await;
    }

    /// Resolves the owning event of a listed attendee and reports it to the
    /// selection handler.
    pub async fn select(&self, attendee_id: &AttendeeId) -> Option<Event> {
        let attendee = {
            let guard = self.state.lock().await;
            guard
                .snapshot
                .results
                .iter()
                .find(|attendee| &attendee.id == attendee_id)
                .cloned()
        };
        let Some(attendee) = attendee else {
            self.set_error("That attendee is no longer in the results.").await;
            return None;
        };
        let Some(event_id) = attendee.event_id else {
            self.set_error("This attendee is not linked to an event.").await;
            return None;
        };

        match self.repo.get_event(&event_id).await {
            Ok(event) => {
                info!(attendee_id = %attendee.id, event_id = %event.id, "resolved attendee event");
                if let Some(handler) = &self.on_select {
                    handler(&event);
                }
                Some(event)
            }
            Err(err) => {
                warn!(%event_id, error = %err, "failed to resolve attendee event");
                self.set_error(format!("Could not open the event: {}", err.user_message()))
                    .await;
                None
            }
        }
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Cancels a pending debounce; results already shown stay.
    pub async fn teardown(&self) {
        self.debouncer.cancel().await;
    }

    async fn set_error(&self, message: impl Into<String>) {
        self.state.lock().await.snapshot.error = Some(message.into());
    }
}

async fn run_search(
    repo: Arc<dyn EventRepository>,
    state: Arc<Mutex<SearchState>>,
    seq: u64,
    query: String,
) {
    {
        let mut guard = state.lock().await;
        if guard.seq != seq {
            return;
        }
        guard.snapshot.status = SearchStatus::Searching;
    }

    debug!(seq, %query, "searching attendees");
    let outcome = repo.search_attendees(&query).await;

    let mut guard = state.lock().await;
    if guard.seq != seq {
        debug!(seq, latest = guard.seq, %query, "discarding stale attendee results");
        return;
    }
    match outcome {
        Ok(results) => {
            debug!(seq, count = results.len(), "attendee search finished");
            guard.snapshot.results = results;
            guard.snapshot.error = None;
            guard.snapshot.status = SearchStatus::Ready;
        }
        Err(err) => {
            warn!(seq, %query, error = %err, "attendee search failed");
            guard.snapshot.results.clear();
            guard.snapshot.error = Some(format!("Attendee search failed: {}", err.user_message()));
            guard.snapshot.status = SearchStatus::Failed;
        }
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
