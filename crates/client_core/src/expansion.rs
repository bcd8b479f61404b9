use std::{collections::HashMap, sync::Arc};

use shared::domain::{Attendee, EventId};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::repository::EventRepository;

/// Fetch state of one event's attendee list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttendeeLoad {
    #[default]
    Unfetched,
    Loading,
    Loaded(Vec<Attendee>),
    Failed(String),
}

/// What an event row shows below itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendeeRow {
    Collapsed,
    Loading,
    NoAttendees,
    Attendees(Vec<Attendee>),
    Failed(String),
}

#[derive(Debug, Default)]
struct RowEntry {
    expanded: bool,
    load: AttendeeLoad,
}

impl RowEntry {
    fn view(&self) -> AttendeeRow {
        match (&self.load, self.expanded) {
            // A failure stays visible until the next expansion retries.
            (AttendeeLoad::Failed(message), _) => AttendeeRow::Failed(message.clone()),
            (_, false) => AttendeeRow::Collapsed,
            (AttendeeLoad::Unfetched | AttendeeLoad::Loading, true) => AttendeeRow::Loading,
            (AttendeeLoad::Loaded(attendees), true) if attendees.is_empty() => {
                AttendeeRow::NoAttendees
            }
            (AttendeeLoad::Loaded(attendees), true) => AttendeeRow::Attendees(attendees.clone()),
        }
    }
}

/// Per-event expand/collapse with a lazily filled attendee cache.
pub struct AttendeeExpansionController {
    repo: Arc<dyn EventRepository>,
    rows: Mutex<HashMap<EventId, RowEntry>>,
}

impl AttendeeExpansionController {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self {
            repo,
            rows: Mutex::new(HashMap::new()),
        }
    }

    /// Expands or collapses a row. The first expansion (or the first after a
    /// failure) fetches the attendees; later ones reuse the cache.
    pub async fn toggle(&self, event_id: &EventId) -> AttendeeRow {
        let needs_fetch = {
            let mut rows = self.rows.lock().await;
            let entry = rows.entry(event_id.clone()).or_default();
            if entry.expanded {
                entry.expanded = false;
                return entry.view();
            }
            entry.expanded = true;
            match entry.load {
                AttendeeLoad::Unfetched | AttendeeLoad::Failed(_) => {
                    entry.load = AttendeeLoad::Loading;
                    true
                }
                AttendeeLoad::Loading | AttendeeLoad::Loaded(_) => false,
            }
        };

        if needs_fetch {
            self.load(event_id).await;
        }
        self.row(event_id).await
    }

    async fn load(&self, event_id: &EventId) {
        debug!(%event_id, "fetching attendees");
        let result = self.repo.list_attendees(event_id).await;

        let mut rows = self.rows.lock().await;
        let entry = rows.entry(event_id.clone()).or_default();
        match result {
            Ok(attendees) => {
                debug!(%event_id, count = attendees.len(), "attendees loaded");
                entry.load = AttendeeLoad::Loaded(attendees);
            }
            Err(err) => {
                warn!(%event_id, error = %err, "failed to fetch attendees");
                entry.expanded = false;
                entry.load =
                    AttendeeLoad::Failed(format!("Failed to load attendees: {}", err.user_message()));
            }
        }
    }

    pub async fn row(&self, event_id: &EventId) -> AttendeeRow {
        self.rows
            .lock()
            .await
            .get(event_id)
            .map(RowEntry::view)
            .unwrap_or(AttendeeRow::Collapsed)
    }

    pub async fn load_state(&self, event_id: &EventId) -> AttendeeLoad {
        self.rows
            .lock()
            .await
            .get(event_id)
            .map(|entry| entry.load.clone())
            .unwrap_or_default()
    }

    pub async fn is_expanded(&self, event_id: &EventId) -> bool {
        self.rows
            .lock()
            .await
            .get(event_id)
            .is_some_and(|entry| entry.expanded)
    }

    /// Row views for many events under one lock.
    pub async fn rows_for<'a>(
        &self,
        event_ids: impl IntoIterator<Item = &'a EventId>,
    ) -> Vec<AttendeeRow> {
        let rows = self.rows.lock().await;
        event_ids
            .into_iter()
            .map(|id| rows.get(id).map(RowEntry::view).unwrap_or(AttendeeRow::Collapsed))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/expansion_tests.rs"]
mod tests;
