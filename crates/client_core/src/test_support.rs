//! In-process `EventRepository` used by controller tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{Attendee, AttendeeId, Event, EventId, TicketPrice},
    protocol::NewEvent,
};
use tokio::sync::{mpsc, oneshot, Semaphore};

use crate::{error::RepositoryError, repository::EventRepository};

pub type SearchReply = oneshot::Sender<Result<Vec<Attendee>, RepositoryError>>;

pub fn event(id: &str, date: &str, price: Option<TicketPrice>, tickets_sold: u64) -> Event {
    Event {
        id: EventId::new(id),
        name: format!("Event {id}"),
        date: date.to_string(),
        venue: None,
        ticket_price: price,
        tickets_sold,
        icon: None,
        description: None,
        created_at: None,
    }
}

pub fn events_page(prefix: &str, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            event(
                &format!("{prefix}-{i}"),
                &format!("2025-01-{:02}", (i % 28) + 1),
                Some(TicketPrice::Amount(10.0 + i as f64)),
                i as u64,
            )
        })
        .collect()
}

pub fn attendee(id: &str, event_id: &str, name: &str) -> Attendee {
    Attendee {
        id: AttendeeId::new(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase().replace(' ', ".")),
        ticket_type: None,
        event_id: Some(EventId::new(event_id)),
    }
}

fn scripted_failure(what: &str) -> RepositoryError {
    RepositoryError::Status {
        status: 503,
        url: format!("scripted://{what}"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Calls {
    pub list: Vec<(u32, u32)>,
    pub get: Vec<EventId>,
    pub attendees: Vec<EventId>,
    pub search: Vec<String>,
    pub create: Vec<NewEvent>,
}

#[derive(Default)]
pub struct ScriptedRepository {
    pages: Vec<Vec<Event>>,
    list_failures: Mutex<usize>,
    list_gate: Option<Arc<Semaphore>>,
    events: HashMap<EventId, Event>,
    attendees: HashMap<EventId, Vec<Attendee>>,
    attendee_failures: Mutex<HashMap<EventId, usize>>,
    attendee_gate: Option<Arc<Semaphore>>,
    search_pool: Vec<Attendee>,
    search_channel: Option<mpsc::UnboundedSender<(String, SearchReply)>>,
    calls: Mutex<Calls>,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page `n` serves `pages[n - 1]`; later pages are empty.
    pub fn with_pages(mut self, pages: Vec<Vec<Event>>) -> Self {
        for event in pages.iter().flatten() {
            self.events.insert(event.id.clone(), event.clone());
        }
        self.pages = pages;
        self
    }

    pub fn with_list_failures(self, count: usize) -> Self {
        *self.list_failures.lock().expect("lock") = count;
        self
    }

    /// Every list call waits for one permit.
    pub fn with_list_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.list_gate = Some(gate);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.insert(event.id.clone(), event);
        self
    }

    pub fn with_attendees(mut self, event_id: &str, attendees: Vec<Attendee>) -> Self {
        self.search_pool.extend(attendees.iter().cloned());
        self.attendees.insert(EventId::new(event_id), attendees);
        self
    }

    pub fn with_attendee_failures(self, event_id: &str, count: usize) -> Self {
        self.attendee_failures
            .lock()
            .expect("lock")
            .insert(EventId::new(event_id), count);
        self
    }

    pub fn with_attendee_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.attendee_gate = Some(gate);
        self
    }

    /// Search calls are handed to the test, which decides when and how each
    /// one resolves.
    pub fn with_search_channel(mut self, tx: mpsc::UnboundedSender<(String, SearchReply)>) -> Self {
        self.search_channel = Some(tx);
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().expect("lock").clone()
    }

    fn take_failure(counter: &mut usize) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl EventRepository for ScriptedRepository {
    async fn list_events(&self, page: u32, limit: u32) -> Result<Vec<Event>, RepositoryError> {
        self.calls.lock().expect("lock").list.push((page, limit));
        if let Some(gate) = &self.list_gate {
            gate.acquire().await.expect("gate open").forget();
        }
        if Self::take_failure(&mut self.list_failures.lock().expect("lock")) {
            return Err(scripted_failure("events"));
        }
        let index = page.saturating_sub(1) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn get_event(&self, event_id: &EventId) -> Result<Event, RepositoryError> {
        self.calls.lock().expect("lock").get.push(event_id.clone());
        self.events
            .get(event_id)
            .cloned()
            .ok_or_else(|| RepositoryError::Status {
                status: 404,
                url: format!("scripted://events/{event_id}"),
            })
    }

    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<Attendee>, RepositoryError> {
        self.calls.lock().expect("lock").attendees.push(event_id.clone());
        if let Some(gate) = &self.attendee_gate {
            gate.acquire().await.expect("gate open").forget();
        }
        let failed = {
            let mut failures = self.attendee_failures.lock().expect("lock");
            failures
                .get_mut(event_id)
                .map(Self::take_failure)
                .unwrap_or(false)
        };
        if failed {
            return Err(scripted_failure("attendee"));
        }
        Ok(self.attendees.get(event_id).cloned().unwrap_or_default())
    }

    async fn search_attendees(&self, name: &str) -> Result<Vec<Attendee>, RepositoryError> {
        self.calls.lock().expect("lock").search.push(name.to_string());
        if let Some(tx) = &self.search_channel {
            let (reply_tx, reply_rx) = oneshot::channel();
            tx.send((name.to_string(), reply_tx)).expect("search listener");
            return reply_rx.await.expect("search reply");
        }
        if name.contains("error") {
            return Err(scripted_failure("attendee"));
        }
        let needle = name.to_ascii_lowercase();
        Ok(self
            .search_pool
            .iter()
            .filter(|a| a.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        self.calls.lock().expect("lock").create.push(event.clone());
        Ok(Event {
            id: EventId::new("created-1"),
            name: event.event_name.clone(),
            date: event.event_date.clone(),
            venue: Some(event.event_venue.clone()),
            ticket_price: Some(TicketPrice::Amount(event.ticket_price)),
            tickets_sold: 0,
            icon: None,
            description: Some(event.description.clone()),
            created_at: None,
        })
    }
}
