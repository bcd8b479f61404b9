use chrono::{SecondsFormat, Utc};
use shared::{
    domain::{Attendee, Event, EventId, TicketPrice},
    protocol::{EventPageQuery, NewEvent},
};
use tokio::sync::RwLock;

struct StoreInner {
    events: Vec<Event>,
    attendees: Vec<Attendee>,
    next_event_id: u64,
}

/// In-memory stand-in for the hosted events collection. Ids are assigned
/// sequentially as decimal strings.
pub struct EventStore {
    inner: RwLock<StoreInner>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl EventStore {
    pub fn new(events: Vec<Event>, attendees: Vec<Attendee>) -> Self {
        let next_event_id = events
            .iter()
            .filter_map(|e| e.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: RwLock::new(StoreInner {
                events,
                attendees,
                next_event_id,
            }),
        }
    }

    /// 1-based paging. Without a limit the whole collection is returned.
    pub async fn list_events(&self, query: EventPageQuery) -> Vec<Event> {
        let inner = self.inner.read().await;
        let Some(limit) = query.limit.filter(|limit| *limit > 0) else {
            return inner.events.clone();
        };
        let page = query.page.unwrap_or(1).max(1);
        let start = (page as usize - 1).saturating_mul(limit as usize);
        inner
            .events
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    pub async fn get_event(&self, id: &EventId) -> Option<Event> {
        let inner = self.inner.read().await;
        inner.events.iter().find(|e| &e.id == id).cloned()
    }

    /// `None` when the event does not exist, an empty list when it has no
    /// attendees.
    pub async fn attendees_of(&self, id: &EventId) -> Option<Vec<Attendee>> {
        let inner = self.inner.read().await;
        if !inner.events.iter().any(|e| &e.id == id) {
            return None;
        }
        Some(
            inner
                .attendees
                .iter()
                .filter(|a| a.event_id.as_ref() == Some(id))
                .cloned()
                .collect(),
        )
    }

    /// Case-insensitive substring match on the attendee name or email.
    pub async fn search_attendees(&self, name: Option<&str>) -> Vec<Attendee> {
        let inner = self.inner.read().await;
        let needle = name.map(|n| n.trim().to_lowercase()).unwrap_or_default();
        inner
            .attendees
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle) || a.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub async fn create_event(&self, new_event: NewEvent) -> Event {
        let mut inner = self.inner.write().await;
        let id = EventId::new(inner.next_event_id.to_string());
        inner.next_event_id += 1;

        let event = Event {
            id,
            name: new_event.event_name,
            date: new_event.event_date,
            venue: Some(new_event.event_venue),
            ticket_price: Some(TicketPrice::Amount(new_event.ticket_price)),
            tickets_sold: 0,
            icon: None,
            description: Some(new_event.description),
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        inner.events.push(event.clone());
        event
    }

    pub async fn event_count(&self) -> usize {
        self.inner.read().await.events.len()
    }
}
