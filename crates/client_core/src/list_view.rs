use std::sync::Arc;

use shared::domain::{Event, EventId};
use tokio::sync::Mutex;

use crate::{
    card::{format_date, format_price, PLACEHOLDER},
    config::ClientSettings,
    expansion::{AttendeeExpansionController, AttendeeRow},
    pagination::{FetchOutcome, PageState, PaginationController, ScrollMetrics},
    repository::EventRepository,
    sort::{sort_events, SortField, SortOrder, SortState},
    theme::Frame,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub event: Event,
    pub attendees: AttendeeRow,
}

/// The event table: accumulated pages, the active sort, and per-row attendee
/// expansion. Everything lives as long as the view.
pub struct EventListView {
    pagination: PaginationController,
    expansion: AttendeeExpansionController,
    sort: Mutex<Option<SortState>>,
}

impl EventListView {
    pub fn new(repo: Arc<dyn EventRepository>, settings: &ClientSettings) -> Self {
        Self {
            pagination: PaginationController::from_settings(Arc::clone(&repo), settings),
            expansion: AttendeeExpansionController::new(repo),
            sort: Mutex::new(None),
        }
    }

    pub async fn mount(&self) -> FetchOutcome {
        self.pagination.fetch_next().await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> FetchOutcome {
        self.pagination.on_scroll(metrics).await
    }

    pub async fn retry(&self) -> FetchOutcome {
        self.pagination.fetch_next().await
    }

    /// Starts over from the first page. Sort and expansion state are kept.
    pub async fn refresh(&self) -> FetchOutcome {
        self.pagination.reset().await;
        self.pagination.fetch_next().await
    }

    pub async fn sort_by(&self, field: SortField) -> SortState {
        let mut sort = self.sort.lock().await;
        let next = SortState::next(*sort, field);
        *sort = Some(next);
        next
    }

    pub async fn sort_state(&self) -> Option<SortState> {
        *self.sort.lock().await
    }

    pub async fn toggle_attendees(&self, event_id: &EventId) -> AttendeeRow {
        self.expansion.toggle(event_id).await
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    /// Accumulated events in display order with their attendee rows.
    pub async fn rows(&self) -> Vec<EventRow> {
        let events = self.pagination.events().await;
        let ordered = match self.sort_state().await {
            Some(SortState { field, order }) => sort_events(&events, field, order),
            None => events,
        };
        let attendees = self.expansion.rows_for(ordered.iter().map(|e| &e.id)).await;
        ordered
            .into_iter()
            .zip(attendees)
            .map(|(event, attendees)| EventRow { event, attendees })
            .collect()
    }

    pub async fn status_line(&self) -> String {
        match self.pagination.state().await {
            PageState::Idle => "Scroll for more events.".to_string(),
            PageState::Fetching => "Loading more events...".to_string(),
            PageState::Exhausted => "No more events.".to_string(),
            PageState::Errored => self
                .pagination
                .error()
                .await
                .unwrap_or_else(|| "Failed to load events.".to_string()),
        }
    }

    pub async fn render_table(&self, frame: Frame) -> String {
        let rows = self.rows().await;
        let sort = self.sort_state().await;
        let mut table = TextTable::new(
            ["Name", "Date", "Venue", "Price", "Sold"]
                .into_iter()
                .map(|title| header_label(title, sort))
                .collect(),
        );
        for row in &rows {
            let event = &row.event;
            table.push_row(
                vec![
                    event.name.clone(),
                    format_date(event),
                    event.venue.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
                    format_price(event),
                    event.tickets_sold.to_string(),
                ],
                attendee_lines(&row.attendees),
            );
        }

        let mut out = table.render(frame);
        out.push('\n');
        out.push_str(&self.status_line().await);
        out
    }
}

fn header_label(title: &str, sort: Option<SortState>) -> String {
    let field = match title {
        "Date" => Some(SortField::Date),
        "Price" => Some(SortField::TicketPrice),
        "Sold" => Some(SortField::TicketsSold),
        _ => None,
    };
    match (field, sort) {
        (Some(field), Some(state)) if state.field == field => match state.order {
            SortOrder::Asc => format!("{title} ^"),
            SortOrder::Desc => format!("{title} v"),
        },
        _ => title.to_string(),
    }
}

fn attendee_lines(row: &AttendeeRow) -> Vec<String> {
    match row {
        AttendeeRow::Collapsed => Vec::new(),
        AttendeeRow::Loading => vec!["Loading attendees...".to_string()],
        AttendeeRow::NoAttendees => vec!["No attendees".to_string()],
        AttendeeRow::Failed(message) => vec![format!("! {message}")],
        AttendeeRow::Attendees(attendees) => attendees
            .iter()
            .map(|a| match &a.ticket_type {
                Some(ticket) => format!("- {} <{}> ({ticket})", a.name, a.email),
                None => format!("- {} <{}>", a.name, a.email),
            })
            .collect(),
    }
}

struct TextRow {
    cells: Vec<String>,
    details: Vec<String>,
}

/// Fixed-width table with optional indented detail lines under each row.
struct TextTable {
    headers: Vec<String>,
    rows: Vec<TextRow>,
}

impl TextTable {
    fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push_row(&mut self, cells: Vec<String>, details: Vec<String>) {
        self.rows.push(TextRow { cells, details });
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn render(&self, frame: Frame) -> String {
        let widths = self.widths();
        let rule = widths
            .iter()
            .map(|w| frame.horizontal.to_string().repeat(w + 2))
            .collect::<Vec<_>>()
            .join(&frame.corner.to_string());
        let rule = format!("{c}{rule}{c}", c = frame.corner);
        let line = |cells: &[String]| {
            let joined = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    format!(" {cell}{} ", " ".repeat(width - cell.chars().count()))
                })
                .collect::<Vec<_>>()
                .join(&frame.vertical.to_string());
            format!("{v}{joined}{v}", v = frame.vertical)
        };

        let mut out = vec![rule.clone(), line(&self.headers), rule.clone()];
        for row in &self.rows {
            out.push(line(&row.cells));
            out.extend(row.details.iter().map(|detail| format!("{}    {detail}", frame.vertical)));
        }
        out.push(rule);
        out.join("\n")
    }
}

#[cfg(test)]
#[path = "tests/list_view_tests.rs"]
mod tests;
