use std::{cmp::Ordering, fmt, str::FromStr};

use shared::domain::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Date,
    TicketPrice,
    TicketsSold,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "price" | "ticket-price" | "ticketprice" => Ok(Self::TicketPrice),
            "sold" | "tickets-sold" | "ticketssold" => Ok(Self::TicketsSold),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::TicketPrice => "price",
            Self::TicketsSold => "sold",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active column and direction of the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            order: SortOrder::Asc,
        }
    }

    /// Same column flips the direction; a different column starts ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                order: self.order.flipped(),
            }
        } else {
            Self::ascending(field)
        }
    }

    pub fn next(current: Option<Self>, field: SortField) -> Self {
        match current {
            Some(state) => state.toggle(field),
            None => Self::ascending(field),
        }
    }
}

enum SortKey {
    Instant(i64),
    Number(f64),
    Count(u64),
    Invalid,
}

fn sort_key(event: &Event, field: SortField) -> SortKey {
    match field {
        SortField::Date => event
            .starts_at()
            .map(|at| SortKey::Instant(at.timestamp_millis()))
            .unwrap_or(SortKey::Invalid),
        SortField::TicketPrice => event
            .price()
            .map(SortKey::Number)
            .unwrap_or(SortKey::Invalid),
        SortField::TicketsSold => SortKey::Count(event.tickets_sold),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey, order: SortOrder) -> Ordering {
    let directed = |ordering: Ordering| match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };
    match (a, b) {
        (SortKey::Instant(a), SortKey::Instant(b)) => directed(a.cmp(b)),
        (SortKey::Number(a), SortKey::Number(b)) => directed(a.total_cmp(b)),
        (SortKey::Count(a), SortKey::Count(b)) => directed(a.cmp(b)),
        // Unparseable values trail in both directions.
        (SortKey::Invalid, SortKey::Invalid) => Ordering::Equal,
        (SortKey::Invalid, _) => Ordering::Greater,
        (_, SortKey::Invalid) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Returns a new sequence ordered by `field`; the input is left untouched.
pub fn sort_events(events: &[Event], field: SortField, order: SortOrder) -> Vec<Event> {
    let mut keyed: Vec<(SortKey, &Event)> = events
        .iter()
        .map(|event| (sort_key(event, field), event))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, order));
    keyed.into_iter().map(|(_, event)| event.clone()).collect()
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
