//! Client-side list management for the events API: paging, sorting,
//! attendee search and per-event attendee expansion, plus the text
//! renderers the CLI uses.

pub mod add_event;
pub mod card;
pub mod config;
pub mod debounce;
pub mod error;
pub mod expansion;
pub mod list_view;
pub mod pagination;
pub mod repository;
pub mod search;
pub mod sort;
pub mod theme;

#[cfg(test)]
mod test_support;

pub use add_event::{AddEventWizard, SubmitOutcome, WizardStep};
pub use card::EventCard;
pub use config::{load_settings, ClientSettings};
pub use error::RepositoryError;
pub use expansion::{AttendeeExpansionController, AttendeeRow};
pub use list_view::{EventListView, EventRow};
pub use pagination::{FetchOutcome, PageState, PaginationController, ScrollMetrics};
pub use repository::{EventRepository, HttpEventRepository};
pub use search::{AttendeeSearchController, SearchSnapshot, SearchStatus};
pub use sort::{sort_events, SortField, SortOrder, SortState};
pub use theme::{Frame, Theme, ThemeContext};
