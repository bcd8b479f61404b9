use std::sync::Arc;

use shared::domain::Event;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{config::ClientSettings, repository::EventRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Fetching,
    /// A page came back empty; no further fetches for this controller.
    Exhausted,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Appended(usize),
    Exhausted,
    Failed,
    /// Not near the bottom, already fetching, exhausted, or errored on scroll.
    Suppressed,
    /// The list was reset while the request was in flight.
    Stale,
}

/// Viewport geometry at the time of a scroll event, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn at_bottom(scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top: (scroll_height - client_height).max(0.0),
            client_height,
            scroll_height,
        }
    }

    pub fn distance_to_bottom(&self) -> f64 {
        (self.scroll_height - (self.scroll_top + self.client_height)).max(0.0)
    }

    pub fn is_near_bottom(&self, threshold_px: f64) -> bool {
        self.distance_to_bottom() <= threshold_px
    }
}

struct PaginationState {
    state: PageState,
    page: u32,
    generation: u64,
    events: Vec<Event>,
    error: Option<String>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            state: PageState::Idle,
            page: 1,
            generation: 0,
            events: Vec::new(),
            error: None,
        }
    }
}

/// Infinite-scroll loader: owns the page cursor and appends each fetched
/// page to the accumulated event list. At most one request is in flight.
pub struct PaginationController {
    repo: Arc<dyn EventRepository>,
    page_size: u32,
    scroll_threshold_px: f64,
    inner: Mutex<PaginationState>,
}

impl PaginationController {
    pub fn new(repo: Arc<dyn EventRepository>, page_size: u32, scroll_threshold_px: f64) -> Self {
        Self {
            repo,
            page_size: page_size.max(1),
            scroll_threshold_px,
            inner: Mutex::new(PaginationState::default()),
        }
    }

    pub fn from_settings(repo: Arc<dyn EventRepository>, settings: &ClientSettings) -> Self {
        Self::new(repo, settings.page_size, settings.scroll_threshold_px)
    }

    /// Explicit trigger: mount or a manual retry. Retries the same page after
    /// a failure.
    pub async fn fetch_next(&self) -> FetchOutcome {
        let (page, generation) = {
            let mut guard = self.inner.lock().await;
            match guard.state {
                PageState::Fetching | PageState::Exhausted => {
                    debug!(state = ?guard.state, "suppressing events fetch");
                    return FetchOutcome::Suppressed;
                }
                PageState::Idle | PageState::Errored => {}
            }
            guard.state = PageState::Fetching;
            guard.error = None;
            (guard.page, guard.generation)
        };

        info!(page, limit = self.page_size, "fetching events page");
        let result = self.repo.list_events(page, self.page_size).await;

        let mut guard = self.inner.lock().await;
        if guard.generation != generation {
            debug!(page, "dropping events page from before reset");
            return FetchOutcome::Stale;
        }
        match result {
            Ok(batch) if batch.is_empty() => {
                info!(page, "events exhausted");
                guard.state = PageState::Exhausted;
                FetchOutcome::Exhausted
            }
            Ok(batch) => {
                let appended = batch.len();
                guard.events.extend(batch);
                guard.page += 1;
                guard.state = PageState::Idle;
                debug!(page, appended, total = guard.events.len(), "appended events page");
                FetchOutcome::Appended(appended)
            }
            Err(err) => {
                warn!(page, error = %err, "failed to fetch events page");
                guard.state = PageState::Errored;
                guard.error = Some(format!("Failed to load events: {}", err.user_message()));
                FetchOutcome::Failed
            }
        }
    }

    /// Scroll handler. Only an idle controller near the bottom fetches; an
    /// errored one waits for an explicit retry.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> FetchOutcome {
        if !metrics.is_near_bottom(self.scroll_threshold_px) {
            return FetchOutcome::Suppressed;
        }
        if self.state().await != PageState::Idle {
            return FetchOutcome::Suppressed;
        }
        self.fetch_next().await
    }

    /// Drops everything fetched so far and rewinds to page 1. A request still
    /// in flight is discarded when it lands.
    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        let generation = guard.generation + 1;
        *guard = PaginationState {
            generation,
            ..PaginationState::default()
        };
    }

    pub async fn state(&self) -> PageState {
        self.inner.lock().await.state
    }

    pub async fn has_more(&self) -> bool {
        self.state().await != PageState::Exhausted
    }

    pub async fn page(&self) -> u32 {
        self.inner.lock().await.page
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.lock().await.error.clone()
    }

    pub async fn events(&self) -> Vec<Event> {
        self.inner.lock().await.events.clone()
    }

    pub async fn loaded_count(&self) -> usize {
        self.inner.lock().await.events.len()
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
