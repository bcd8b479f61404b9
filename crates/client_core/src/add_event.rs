use std::sync::Arc;

use shared::{domain::Event, protocol::NewEvent};
use tracing::{info, warn};

use crate::{error::RepositoryError, repository::EventRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Details,
    Review,
}

impl WizardStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::Details => "Enter Event Details",
            Self::Review => "Review & Submit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submitting from the details step only moves to review.
    Advanced,
    Created(Event),
}

/// Two-step "add event" flow. Fields are not validated here.
pub struct AddEventWizard {
    repo: Arc<dyn EventRepository>,
    step: WizardStep,
    draft: NewEvent,
    error: Option<String>,
}

impl AddEventWizard {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self {
            repo,
            step: WizardStep::Details,
            draft: NewEvent::default(),
            error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &NewEvent {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_draft(&mut self, draft: NewEvent) {
        self.draft = draft;
    }

    pub fn next(&mut self) {
        self.step = WizardStep::Review;
    }

    pub fn back(&mut self) {
        self.step = WizardStep::Details;
    }

    /// Clears the draft and returns to the first step.
    pub fn reset(&mut self) {
        self.step = WizardStep::Details;
        self.draft = NewEvent::default();
        self.error = None;
    }

    /// On failure the wizard stays on review with the draft intact.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, RepositoryError> {
        if self.step == WizardStep::Details {
            self.next();
            return Ok(SubmitOutcome::Advanced);
        }

        match self.repo.create_event(&self.draft).await {
            Ok(created) => {
                info!(event_id = %created.id, name = %created.name, "event created");
                self.reset();
                Ok(SubmitOutcome::Created(created))
            }
            Err(err) => {
                warn!(error = %err, "failed to create event");
                self.error = Some(format!("Failed to save event: {}", err.user_message()));
                Err(err)
            }
        }
    }

    pub fn review_lines(&self) -> Vec<String> {
        let draft = &self.draft;
        vec![
            format!("Name: {}", draft.event_name),
            format!("Date: {}", draft.event_date),
            format!("Venue: {}", draft.event_venue),
            format!("Price: {}", draft.ticket_price),
            format!("Description: {}", draft.description),
        ]
    }
}
