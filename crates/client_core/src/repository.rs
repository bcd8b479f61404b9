use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Attendee, Event, EventId},
    protocol::{AttendeeSearchQuery, EventPageQuery, NewEvent},
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::RepositoryError};

/// Remote collection of events and their attendees.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list_events(&self, page: u32, limit: u32) -> Result<Vec<Event>, RepositoryError>;
    async fn get_event(&self, event_id: &EventId) -> Result<Event, RepositoryError>;
    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<Attendee>, RepositoryError>;
    async fn search_attendees(&self, name: &str) -> Result<Vec<Attendee>, RepositoryError>;
    async fn create_event(&self, event: &NewEvent) -> Result<Event, RepositoryError>;
}

pub struct HttpEventRepository {
    http: Client,
    base_url: Url,
}

impl HttpEventRepository {
    pub fn new(base_url: &str) -> Result<Self, RepositoryError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, RepositoryError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| RepositoryError::Network {
                url: settings.api_url.clone(),
                message: e.to_string(),
            })?;
        Self::with_client(http, &settings.api_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, RepositoryError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|_| RepositoryError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, RepositoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::transport(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::transport(url, e))?;
        serde_json::from_slice(&body).map_err(|e| RepositoryError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// The mock API answers an empty filter with 404, which is just an empty
    /// collection for us.
    async fn send_collection<T: DeserializeOwned>(
        &self,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<Vec<T>, RepositoryError> {
        match self.send_json(url, request).await {
            Err(err) if err.is_not_found() => {
                debug!(%url, "collection endpoint returned 404; treating as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

#[async_trait]
impl EventRepository for HttpEventRepository {
    async fn list_events(&self, page: u32, limit: u32) -> Result<Vec<Event>, RepositoryError> {
        let url = self.endpoint(&["events"]);
        let request = self
            .http
            .get(url.clone())
            .query(&EventPageQuery::page(page, limit));
        self.send_collection(&url, request).await
    }

    async fn get_event(&self, event_id: &EventId) -> Result<Event, RepositoryError> {
        let url = self.endpoint(&["events", event_id.as_str()]);
        let request = self.http.get(url.clone());
        self.send_json(&url, request).await
    }

    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<Attendee>, RepositoryError> {
        let url = self.endpoint(&["events", event_id.as_str(), "attendee"]);
        let request = self.http.get(url.clone());
        self.send_collection(&url, request).await
    }

    async fn search_attendees(&self, name: &str) -> Result<Vec<Attendee>, RepositoryError> {
        let url = self.endpoint(&["attendee"]);
        let request = self.http.get(url.clone()).query(&AttendeeSearchQuery {
            name: Some(name.to_string()),
        });
        self.send_collection(&url, request).await
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        let url = self.endpoint(&["events"]);
        let request = self.http.post(url.clone()).json(event);
        self.send_json(&url, request).await
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
