use thiserror::Error;
use url::Url;

/// Failure talking to the events API. An empty collection is not an error.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("invalid api base url '{0}'")]
    InvalidBaseUrl(String),
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    pub(crate) fn transport(url: &Url, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { url: url.to_string() }
        } else {
            Self::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Short text suitable for a controller's error slot.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidBaseUrl(_) => "The events API address is misconfigured.".to_string(),
            Self::Timeout { .. } => "The events API did not respond in time; please retry.".to_string(),
            Self::Network { .. } => "Network error; check your connection and retry.".to_string(),
            Self::Status { status: 404, .. } => "The requested item was not found.".to_string(),
            Self::Status { status, .. } if *status >= 500 => {
                format!("The events API is unavailable ({status}); please retry.")
            }
            Self::Status { status, .. } => format!("The events API rejected the request ({status})."),
            Self::Decode { .. } => "Received malformed data from the events API.".to_string(),
        }
    }
}
