use super::types::{JobAddress, SearchSuggestion};
use async_trait::async_trait;
use thiserror::Error;

/// Failures talking to the CI server.
///
/// These never leave the locator or extractor; they are logged and turned
/// into an absent job or an unavailable version.
#[derive(Debug, Error)]
pub enum CiError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl CiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The two read-only endpoints the resolution pipeline needs.
#[async_trait]
pub trait CiServer: Send + Sync {
    /// Runs the server's fuzzy job search and returns suggestions in server order.
    async fn suggest(&self, query: &str) -> Result<Vec<SearchSuggestion>, CiError>;

    /// Fetches the console text of the latest build of `job`.
    async fn latest_console_text(&self, job: &JobAddress) -> Result<String, CiError>;

    fn name(&self) -> &str;
}
