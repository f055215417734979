//! Jenkins HTTP client
//!
//! Talks to the two endpoints the pipeline uses:
//!
//! - `GET {base}search/suggest?query=<component>` returning
//!   `{ "suggestions": [ { "name": "..." } ] }`
//! - `GET {base}job/<address>/lastBuild/consoleText` returning plain text
//!
//! Every request carries Basic credentials (user name + API token). Redirects
//! are followed, which Jenkins needs when `lastBuild` points at a numbered
//! build behind a proxy.

use super::client::{CiError, CiServer};
use super::types::{JobAddress, SearchSuggestion, SuggestResponse};
use crate::config::JenkinsSettings;
use async_trait::async_trait;
use reqwest::{redirect, Client, Response};
use std::time::Duration;
use tracing::{debug, trace};

const MAX_REDIRECTS: usize = 10;

pub struct JenkinsClient {
    base_url: String,
    username: String,
    api_token: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl JenkinsClient {
    pub fn new(settings: &JenkinsSettings) -> Result<Self, CiError> {
        let timeout = settings.request_timeout_secs.map(Duration::from_secs);
        let mut builder = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("buildscout/", env!("CARGO_PKG_VERSION")));
        // Without an explicit value requests may take as long as the server needs.
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| CiError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: normalize_base_url(&settings.url),
            username: settings.username.clone(),
            api_token: settings.api_token.clone(),
            http_client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn suggest_url(&self) -> String {
        format!("{}search/suggest", self.base_url)
    }

    pub fn console_url(&self, job: &JobAddress) -> String {
        format!("{}job/{}/lastBuild/consoleText", self.base_url, job)
    }

    fn checked(url: &str, result: reqwest::Result<Response>) -> Result<Response, CiError> {
        let response = result.map_err(|source| CiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn body_text(url: &str, response: Response) -> Result<String, CiError> {
        response.text().await.map_err(|source| CiError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CiServer for JenkinsClient {
    async fn suggest(&self, query: &str) -> Result<Vec<SearchSuggestion>, CiError> {
        let url = self.suggest_url();
        debug!(url = %url, query, "Searching for job");

        let result = self
            .http_client
            .get(&url)
            .query(&[("query", query)])
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await;
        let response = Self::checked(&url, result)?;
        let body = Self::body_text(&url, response).await?;
        trace!(url = %url, bytes = body.len(), "Received search response");

        let parsed: SuggestResponse = serde_json::from_str(&body).map_err(|e| CiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;

        Ok(parsed.into_suggestions())
    }

    async fn latest_console_text(&self, job: &JobAddress) -> Result<String, CiError> {
        let url = self.console_url(job);
        debug!(url = %url, "Fetching latest build log");

        let result = self
            .http_client
            .get(&url)
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await;
        let response = Self::checked(&url, result)?;
        let body = Self::body_text(&url, response).await?;
        trace!(url = %url, bytes = body.len(), "Received build log");

        Ok(body)
    }

    fn name(&self) -> &str {
        "jenkins"
    }
}

impl std::fmt::Debug for JenkinsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JenkinsClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Ensures the base URL ends with exactly one `/`.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> JenkinsSettings {
        JenkinsSettings {
            url: url.to_string(),
            username: "ci-bot".to_string(),
            api_token: "s3cr3t".to_string(),
            request_timeout_secs: Some(15),
        }
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://ci.example.com"), "https://ci.example.com/");
        assert_eq!(normalize_base_url("https://ci.example.com/"), "https://ci.example.com/");
        assert_eq!(normalize_base_url("https://ci.example.com///"), "https://ci.example.com/");
        assert_eq!(
            normalize_base_url(" https://ci.example.com/jenkins/ "),
            "https://ci.example.com/jenkins/"
        );
    }

    #[test]
    fn test_endpoint_urls() {
        let client = JenkinsClient::new(&settings("https://ci.example.com/")).unwrap();

        assert_eq!(client.suggest_url(), "https://ci.example.com/search/suggest");
        assert_eq!(
            client.console_url(&JobAddress::new("Team/job/foo-svc")),
            "https://ci.example.com/job/Team/job/foo-svc/lastBuild/consoleText"
        );
        assert_eq!(client.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(client.name(), "jenkins");
    }

    #[test]
    fn test_default_settings_have_no_timeout() {
        let client = JenkinsClient::new(&JenkinsSettings {
            url: "https://ci.example.com".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.timeout(), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let client = JenkinsClient::new(&settings("https://ci.example.com")).unwrap();
        let debug_str = format!("{:?}", client);

        assert!(debug_str.contains("ci-bot"));
        assert!(!debug_str.contains("s3cr3t"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = JenkinsClient::new(&JenkinsSettings {
            request_timeout_secs: Some(2),
            ..settings("http://127.0.0.1:1")
        })
        .unwrap();

        let err = client.suggest("foo-svc").await.unwrap_err();
        assert!(matches!(err, CiError::Transport { .. }));
    }
}
