use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator Jenkins uses between nested folder segments in a job URL.
pub const JOB_SEGMENT_SEPARATOR: &str = "/job/";

/// A single candidate returned by `/search/suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchSuggestion {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Body of a `/search/suggest` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Option<Vec<SearchSuggestion>>,
}

impl SuggestResponse {
    pub fn into_suggestions(self) -> Vec<SearchSuggestion> {
        self.suggestions.unwrap_or_default()
    }
}

/// Path of a job inside the server's folder hierarchy, e.g. `Team/job/foo-svc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobAddress(String);

impl JobAddress {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Builds an address from a suggestion name such as `"Team sub foo-svc"`.
    ///
    /// Segments are separated by runs of whitespace; leading and trailing
    /// whitespace is ignored. Returns `None` when the name has no segments.
    pub fn from_suggestion_name(name: &str) -> Option<Self> {
        let segments: Vec<&str> = name.split_whitespace().collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join(JOB_SEGMENT_SEPARATOR)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
