use super::client::{CiError, CiServer};
use super::types::{JobAddress, SearchSuggestion};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A request observed by [`MockCiServer`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Suggest(String),
    ConsoleText(JobAddress),
}

#[derive(Debug, Clone)]
enum MockReply<T> {
    Ok(T),
    Status(u16),
    Failure(String),
}

impl<T: Clone> MockReply<T> {
    fn resolve(&self, url: String) -> Result<T, CiError> {
        match self {
            MockReply::Ok(value) => Ok(value.clone()),
            MockReply::Status(status) => Err(CiError::Status {
                url,
                status: *status,
            }),
            MockReply::Failure(message) => Err(CiError::Other(message.clone())),
        }
    }
}

/// In-memory CI server with canned answers keyed by query and job address.
///
/// Unknown queries answer with no suggestions; unknown jobs answer HTTP 404.
pub struct MockCiServer {
    suggestions: Mutex<HashMap<String, MockReply<Vec<SearchSuggestion>>>>,
    logs: Mutex<HashMap<JobAddress, MockReply<String>>>,
    calls: Mutex<Vec<MockCall>>,
    name: String,
}

impl MockCiServer {
    pub fn new() -> Self {
        Self::with_name("MockCI")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            suggestions: Mutex::new(HashMap::new()),
            logs: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    /// Answers `query` with suggestions carrying the given names, in order.
    pub fn add_suggestions<I, S>(&self, query: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = names.into_iter().map(SearchSuggestion::named).collect();
        self.suggestions
            .lock()
            .unwrap()
            .insert(query.to_string(), MockReply::Ok(list));
    }

    pub fn add_raw_suggestions(&self, query: &str, suggestions: Vec<SearchSuggestion>) {
        self.suggestions
            .lock()
            .unwrap()
            .insert(query.to_string(), MockReply::Ok(suggestions));
    }

    pub fn fail_search(&self, query: &str, status: u16) {
        self.suggestions
            .lock()
            .unwrap()
            .insert(query.to_string(), MockReply::Status(status));
    }

    pub fn break_search(&self, query: &str, message: impl Into<String>) {
        self.suggestions
            .lock()
            .unwrap()
            .insert(query.to_string(), MockReply::Failure(message.into()));
    }

    pub fn add_log(&self, job: &str, text: impl Into<String>) {
        self.logs
            .lock()
            .unwrap()
            .insert(JobAddress::new(job), MockReply::Ok(text.into()));
    }

    pub fn fail_log(&self, job: &str, status: u16) {
        self.logs
            .lock()
            .unwrap()
            .insert(JobAddress::new(job), MockReply::Status(status));
    }

    pub fn break_log(&self, job: &str, message: impl Into<String>) {
        self.logs
            .lock()
            .unwrap()
            .insert(JobAddress::new(job), MockReply::Failure(message.into()));
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn log_fetches(&self) -> Vec<JobAddress> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::ConsoleText(job) => Some(job),
                MockCall::Suggest(_) => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockCiServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CiServer for MockCiServer {
    async fn suggest(&self, query: &str) -> Result<Vec<SearchSuggestion>, CiError> {
        self.record(MockCall::Suggest(query.to_string()));

        match self.suggestions.lock().unwrap().get(query) {
            Some(reply) => reply.resolve(format!("mock://search/suggest?query={}", query)),
            None => Ok(Vec::new()),
        }
    }

    async fn latest_console_text(&self, job: &JobAddress) -> Result<String, CiError> {
        self.record(MockCall::ConsoleText(job.clone()));

        let url = format!("mock://job/{}/lastBuild/consoleText", job);
        match self.logs.lock().unwrap().get(job) {
            Some(reply) => reply.resolve(url),
            None => Err(CiError::Status { url, status: 404 }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockCiServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCiServer")
            .field("name", &self.name)
            .field("calls", &self.calls.lock().unwrap().len())
            .finish()
    }
}
