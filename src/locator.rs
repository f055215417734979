//! Job locator - maps a component name to the CI job that builds it

use crate::ci::{CiServer, JobAddress, SearchSuggestion};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct JobLocator {
    server: Arc<dyn CiServer>,
}

impl JobLocator {
    pub fn new(server: Arc<dyn CiServer>) -> Self {
        Self { server }
    }

    /// Finds the job address for `component`, or `None` when the search
    /// fails or nothing in it mentions the component.
    pub async fn locate(&self, component: &str) -> Option<JobAddress> {
        let suggestions = match self.server.suggest(component).await {
            Ok(s) => s,
            Err(e) => {
                warn!(component, error = %e, "Job search failed");
                return None;
            }
        };

        if suggestions.is_empty() {
            debug!(component, "Search returned no suggestions");
            return None;
        }

        let job = select_job(component, &suggestions);
        match &job {
            Some(address) => debug!(component, job = %address, "Located job"),
            None => debug!(
                component,
                candidates = suggestions.len(),
                "No suggestion matches component"
            ),
        }
        job
    }
}

/// Picks the first suggestion whose name contains `component` verbatim.
///
/// Matching is a case-sensitive substring test, so a component that is a
/// prefix of another can bind to the longer one if the server lists it first.
pub fn select_job(component: &str, suggestions: &[SearchSuggestion]) -> Option<JobAddress> {
    suggestions
        .iter()
        .filter_map(|s| s.name.as_deref())
        .find(|name| name.contains(component))
        .and_then(JobAddress::from_suggestion_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::{MockCall, MockCiServer};

    fn names(list: &[&str]) -> Vec<SearchSuggestion> {
        list.iter().map(|n| SearchSuggestion::named(*n)).collect()
    }

    #[test]
    fn test_select_first_match() {
        let suggestions = names(&["Team foo-svc", "Legacy foo-svc"]);
        let job = select_job("foo-svc", &suggestions).unwrap();
        assert_eq!(job.as_str(), "Team/job/foo-svc");
    }

    #[test]
    fn test_select_skips_non_matching() {
        let suggestions = names(&["Team bar-svc", "Infra foo-svc"]);
        let job = select_job("foo-svc", &suggestions).unwrap();
        assert_eq!(job.as_str(), "Infra/job/foo-svc");
    }

    #[test]
    fn test_select_no_match() {
        let suggestions = names(&["Team bar-svc", "Team baz-svc"]);
        assert!(select_job("foo-svc", &suggestions).is_none());
    }

    #[test]
    fn test_select_is_case_sensitive() {
        let suggestions = names(&["Team FOO-SVC"]);
        assert!(select_job("foo-svc", &suggestions).is_none());
    }

    #[test]
    fn test_select_prefix_binds_to_first_listed() {
        let suggestions = names(&["Team foo-svc-dlq", "Team foo-svc"]);
        let job = select_job("foo-svc", &suggestions).unwrap();
        assert_eq!(job.as_str(), "Team/job/foo-svc-dlq");
    }

    #[test]
    fn test_select_ignores_nameless_suggestions() {
        let mut suggestions = vec![SearchSuggestion { name: None }];
        suggestions.extend(names(&["Team foo-svc"]));
        let job = select_job("foo-svc", &suggestions).unwrap();
        assert_eq!(job.as_str(), "Team/job/foo-svc");
    }

    #[tokio::test]
    async fn test_locate_queries_component_name() {
        let server = Arc::new(MockCiServer::new());
        server.add_suggestions("foo-svc", ["Team foo-svc"]);
        let locator = JobLocator::new(server.clone());

        let job = locator.locate("foo-svc").await;

        assert_eq!(job, Some(JobAddress::new("Team/job/foo-svc")));
        assert_eq!(server.calls(), vec![MockCall::Suggest("foo-svc".to_string())]);
    }

    #[tokio::test]
    async fn test_locate_empty_suggestions() {
        let server = Arc::new(MockCiServer::new());
        server.add_suggestions("bar-svc", Vec::<String>::new());
        let locator = JobLocator::new(server);

        assert!(locator.locate("bar-svc").await.is_none());
    }

    #[tokio::test]
    async fn test_locate_http_failure_is_absence() {
        let server = Arc::new(MockCiServer::new());
        server.fail_search("foo-svc", 503);
        let locator = JobLocator::new(server);

        assert!(locator.locate("foo-svc").await.is_none());
    }

    #[tokio::test]
    async fn test_locate_transport_failure_is_absence() {
        let server = Arc::new(MockCiServer::new());
        server.break_search("foo-svc", "connection refused");
        let locator = JobLocator::new(server);

        assert!(locator.locate("foo-svc").await.is_none());
    }
}
