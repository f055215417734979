//! Version extraction from CI build logs
//!
//! The extractor fetches the console text of a job's latest build and runs it
//! through an ordered rule chain. Every failure collapses to `Version::NotAvailable`.

pub mod rules;

pub use rules::{
    first_group_trimmed, CaptureFn, ExtractionRule, RuleError, RuleMatch, RuleSet, RuleSpec,
    DEFAULT_RULES,
};

use crate::ci::{CiServer, JobAddress};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Marker written in place of a version that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Resolved(String),
    NotAvailable,
}

impl Version {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Version::Resolved(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Version::Resolved(v) => v,
            Version::NotAvailable => NOT_AVAILABLE,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct VersionExtractor {
    server: Arc<dyn CiServer>,
    rules: RuleSet,
}

impl VersionExtractor {
    pub fn new(server: Arc<dyn CiServer>, rules: RuleSet) -> Self {
        Self { server, rules }
    }

    pub fn with_default_rules(server: Arc<dyn CiServer>) -> Self {
        Self::new(server, RuleSet::with_defaults())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolves the version of the latest build of `job`. Never fails.
    pub async fn extract(&self, job: &JobAddress) -> Version {
        let log = match self.server.latest_console_text(job).await {
            Ok(text) => text,
            Err(e) => {
                warn!(job = %job, error = %e, "Could not fetch build log");
                return Version::NotAvailable;
            }
        };

        self.extract_from_log(job, &log)
    }

    pub fn extract_from_log(&self, job: &JobAddress, log: &str) -> Version {
        match self.rules.first_match(log) {
            Some(found) => {
                debug!(job = %job, rule = %found.rule, version = %found.version, "Version extracted");
                Version::Resolved(found.version)
            }
            None => {
                debug!(job = %job, log_bytes = log.len(), "No extraction rule matched");
                Version::NotAvailable
            }
        }
    }
}
