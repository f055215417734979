//! Run coordinator - resolves every component in order and delivers the report

use crate::ci::CiServer;
use crate::extract::{RuleSet, Version, VersionExtractor};
use crate::locator::JobLocator;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::report::{Report, ReportSink, ResolutionResult, SinkError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// One or more sinks could not take the report.
#[derive(Debug, Error)]
#[error("report delivery failed for {} sink(s): {}", .failures.len(), summarize(.failures))]
pub struct DeliveryError {
    pub failures: Vec<(String, SinkError)>,
}

fn summarize(failures: &[(String, SinkError)]) -> String {
    failures
        .iter()
        .map(|(sink, err)| format!("{}: {}", sink, err))
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct RunCoordinator {
    locator: JobLocator,
    extractor: VersionExtractor,
    progress: Box<dyn ProgressHandler>,
}

impl RunCoordinator {
    pub fn new(locator: JobLocator, extractor: VersionExtractor) -> Self {
        Self {
            locator,
            extractor,
            progress: Box::new(NoOpHandler),
        }
    }

    /// Locator and extractor sharing one server, with the given rule chain.
    pub fn for_server(server: Arc<dyn CiServer>, rules: RuleSet) -> Self {
        Self::new(
            JobLocator::new(server.clone()),
            VersionExtractor::new(server, rules),
        )
    }

    pub fn with_progress(mut self, handler: impl ProgressHandler + 'static) -> Self {
        self.progress = Box::new(handler);
        self
    }

    pub fn extractor(&self) -> &VersionExtractor {
        &self.extractor
    }

    /// Resolves one component; never fails.
    pub async fn resolve_component(&self, ordinal: usize, component: &str) -> ResolutionResult {
        let started = Instant::now();
        self.progress.on_progress(&ProgressEvent::ComponentStarted {
            ordinal,
            component: component.to_string(),
        });

        let job = self.locator.locate(component).await;
        self.progress.on_progress(&ProgressEvent::JobLocated {
            ordinal,
            component: component.to_string(),
            job: job.as_ref().map(ToString::to_string),
        });

        let version = match &job {
            Some(address) => self.extractor.extract(address).await,
            None => Version::NotAvailable,
        };

        self.progress.on_progress(&ProgressEvent::ComponentResolved {
            ordinal,
            component: component.to_string(),
            version: version.to_string(),
            elapsed: started.elapsed(),
        });

        ResolutionResult {
            ordinal,
            component: component.to_string(),
            version,
        }
    }

    /// Resolves every component sequentially, in input order.
    ///
    /// Ordinals start at 1 and advance for every component, failed or not.
    pub async fn resolve_all<S: AsRef<str>>(&self, components: &[S]) -> Report {
        let started = Instant::now();
        self.progress.on_progress(&ProgressEvent::RunStarted {
            total: components.len(),
        });

        let mut results = Vec::with_capacity(components.len());
        for (index, component) in components.iter().enumerate() {
            results.push(self.resolve_component(index + 1, component.as_ref()).await);
        }

        let report = Report::new(results);
        self.progress.on_progress(&ProgressEvent::RunCompleted {
            total: report.len(),
            resolved: report.resolved_count(),
            total_time: started.elapsed(),
        });
        report
    }

    /// Resolves all components, then delivers the report to every sink.
    pub async fn run<S: AsRef<str>>(
        &self,
        components: &[S],
        sinks: &mut [Box<dyn ReportSink>],
    ) -> Result<Report, DeliveryError> {
        let report = self.resolve_all(components).await;
        deliver(&report, sinks)?;
        Ok(report)
    }
}

/// Hands `report` to each sink; a failing sink does not stop the others.
pub fn deliver(report: &Report, sinks: &mut [Box<dyn ReportSink>]) -> Result<(), DeliveryError> {
    let mut failures = Vec::new();

    for sink in sinks.iter_mut() {
        match sink.deliver(report) {
            Ok(()) => info!(sink = sink.name(), lines = report.len(), "Report delivered"),
            Err(e) => {
                error!(sink = sink.name(), error = %e, "Report delivery failed");
                failures.push((sink.name().to_string(), e));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DeliveryError { failures })
    }
}
