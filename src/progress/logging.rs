//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { total } => {
                info!(components = total, "Starting version resolution");
            }
            ProgressEvent::ComponentStarted { ordinal, component } => {
                debug!(ordinal, component = %component, "Resolving component");
            }
            ProgressEvent::JobLocated {
                ordinal,
                component,
                job,
            } => match job {
                Some(job) => debug!(ordinal, component = %component, job = %job, "Job located"),
                None => warn!(ordinal, component = %component, "No CI job found"),
            },
            ProgressEvent::ComponentResolved {
                ordinal,
                component,
                version,
                elapsed,
            } => {
                info!(
                    ordinal,
                    component = %component,
                    version = %version,
                    elapsed_ms = elapsed.as_millis(),
                    "Component resolved"
                );
            }
            ProgressEvent::RunCompleted {
                total,
                resolved,
                total_time,
            } => {
                let unresolved = total.saturating_sub(*resolved);
                if unresolved > 0 {
                    warn!(
                        total,
                        resolved,
                        unresolved,
                        total_time_ms = total_time.as_millis(),
                        "Resolution complete with unresolved components"
                    );
                } else {
                    info!(
                        total,
                        total_time_ms = total_time.as_millis(),
                        "Resolution complete"
                    );
                }
            }
        }
    }
}
