//! buildscout - resolve the latest build version of components from Jenkins
//!
//! For every component name the pipeline runs three steps:
//!
//! 1. **Job location**: query the Jenkins search endpoint and take the first
//!    suggestion whose name contains the component, turning
//!    `"Team foo-svc"` into the job address `Team/job/foo-svc`.
//! 2. **Version extraction**: fetch the console text of the job's last build
//!    and apply an ordered chain of regex rules; the first match wins.
//! 3. **Reporting**: collect one `"<n>. <component> = <version>"` line per
//!    component and deliver the report to a file and the console.
//!
//! Any failure while resolving a single component yields `N/A` for that
//! component and never aborts the run.
//!
//! # Example Usage
//!
//! ```no_run
//! use buildscout::{MockCiServer, RuleSet, RunCoordinator};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let server = Arc::new(MockCiServer::new());
//! server.add_suggestions("foo-svc", ["Team foo-svc"]);
//! server.add_log("Team/job/foo-svc", "Build.Number=5.21");
//!
//! let coordinator = RunCoordinator::for_server(server, RuleSet::with_defaults());
//! let report = coordinator.resolve_all(&["foo-svc"]).await;
//! assert_eq!(report.render(), "1. foo-svc = 5.21");
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`ci`]: Jenkins client trait, HTTP implementation and mock
//! - [`locator`]: component name to job address
//! - [`extract`]: version extraction rules
//! - [`coordinator`]: sequential run over all components
//! - [`report`]: report model and sinks
//! - [`progress`]: progress events and handlers
//! - [`config`]: layered configuration

pub mod ci;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod extract;
pub mod locator;
pub mod progress;
pub mod report;
pub mod util;

pub use ci::{CiError, CiServer, JenkinsClient, JobAddress, MockCiServer, SearchSuggestion};
pub use config::{ConfigError, JenkinsSettings, ScoutConfig};
pub use coordinator::{DeliveryError, RunCoordinator};
pub use extract::{ExtractionRule, RuleError, RuleSet, RuleSpec, Version, VersionExtractor};
pub use locator::JobLocator;
pub use progress::{ProgressEvent, ProgressHandler};
pub use report::{ConsoleSink, FileSink, Report, ReportSink, ResolutionResult, SinkError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
