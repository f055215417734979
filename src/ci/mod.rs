//! CI server access
//!
//! A trait-based abstraction over the CI server so the locator and extractor
//! can run against Jenkins over HTTP or against an in-memory mock.

mod client;
mod jenkins;
mod mock;
mod types;

pub use client::{CiError, CiServer};
pub use jenkins::{normalize_base_url, JenkinsClient};
pub use mock::{MockCall, MockCiServer};
pub use types::{JobAddress, SearchSuggestion, SuggestResponse, JOB_SEGMENT_SEPARATOR};
