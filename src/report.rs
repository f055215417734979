//! Resolution report and the sinks it is delivered to
//!
//! A report is a numbered list of `"<ordinal>. <component> = <version>"`
//! lines joined with `\n`. It is built once at the end of a run and written
//! to every configured sink independently.

use crate::extract::Version;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub ordinal: usize,
    pub component: String,
    pub version: Version,
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} = {}", self.ordinal, self.component, self.version)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    results: Vec<ResolutionResult>,
}

impl Report {
    pub fn new(results: Vec<ResolutionResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[ResolutionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.results.iter().filter(|r| r.version.is_resolved()).count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &ResolutionResult> {
        self.results.iter().filter(|r| !r.version.is_resolved())
    }

    pub fn lines(&self) -> Vec<String> {
        self.results.iter().map(ToString::to_string).collect()
    }

    /// Report text; lines joined by `\n` with no trailing newline.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write report to {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report to {sink}: {source}")]
    Stream {
        sink: String,
        #[source]
        source: io::Error,
    },
}

/// Destination for a finished report.
pub trait ReportSink: Send {
    fn name(&self) -> &str;

    fn deliver(&mut self, report: &Report) -> Result<(), SinkError>;
}

/// Writes the report to a file in a single overwrite.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    label: String,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = format!("file:{}", path.display());
        Self { path, label }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn name(&self) -> &str {
        &self.label
    }

    fn deliver(&mut self, report: &Report) -> Result<(), SinkError> {
        fs::write(&self.path, report.render()).map_err(|source| SinkError::File {
            path: self.path.clone(),
            source,
        })
    }
}

/// Echoes the report to a human-readable stream, stdout by default.
pub struct ConsoleSink<W: Write + Send> {
    writer: W,
    banner: Option<String>,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            banner: None,
        }
    }

    /// Line printed above the report, e.g. where the file copy went.
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_report(&mut self, report: &Report) -> io::Result<()> {
        if let Some(banner) = &self.banner {
            writeln!(self.writer)?;
            writeln!(self.writer, "=== {} ===", banner)?;
        }
        writeln!(self.writer, "{}", report)?;
        self.writer.flush()
    }
}

impl<W: Write + Send> ReportSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn deliver(&mut self, report: &Report) -> Result<(), SinkError> {
        self.write_report(report).map_err(|source| SinkError::Stream {
            sink: "console".to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Report {
        Report::new(vec![
            ResolutionResult {
                ordinal: 1,
                component: "foo-svc".to_string(),
                version: Version::Resolved("5.21".to_string()),
            },
            ResolutionResult {
                ordinal: 2,
                component: "bar-svc".to_string(),
                version: Version::NotAvailable,
            },
        ])
    }

    #[test]
    fn test_render_lines() {
        let report = sample();
        assert_eq!(report.render(), "1. foo-svc = 5.21\n2. bar-svc = N/A");
        assert_eq!(report.to_string(), report.render());
        assert_eq!(report.len(), 2);
        assert_eq!(report.resolved_count(), 1);
        assert_eq!(
            report.unresolved().map(|r| r.component.as_str()).collect::<Vec<_>>(),
            vec!["bar-svc"]
        );
    }

    #[test]
    fn test_empty_report_renders_empty() {
        let report = Report::default();
        assert!(report.is_empty());
        assert_eq!(report.render(), "");
    }

    #[test]
    fn test_file_sink_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("buildNumbers.txt");
        fs::write(&path, "stale content that is longer than the report\n").unwrap();

        let mut sink = FileSink::new(&path);
        sink.deliver(&sample()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1. foo-svc = 5.21\n2. bar-svc = N/A"
        );
        assert!(sink.name().starts_with("file:"));
    }

    #[test]
    fn test_file_sink_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");

        let err = FileSink::new(&path).deliver(&sample()).unwrap_err();
        assert!(matches!(err, SinkError::File { .. }));
        assert!(err.to_string().contains("no-such-dir"));
    }

    #[test]
    fn test_console_sink_with_banner() {
        let mut sink = ConsoleSink::new(Vec::new()).with_banner("Results saved to out.txt");
        sink.deliver(&sample()).unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            written,
            "\n=== Results saved to out.txt ===\n1. foo-svc = 5.21\n2. bar-svc = N/A\n"
        );
    }

    #[test]
    fn test_console_sink_plain() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.deliver(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "1. foo-svc = 5.21\n2. bar-svc = N/A\n"
        );
    }
}
