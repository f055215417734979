//! Configuration management for buildscout
//!
//! Settings are assembled in layers, each overriding the previous one:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config`, otherwise `./buildscout.toml` or
//!    `<config dir>/buildscout/config.toml` when present)
//! 3. Environment variables
//! 4. Command-line flags (applied by the CLI handlers)
//!
//! # Environment Variables
//!
//! - `BUILDSCOUT_JENKINS_URL`: Jenkins base URL
//! - `BUILDSCOUT_JENKINS_USER`: user name for Basic authentication
//! - `BUILDSCOUT_JENKINS_TOKEN`: API token for Basic authentication
//! - `BUILDSCOUT_OUTPUT`: report file path - default: "buildNumbers.txt"
//! - `BUILDSCOUT_REQUEST_TIMEOUT`: per-request timeout in seconds - default: unset (no timeout)
//!
//! # File Format
//!
//! ```toml
//! output = "buildNumbers.txt"
//! components = ["lambda-billing-reporter", "ms-storage-access-provider"]
//!
//! [jenkins]
//! url = "https://ci.example.com/"
//! username = "ci-bot"
//! request_timeout_secs = 30
//!
//! [[rules]]
//! name = "pom-version"
//! pattern = "<version>([^<]+)</version>"
//! ```

use crate::extract::{RuleError, RuleSet, RuleSpec};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DEFAULT_OUTPUT: &str = "buildNumbers.txt";
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;
const LOCAL_CONFIG_FILE: &str = "buildscout.toml";

pub const ENV_JENKINS_URL: &str = "BUILDSCOUT_JENKINS_URL";
pub const ENV_JENKINS_USER: &str = "BUILDSCOUT_JENKINS_USER";
pub const ENV_JENKINS_TOKEN: &str = "BUILDSCOUT_JENKINS_TOKEN";
pub const ENV_OUTPUT: &str = "BUILDSCOUT_OUTPUT";
pub const ENV_REQUEST_TIMEOUT: &str = "BUILDSCOUT_REQUEST_TIMEOUT";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Jenkins URL not specified. Set BUILDSCOUT_JENKINS_URL, --jenkins-url or [jenkins].url")]
    MissingUrl,

    #[error("Invalid Jenkins URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    #[error("Jenkins credentials incomplete: {0} is empty")]
    MissingCredential(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("No components to resolve")]
    NoComponents,

    #[error("Component '{0}' is listed more than once; remove the duplicate entry from the component list")]
    DuplicateComponent(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Connection settings for the Jenkins server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JenkinsSettings {
    /// Base URL, e.g. `https://ci.example.com/`
    pub url: String,

    /// User name for Basic authentication
    pub username: String,

    /// API token for Basic authentication
    pub api_token: String,

    /// Per-request timeout in seconds; `None` leaves requests unbounded
    pub request_timeout_secs: Option<u64>,
}

impl Default for JenkinsSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            api_token: String::new(),
            request_timeout_secs: None,
        }
    }
}

/// Everything a resolution run needs, built once and passed down explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoutConfig {
    pub jenkins: JenkinsSettings,

    /// Components to resolve, in report order
    pub components: Vec<String>,

    /// Report file path
    pub output: PathBuf,

    /// Extraction rules appended after the built-in ones
    pub rules: Vec<RuleSpec>,

    /// Config file the settings were read from, if any
    pub source_file: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            jenkins: JenkinsSettings::default(),
            components: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            rules: Vec::new(),
            source_file: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    output: Option<PathBuf>,
    components: Option<Vec<String>>,
    jenkins: Option<FileJenkins>,
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileJenkins {
    url: Option<String>,
    username: Option<String>,
    api_token: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ScoutConfig {
    /// Loads defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; without one the default locations are
    /// tried and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_file(),
        };
        if let Some(file) = file {
            config.merge_file(&file)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Merges the settings found in a TOML file.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&text).map_err(|source| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        self.source_file = Some(path.to_path_buf());
        Ok(())
    }

    fn merge_toml(&mut self, text: &str) -> Result<(), toml::de::Error> {
        let file: FileConfig = toml::from_str(text)?;

        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(components) = file.components {
            self.components = components;
        }
        if let Some(jenkins) = file.jenkins {
            if let Some(url) = jenkins.url {
                self.jenkins.url = url;
            }
            if let Some(username) = jenkins.username {
                self.jenkins.username = username;
            }
            if let Some(api_token) = jenkins.api_token {
                self.jenkins.api_token = api_token;
            }
            if let Some(timeout) = jenkins.request_timeout_secs {
                self.jenkins.request_timeout_secs = Some(timeout);
            }
        }
        self.rules.extend(file.rules);
        Ok(())
    }

    /// Applies `BUILDSCOUT_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| env::var(key).ok())
    }

    /// Applies `BUILDSCOUT_*` variables using `lookup` to read them.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_JENKINS_URL) {
            self.jenkins.url = url;
        }
        if let Some(user) = lookup(ENV_JENKINS_USER) {
            self.jenkins.username = user;
        }
        if let Some(token) = lookup(ENV_JENKINS_TOKEN) {
            self.jenkins.api_token = token;
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            self.output = PathBuf::from(output);
        }
        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT) {
            let secs = timeout.trim().parse::<u64>().map_err(|e: std::num::ParseIntError| {
                ConfigError::ParseError {
                    field: ENV_REQUEST_TIMEOUT.to_string(),
                    error: e.to_string(),
                }
            })?;
            self.jenkins.request_timeout_secs = Some(secs);
        }
        Ok(())
    }

    /// Checks the settings needed to talk to Jenkins at all.
    pub fn validate_server(&self) -> Result<(), ConfigError> {
        let url = self.jenkins.url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        if self.jenkins.username.trim().is_empty() {
            return Err(ConfigError::MissingCredential("username"));
        }
        if self.jenkins.api_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential("api_token"));
        }

        if let Some(secs) = self.jenkins.request_timeout_secs {
            if secs == 0 {
                return Err(ConfigError::ValidationFailed(
                    "Request timeout must be at least 1 second".to_string(),
                ));
            }
            if secs > MAX_REQUEST_TIMEOUT_SECS {
                return Err(ConfigError::ValidationFailed(
                    "Request timeout cannot exceed 10 minutes".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Full validation for a resolution run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;

        if self.components.is_empty() {
            return Err(ConfigError::NoComponents);
        }
        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.as_str()) {
                return Err(ConfigError::DuplicateComponent(component.clone()));
            }
        }

        self.rule_set()?;
        Ok(())
    }

    /// Built-in extraction rules plus the configured extras.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        Ok(RuleSet::from_specs(&self.rules)?)
    }
}

impl fmt::Display for ScoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buildscout Configuration:")?;
        if let Some(ref source) = self.source_file {
            writeln!(f, "  Config File: {}", source.display())?;
        }
        writeln!(f, "  Jenkins URL: {}", self.jenkins.url)?;
        writeln!(f, "  Username: {}", self.jenkins.username)?;
        writeln!(f, "  API Token: {}", mask(&self.jenkins.api_token))?;
        match self.jenkins.request_timeout_secs {
            Some(secs) => writeln!(f, "  Request Timeout: {}s", secs)?,
            None => writeln!(f, "  Request Timeout: none")?,
        }
        writeln!(f, "  Output: {}", self.output.display())?;
        writeln!(f, "  Components: {}", self.components.len())?;
        writeln!(f, "  Extra Rules: {}", self.rules.len())?;
        Ok(())
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "(not set)"
    } else {
        "********"
    }
}

fn default_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("buildscout").join("config.toml"))
        .filter(|p| p.is_file())
}

/// Parses a component list: one name per line, `#` starts a comment.
pub fn parse_component_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_component_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_component_list(&text))
}
