//! Ordered version-extraction rules applied to a build log

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("extraction rule '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("extraction rule '{name}' must contain at least one capture group")]
    MissingCaptureGroup { name: String },

    #[error("duplicate extraction rule name '{0}'")]
    DuplicateName(String),
}

/// Pulls the version token out of a successful match.
pub type CaptureFn = fn(&Captures) -> Option<String>;

/// A rule as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub pattern: String,
}

pub struct ExtractionRule {
    name: String,
    rank: usize,
    pattern: Regex,
    capture: CaptureFn,
}

impl ExtractionRule {
    pub fn new(
        name: impl Into<String>,
        rank: usize,
        pattern: &str,
        capture: CaptureFn,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        if pattern.captures_len() < 2 {
            return Err(RuleError::MissingCaptureGroup { name });
        }

        Ok(Self {
            name,
            rank,
            pattern,
            capture,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Applies the rule to the whole log; the first occurrence is used.
    ///
    /// A match ends the chain even when the trimmed token is empty.
    pub fn apply(&self, log: &str) -> Option<String> {
        let caps = self.pattern.captures(log)?;
        (self.capture)(&caps)
    }
}

impl std::fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionRule")
            .field("name", &self.name)
            .field("rank", &self.rank)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// The token in capture group 1, trimmed.
pub fn first_group_trimmed(caps: &Captures) -> Option<String> {
    caps.get(1).map(|m| m.as_str().trim().to_string())
}

/// Built-in rules in priority order: (name, pattern).
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("display-name", r#""displayName":"[^"]*version:\s*([^"]+)""#),
    ("build-number", r"Build\.Number[=:]?\s*(\d+\.\d+)"),
    ("revision", r"REVISION[=:]?\s*(\d+\.\d+)"),
];

/// A version token together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: String,
    pub version: String,
}

/// Rules sorted by rank; evaluation stops at the first match.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<ExtractionRule>,
}

impl RuleSet {
    pub fn with_defaults() -> Self {
        Self::from_specs(&[]).expect("built-in extraction rules are valid")
    }

    /// Built-in rules followed by `extra`, ranked in declaration order.
    pub fn from_specs(extra: &[RuleSpec]) -> Result<Self, RuleError> {
        let mut set = Self { rules: Vec::new() };
        for (name, pattern) in DEFAULT_RULES {
            set.push(name, pattern)?;
        }
        for spec in extra {
            set.push(&spec.name, &spec.pattern)?;
        }
        Ok(set)
    }

    fn push(&mut self, name: &str, pattern: &str) -> Result<(), RuleError> {
        if self.rules.iter().any(|r| r.name == name) {
            return Err(RuleError::DuplicateName(name.to_string()));
        }
        let rank = self.rules.len() + 1;
        self.rules
            .push(ExtractionRule::new(name, rank, pattern, first_group_trimmed)?);
        Ok(())
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn first_match(&self, log: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| {
            rule.apply(log).map(|version| RuleMatch {
                rule: rule.name.clone(),
                version,
            })
        })
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}
