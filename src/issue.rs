//! Issue types for findings reported by the remote checker.
//!
//! The wire payload (`{ matches: [...] }`) is decoded into crate-local
//! [`Issue`] values with validated offsets, so the rest of the crate never
//! sees the checker's raw shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patch::Span;

/// Top-level JSON payload returned by a check request.
#[derive(Debug, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

/// One raw match as the checker reports it.
///
/// Offsets and lengths are decoded as `i64` so malformed negative values can
/// be rejected explicitly instead of failing somewhere downstream.
#[derive(Debug, Deserialize)]
pub struct WireMatch {
    pub offset: i64,
    pub length: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rule: Option<WireRule>,
    #[serde(default)]
    pub replacements: Vec<WireReplacement>,
}

#[derive(Debug, Deserialize)]
pub struct WireRule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireReplacement {
    #[serde(default)]
    pub value: String,
}

#[derive(Error, Debug)]
pub enum IssueError {
    #[error("invalid issue: offset {offset} / length {length} must be non-negative")]
    InvalidIssue { offset: i64, length: i64 },
}

/// A single flagged span plus its suggested fixes.
///
/// The span is valid only against the exact buffer snapshot the check ran
/// on; any buffer mutation invalidates every issue derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Character offset of the flagged span
    pub offset: usize,
    /// Character length of the flagged span
    pub length: usize,
    /// Checker's explanation, display only
    pub message: String,
    /// Rule identifier, display only
    pub rule_id: Option<String>,
    /// Human-readable rule description, display only
    pub rule_label: Option<String>,
    /// Candidate replacements, best first
    pub replacements: Vec<String>,
}

impl Issue {
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.length)
    }

    /// The default suggestion: the first candidate, if any.
    ///
    /// An empty candidate is a deletion of the flagged span. Issues with no
    /// candidates at all carry no fix and are informational only.
    pub fn preferred_replacement(&self) -> Option<&str> {
        self.replacements.first().map(String::as_str)
    }

    /// One-line display label: rule description (falling back to rule id),
    /// plus the preferred suggestion when there is one.
    pub fn label(&self) -> String {
        let rule = self
            .rule_label
            .as_deref()
            .or(self.rule_id.as_deref())
            .unwrap_or("Issue");
        match self.preferred_replacement() {
            Some("") => format!("{rule} (remove)"),
            Some(replacement) => format!("{rule} (try \"{replacement}\")"),
            None => rule.to_string(),
        }
    }
}

impl TryFrom<WireMatch> for Issue {
    type Error = IssueError;

    fn try_from(raw: WireMatch) -> Result<Self, Self::Error> {
        if raw.offset < 0 || raw.length < 0 {
            return Err(IssueError::InvalidIssue {
                offset: raw.offset,
                length: raw.length,
            });
        }

        let (rule_id, rule_label) = match raw.rule {
            Some(rule) => (rule.id, rule.description),
            None => (None, None),
        };

        Ok(Issue {
            offset: raw.offset as usize,
            length: raw.length as usize,
            message: raw.message,
            rule_id,
            rule_label,
            replacements: raw
                .replacements
                .into_iter()
                .map(|replacement| replacement.value)
                .collect(),
        })
    }
}

impl CheckResponse {
    /// Convert every raw match into a validated [`Issue`], failing fast on
    /// the first malformed one.
    pub fn into_issues(self) -> Result<Vec<Issue>, IssueError> {
        self.matches.into_iter().map(Issue::try_from).collect()
    }
}
