//! Editor session: single owner of the buffer and the current check report.
//!
//! A report is tied to the exact buffer snapshot it was computed from by an
//! xxh3 fingerprint. Ingestion compares fingerprints by value, so a check
//! result that arrives after the buffer moved on can never be installed, no
//! matter how tasks interleave. Every mutation path drops the report:
//! issues are never carried across a buffer change.

use std::fmt;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::issue::Issue;
use crate::patch::{self, PatchError};

/// Identity of a buffer snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        Fingerprint(xxh3_64(text.as_bytes()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The outcome of one check invocation against one buffer snapshot.
#[derive(Debug, Clone)]
pub struct CheckReport {
    fingerprint: Fingerprint,
    issues: Vec<Issue>,
}

impl CheckReport {
    /// Build a report for `checked_text`, the exact text the issues were
    /// computed against.
    pub fn new(checked_text: &str, issues: Vec<Issue>) -> Self {
        Self {
            fingerprint: Fingerprint::of(checked_text),
            issues,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("check report is stale: computed against {report}, buffer is {buffer}")]
    StaleReport {
        report: Fingerprint,
        buffer: Fingerprint,
    },

    #[error("no check report has been ingested for the current buffer")]
    NoReport,

    #[error("no issue with index {0} in the current report")]
    UnknownIssue(usize),

    #[error("issue {index} has no replacement candidate {candidate}")]
    NoReplacement { index: usize, candidate: usize },

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Owns the text buffer and the issues currently known against it.
#[derive(Debug, Default)]
pub struct EditorSession {
    buffer: String,
    report: Option<CheckReport>,
}

impl EditorSession {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            buffer: text.into(),
            report: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.buffer)
    }

    /// Issues of the current report, empty when no report is installed.
    pub fn issues(&self) -> &[Issue] {
        self.report
            .as_ref()
            .map(CheckReport::issues)
            .unwrap_or_default()
    }

    pub fn has_report(&self) -> bool {
        self.report.is_some()
    }

    /// Direct edit: replace the whole buffer. Drops the report.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.report = None;
    }

    /// Empty the buffer. Drops the report.
    pub fn clear(&mut self) {
        self.replace_text(String::new());
    }

    /// Install a check report, iff it was computed against the current
    /// buffer. Returns the number of issues installed.
    pub fn ingest(&mut self, report: CheckReport) -> Result<usize, SessionError> {
        let buffer = self.fingerprint();
        if report.fingerprint() != buffer {
            return Err(SessionError::StaleReport {
                report: report.fingerprint(),
                buffer,
            });
        }
        let count = report.issues.len();
        self.report = Some(report);
        Ok(count)
    }

    /// Apply the preferred replacement of issue `index`.
    pub fn apply_one(&mut self, index: usize) -> Result<(), SessionError> {
        self.apply_with(index, 0)
    }

    /// Apply replacement candidate `candidate` of issue `index`.
    ///
    /// On success the buffer changes, so the report is dropped; the caller
    /// re-checks to get fresh issues. On failure the buffer and report are
    /// left as they were.
    pub fn apply_with(&mut self, index: usize, candidate: usize) -> Result<(), SessionError> {
        let report = self.report.as_ref().ok_or(SessionError::NoReport)?;
        let issue = report
            .issues
            .get(index)
            .ok_or(SessionError::UnknownIssue(index))?;
        let replacement = issue
            .replacements
            .get(candidate)
            .ok_or(SessionError::NoReplacement { index, candidate })?;

        self.buffer = patch::apply_single(&self.buffer, issue.span(), replacement)?;
        self.report = None;
        Ok(())
    }

    /// Apply every issue that carries a replacement candidate, in one batch.
    ///
    /// Returns the number of replacements applied. The report is dropped
    /// only when the buffer actually changed.
    pub fn apply_all(&mut self) -> Result<usize, SessionError> {
        let report = self.report.as_ref().ok_or(SessionError::NoReport)?;
        let outcome = patch::apply_batch(&self.buffer, report.issues())?;
        if outcome.applied > 0 {
            self.buffer = outcome.text;
            self.report = None;
        }
        Ok(outcome.applied)
    }
}
