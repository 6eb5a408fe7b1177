//! Async client for a LanguageTool-style checking endpoint.
//!
//! One request per check: the text and language are POSTed form-encoded,
//! the JSON payload is decoded into [`Issue`]s, and the resulting
//! [`CheckReport`] is stamped with the fingerprint of the text that was
//! checked. Staleness is the caller's concern and is enforced by
//! [`EditorSession::ingest`](crate::session::EditorSession::ingest); the
//! client carries no retry or queueing logic.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::config::CheckerConfig;
use crate::issue::{CheckResponse, IssueError};
use crate::session::CheckReport;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("checker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("checker returned HTTP {status}")]
    Status { status: StatusCode },

    #[error("malformed checker payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Issue(#[from] IssueError),
}

/// HTTP client for the remote checker.
pub struct CheckerClient {
    http: reqwest::Client,
    endpoint: String,
    language: String,
}

impl CheckerClient {
    pub fn new(config: &CheckerConfig) -> Result<Self, CheckError> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
        })
    }

    /// Run one check over `text`.
    ///
    /// The returned report is fingerprinted against `text` exactly as
    /// passed; apply it to the same buffer or not at all.
    pub async fn check(&self, text: &str) -> Result<CheckReport, CheckError> {
        debug!(
            endpoint = %self.endpoint,
            chars = text.chars().count(),
            "requesting check"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Status { status });
        }

        let body = response.text().await?;
        let payload: CheckResponse = serde_json::from_str(&body)?;
        let issues = payload.into_issues()?;
        debug!(issues = issues.len(), "check complete");

        Ok(CheckReport::new(text, issues))
    }
}
