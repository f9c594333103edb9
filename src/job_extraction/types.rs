// src/job_extraction/types.rs
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::core::error_classifier::Failure;
use crate::core::llm_client::LlmError;

const ALLOWED_HOST: &str = "linkedin.com";
const JOBS_PATH_PREFIX: &str = "/jobs/";
const TRACKING_PARAMS: &[&str] = &["trk", "refId", "trackingId"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid job URL: {0}")]
    InvalidUrl(String),

    #[error("Job posting text is required")]
    MissingText,

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("Model response is not valid job JSON: {0}")]
    Parse(String),

    #[error("Job page returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("Failed to fetch job page: {0}")]
    Transport(String),

    #[error("Page session error: {0}")]
    Browser(String),

    #[error("Page {stage} timed out after {seconds}s")]
    Timeout { stage: &'static str, seconds: u64 },

    #[error("Failed to extract job content from page")]
    NoContent,
}

impl ExtractionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ExtractionError::InvalidUrl(_) | ExtractionError::MissingText)
    }

    /// Tagged failure for the classifier
    pub fn to_failure(&self) -> Failure {
        match self {
            ExtractionError::InvalidUrl(message) => Failure::Http {
                status: 400,
                message: Some(message.clone()),
            },
            ExtractionError::MissingText => Failure::Http {
                status: 400,
                message: Some(self.to_string()),
            },
            ExtractionError::Model(inner) => inner.to_failure(),
            ExtractionError::Upstream { status } => Failure::Http {
                status: *status,
                message: None,
            },
            ExtractionError::Transport(message) => Failure::Transport {
                message: message.clone(),
            },
            other => Failure::Message(other.to_string()),
        }
    }
}

/// A validated, normalised job posting URL.
///
/// Only `http`/`https` URLs on `linkedin.com` (or a subdomain) under `/jobs/` are accepted.
/// A missing scheme defaults to `https`. The fragment and tracking query parameters are dropped
/// so that the same posting always maps to the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobUrl(Url);

impl JobUrl {
    pub fn parse(input: &str) -> Result<Self, ExtractionError> {
        normalise_linkedin_url(input, JOBS_PATH_PREFIX, "job posting")
            .map(Self)
            .map_err(ExtractionError::InvalidUrl)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a LinkedIn URL whose path starts with `path_prefix`, then drop the fragment
/// and tracking parameters. The error is a user-facing reason.
pub(crate) fn normalise_linkedin_url(input: &str, path_prefix: &str, kind: &str) -> Result<Url, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("a {} URL is required", kind));
    }

    // Only a scheme at the very start counts; a URL inside the query must not.
    let parsed = match Url::parse(trimmed) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", trimmed)),
        other => other,
    };
    let mut url = parsed.map_err(|e| format!("'{}' is not a valid URL ({})", trimmed, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host_allowed = host == ALLOWED_HOST || host.ends_with(&format!(".{}", ALLOWED_HOST));
    if !host_allowed || !url.path().starts_with(path_prefix) {
        return Err(format!(
            "'{}' is not a {} URL (expected {}{}...)",
            trimmed, kind, ALLOWED_HOST, path_prefix
        ));
    }

    url.set_fragment(None);
    strip_tracking_params(&mut url);
    Ok(url)
}

fn is_tracking_param(name: &str) -> bool {
    TRACKING_PARAMS.contains(&name) || name.starts_with("utm_")
}

fn strip_tracking_params(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}
