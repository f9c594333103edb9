// src/profile_import/mod.rs
//! Building a [`Profile`](crate::types::Profile) from an uploaded CV or a LinkedIn profile URL

use std::fmt;
use thiserror::Error;
use url::Url;

pub mod cv_parser;
pub mod linkedin_profile;

pub use cv_parser::ProfileParser;
pub use linkedin_profile::ProfileExtractor;

use crate::core::error_classifier::Failure;
use crate::core::llm_client::LlmError;
use crate::job_extraction::types::normalise_linkedin_url;

const PROFILE_PATH_PREFIX: &str = "/in/";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid LinkedIn profile URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("Failed to parse CV data from OpenAI: {0}")]
    Parse(String),
}

impl ProfileError {
    pub fn to_failure(&self) -> Failure {
        match self {
            ProfileError::Validation(_) | ProfileError::InvalidUrl(_) => Failure::Http {
                status: 400,
                message: Some(self.to_string()),
            },
            ProfileError::Model(inner) => inner.to_failure(),
            ProfileError::Parse(_) => Failure::Message(self.to_string()),
        }
    }
}

/// A normalised `linkedin.com/in/...` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrl(Url);

impl ProfileUrl {
    pub fn parse(input: &str) -> Result<Self, ProfileError> {
        normalise_linkedin_url(input, PROFILE_PATH_PREFIX, "LinkedIn profile")
            .map(Self)
            .map_err(ProfileError::InvalidUrl)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProfileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
