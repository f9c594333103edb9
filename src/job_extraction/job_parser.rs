// src/job_extraction/job_parser.rs
use std::sync::Arc;
use tracing::{info, warn};

use super::model_extractor::parse_job_reply;
use super::types::{ExtractionError, JobUrl};
use super::{ExtractionMethod, JobDetails};
use crate::core::config_manager::ModelConfig;
use crate::core::llm_client::{CompletionModel, CompletionRequest};
use crate::utils::{is_blank, truncate_chars};

const SYSTEM_PROMPT: &str = "You are a job description parser. Extract structured information from job posting text. Return ONLY valid JSON with no additional text.";
const MAX_POSTING_CHARS: usize = 24_000;

fn user_prompt(text: &str) -> String {
    format!(
        "Extract all information from this job posting. Include title, company, location, description, requirements, qualifications, responsibilities, jobType, industry, experienceLevel, and benefits. Format as detailed JSON.\n\n{}",
        text
    )
}

/// Structures a job posting the user pasted as plain text
pub struct JobParser {
    model: Arc<dyn CompletionModel>,
    model_name: String,
    temperature: f32,
}

impl JobParser {
    pub fn new(model: Arc<dyn CompletionModel>, config: &ModelConfig) -> Self {
        Self {
            model,
            model_name: config.extraction_model.clone(),
            temperature: config.extraction_temperature,
        }
    }

    /// `url`, when given, is kept on the result (normalised if it is a job posting URL)
    pub async fn parse_text(&self, text: &str, url: Option<&str>) -> Result<JobDetails, ExtractionError> {
        if is_blank(Some(text)) {
            return Err(ExtractionError::MissingText);
        }

        let posting = truncate_chars(text.trim(), MAX_POSTING_CHARS);
        info!(chars = posting.chars().count(), "Parsing pasted job posting");

        let request = CompletionRequest::new(&self.model_name, SYSTEM_PROMPT, user_prompt(posting))
            .temperature(self.temperature)
            .json();
        let content = self.model.complete(&request).await?;

        let mut details = parse_job_reply(&content)?;
        if is_blank(details.title.as_deref()) && is_blank(details.description.as_deref()) {
            warn!("Parsed job posting has neither title nor description");
            return Err(ExtractionError::Parse(
                "reply has neither title nor description".to_string(),
            ));
        }

        details.url = url.map(source_url).unwrap_or_default();
        details.extraction_method = Some(ExtractionMethod::Text);
        Ok(details)
    }
}

fn source_url(url: &str) -> String {
    match JobUrl::parse(url) {
        Ok(job_url) => job_url.to_string(),
        Err(_) => url.trim().to_string(),
    }
}
