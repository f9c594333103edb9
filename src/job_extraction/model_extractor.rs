// src/job_extraction/model_extractor.rs
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::types::{ExtractionError, JobUrl};
use super::{ExtractionMethod, JobDetails, JobExtractor};
use crate::core::config_manager::ModelConfig;
use crate::core::llm_client::{CompletionModel, CompletionRequest};
use crate::utils::{strip_code_fence, truncate_chars};

const SYSTEM_PROMPT: &str = "You are a job description parser. Extract structured information from a LinkedIn job URL. Return ONLY valid JSON with no additional text.";

fn user_prompt(url: &JobUrl) -> String {
    format!(
        "Extract all information from this LinkedIn job posting: {}. Include title, company, location, description, requirements, qualifications, responsibilities, jobType, industry, experienceLevel, and benefits. Format as detailed JSON.",
        url
    )
}

/// Primary extractor: asks the model to return the posting's fields as JSON
pub struct ModelExtractor {
    model: Arc<dyn CompletionModel>,
    model_name: String,
    temperature: f32,
}

impl ModelExtractor {
    pub fn new(model: Arc<dyn CompletionModel>, config: &ModelConfig) -> Self {
        Self {
            model,
            model_name: config.extraction_model.clone(),
            temperature: config.extraction_temperature,
        }
    }

    fn request_for(&self, url: &JobUrl) -> CompletionRequest {
        CompletionRequest::new(&self.model_name, SYSTEM_PROMPT, user_prompt(url))
            .temperature(self.temperature)
            .json()
    }
}

#[async_trait]
impl JobExtractor for ModelExtractor {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn extract(&self, url: &JobUrl) -> Result<JobDetails, ExtractionError> {
        info!("Requesting model extraction for {}", url);

        let content = self.model.complete(&self.request_for(url)).await?;
        let details = parse_job_json(&content, url)?;

        info!(
            title = details.title.as_deref().unwrap_or(""),
            "Model extraction returned {} requirements",
            details.requirements.len()
        );
        Ok(details)
    }
}

/// Parse a model reply into [`JobDetails`] for `url`
pub fn parse_job_json(content: &str, url: &JobUrl) -> Result<JobDetails, ExtractionError> {
    let mut details = parse_job_reply(content)?;
    details.url = url.to_string();
    details.extraction_method = Some(ExtractionMethod::Model);
    Ok(details)
}

pub(crate) fn parse_job_reply(content: &str) -> Result<JobDetails, ExtractionError> {
    let mut details: JobDetails = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        warn!(
            reply = truncate_chars(content.trim(), 200),
            "Model reply is not job JSON: {}",
            e
        );
        ExtractionError::Parse(e.to_string())
    })?;

    details.extraction_error = false;
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm_client::LlmError;
    use crate::test_support::MockCompletionModel;
    use serde_json::json;

    fn job_url() -> JobUrl {
        JobUrl::parse("https://www.linkedin.com/jobs/view/987").unwrap()
    }

    #[tokio::test]
    async fn test_sends_json_request_and_stamps_url() {
        let reply = json!({
            "title": "Platform Engineer",
            "company": "Globex",
            "description": "Run the Kubernetes fleet",
            "requirements": ["Rust", "Kubernetes"],
            "url": "https://example.com/other"
        });
        let model = Arc::new(MockCompletionModel::with_replies([Ok(reply.to_string())]));
        let extractor = ModelExtractor::new(model.clone(), &ModelConfig::default());

        let details = extractor.extract(&job_url()).await.unwrap();

        assert_eq!(details.url, "https://www.linkedin.com/jobs/view/987");
        assert_eq!(details.requirements, vec!["Rust", "Kubernetes"]);
        assert_eq!(details.extraction_method, Some(ExtractionMethod::Model));

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_response);
        assert_eq!(requests[0].model, "gpt-4o");
        assert!((requests[0].temperature - 0.2).abs() < f32::EPSILON);
        assert!(requests[0].user.contains("/jobs/view/987"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let model = Arc::new(MockCompletionModel::with_replies([Ok("Sorry, I cannot browse".to_string())]));
        let extractor = ModelExtractor::new(model, &ModelConfig::default());

        assert!(matches!(
            extractor.extract(&job_url()).await,
            Err(ExtractionError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let model = Arc::new(MockCompletionModel::with_replies([Err(LlmError::Api {
            status: 429,
            message: "quota".to_string(),
        })]));
        let extractor = ModelExtractor::new(model, &ModelConfig::default());

        assert!(matches!(
            extractor.extract(&job_url()).await,
            Err(ExtractionError::Model(LlmError::Api { status: 429, .. }))
        ));
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let details = parse_job_json("```json\n{\"title\": \"QA Lead\"}\n```", &job_url()).unwrap();
        assert_eq!(details.title.as_deref(), Some("QA Lead"));
    }
}
