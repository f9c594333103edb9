// src/profile_import/cv_parser.rs
use std::sync::Arc;
use tracing::{info, warn};

use super::ProfileError;
use crate::core::config_manager::ModelConfig;
use crate::core::llm_client::{CompletionModel, CompletionRequest};
use crate::types::Profile;
use crate::utils::{is_blank, strip_code_fence, truncate_chars};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that specializes in parsing CV/resume information into structured data.";
const TEMPERATURE: f32 = 0.3;
const MAX_CV_CHARS: usize = 30_000;

fn cv_prompt(cv_text: &str) -> String {
    format!(
        r#"Extract structured information from this CV text. Return a JSON object with the following format:
{{
  "name": "Full name",
  "email": "Email address",
  "phone": "Phone number",
  "location": "City, Country",
  "summary": "Professional summary",
  "experience": [
    {{
      "title": "Job title",
      "company": "Company name",
      "location": "Work location",
      "startDate": "Start date (MM/YYYY)",
      "endDate": "End date (MM/YYYY) or 'Present'",
      "description": "Job description"
    }}
  ],
  "education": [
    {{
      "institution": "School/University name",
      "degree": "Degree type",
      "field": "Field of study",
      "startDate": "Start date (YYYY)",
      "endDate": "End date (YYYY)"
    }}
  ],
  "skills": ["Skill 1", "Skill 2"],
  "languages": ["Language 1", "Language 2"],
  "certifications": [
    {{
      "name": "Certification name",
      "issuer": "Issuing organization",
      "date": "Issue date (MM/YYYY)"
    }}
  ]
}}

Only include fields if they are present in the CV. Here is the CV text:

{}"#,
        cv_text
    )
}

/// Turns the text of an uploaded CV into a [`Profile`]
pub struct ProfileParser {
    model: Arc<dyn CompletionModel>,
    model_name: String,
}

impl ProfileParser {
    pub fn new(model: Arc<dyn CompletionModel>, config: &ModelConfig) -> Self {
        Self {
            model,
            model_name: config.analysis_model.clone(),
        }
    }

    /// `source` (usually the uploaded file name) is recorded as the profile's origin
    pub async fn parse_cv_text(&self, cv_text: &str, source: Option<&str>) -> Result<Profile, ProfileError> {
        if is_blank(Some(cv_text)) {
            return Err(ProfileError::Validation("CV text is required".to_string()));
        }

        let cv_text = truncate_chars(cv_text.trim(), MAX_CV_CHARS);
        info!(chars = cv_text.chars().count(), source = source.unwrap_or(""), "Parsing CV text");

        let request = CompletionRequest::new(&self.model_name, SYSTEM_PROMPT, cv_prompt(cv_text))
            .temperature(TEMPERATURE)
            .json();
        let content = self.model.complete(&request).await?;

        let mut profile: Profile = serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
            warn!(reply = truncate_chars(content.trim(), 200), "CV reply is not profile JSON: {}", e);
            ProfileError::Parse(e.to_string())
        })?;

        if let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) {
            profile.url = Some(source.to_string());
        }
        profile.extraction_error = false;

        info!(
            experience = profile.experience.len(),
            skills = profile.skills.len(),
            "Parsed CV for {}",
            profile.name
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm_client::LlmError;
    use crate::test_support::MockCompletionModel;
    use serde_json::json;

    fn parser(model: Arc<MockCompletionModel>) -> ProfileParser {
        ProfileParser::new(model, &ModelConfig::default())
    }

    #[tokio::test]
    async fn test_parse_cv_text() {
        let reply = json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "skills": ["Mathematics", "Analysis"],
            "experience": [{"title": "Analyst", "company": "Analytical Engine", "startDate": "01/1842"}]
        });
        let model = Arc::new(MockCompletionModel::with_replies([Ok(reply.to_string())]));

        let profile = parser(model.clone())
            .parse_cv_text("Ada Lovelace\nAnalyst ...", Some("ada-cv.pdf"))
            .await
            .unwrap();

        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.experience[0].company, "Analytical Engine");
        assert_eq!(profile.url.as_deref(), Some("ada-cv.pdf"));

        let requests = model.requests();
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert!(requests[0].json_response);
        assert!((requests[0].temperature - 0.3).abs() < f32::EPSILON);
        assert!(requests[0].user.ends_with("Ada Lovelace\nAnalyst ..."));
    }

    #[tokio::test]
    async fn test_blank_cv_is_rejected() {
        let model = Arc::new(MockCompletionModel::with_replies([]));

        let err = parser(model.clone()).parse_cv_text("   ", None).await.unwrap_err();

        assert!(matches!(err, ProfileError::Validation(_)));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bad_reply_is_an_error() {
        let model = Arc::new(MockCompletionModel::with_replies([
            Ok("I could not read that".to_string()),
            Err(LlmError::NotConfigured),
        ]));
        let parser = parser(model);

        assert!(matches!(
            parser.parse_cv_text("cv", None).await,
            Err(ProfileError::Parse(_))
        ));
        assert!(matches!(
            parser.parse_cv_text("cv", None).await,
            Err(ProfileError::Model(LlmError::NotConfigured))
        ));
    }
}
