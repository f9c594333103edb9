// src/profile_import/linkedin_profile.rs
use std::sync::Arc;
use tracing::{info, warn};

use super::{ProfileError, ProfileUrl};
use crate::core::config_manager::ModelConfig;
use crate::core::llm_client::{CompletionModel, CompletionRequest, LlmError};
use crate::types::Profile;
use crate::utils::strip_code_fence;

const SYSTEM_PROMPT: &str = "You are a LinkedIn profile parser. Extract structured information from a LinkedIn profile URL. Return ONLY valid JSON with no additional text.";

fn user_prompt(url: &ProfileUrl) -> String {
    format!(
        "Extract all professional information from this LinkedIn profile: {}. Include name, headline, about/summary, all experience entries (with company, title, dates, description), education, skills, certifications, and any other relevant professional information. Format as detailed JSON.",
        url
    )
}

/// Profile import from a LinkedIn profile URL.
///
/// Once the URL is valid and a model is configured this never fails: an API error or an
/// unreadable reply degrades to a flagged stand-in asking the user to type the profile in.
pub struct ProfileExtractor {
    model: Arc<dyn CompletionModel>,
    model_name: String,
    temperature: f32,
}

impl ProfileExtractor {
    pub fn new(model: Arc<dyn CompletionModel>, config: &ModelConfig) -> Self {
        Self {
            model,
            model_name: config.extraction_model.clone(),
            temperature: config.extraction_temperature,
        }
    }

    pub async fn extract(&self, url: &str) -> Result<Profile, ProfileError> {
        let profile_url = ProfileUrl::parse(url)?;
        info!("Extracting LinkedIn profile from {}", profile_url);

        let request = CompletionRequest::new(&self.model_name, SYSTEM_PROMPT, user_prompt(&profile_url))
            .temperature(self.temperature)
            .json();

        let content = match self.model.complete(&request).await {
            Ok(content) => content,
            Err(LlmError::NotConfigured) => return Err(LlmError::NotConfigured.into()),
            Err(e) => {
                warn!("Profile extraction failed, returning placeholder: {}", e);
                return Ok(Profile::extraction_failed(profile_url.as_str()));
            }
        };

        match serde_json::from_str::<Profile>(strip_code_fence(&content)) {
            Ok(mut profile) => {
                profile.url = Some(profile_url.to_string());
                profile.extraction_error = false;
                info!("Extracted LinkedIn profile for {}", profile.name);
                Ok(profile)
            }
            Err(e) => {
                warn!("Profile reply is not valid JSON, returning placeholder: {}", e);
                Ok(Profile::unreadable(profile_url.as_str()))
            }
        }
    }
}
