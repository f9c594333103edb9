// src/generation/mod.rs
//! Tailored CV and cover letter generation

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod prompts;

use crate::core::config_manager::ModelConfig;
use crate::core::error_classifier::Failure;
use crate::core::llm_client::{CompletionModel, CompletionRequest, LlmError};
use crate::job_extraction::JobDetails;
use crate::types::{FitAnalysis, GeneratedDocuments, Profile};
use crate::utils::{is_blank, strip_code_fence};

const ANALYSIS_TEMPERATURE: f32 = 0.3;
const WRITING_TEMPERATURE: f32 = 0.7;
const CV_MAX_TOKENS: u32 = 1500;
const COVER_LETTER_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("Failed to parse OpenAI fit analysis: {0}")]
    Analysis(String),
}

impl GenerationError {
    pub fn to_failure(&self) -> Failure {
        match self {
            GenerationError::Validation(message) => Failure::Http {
                status: 400,
                message: Some(message.clone()),
            },
            GenerationError::Model(inner) => inner.to_failure(),
            other => Failure::Message(other.to_string()),
        }
    }
}

pub struct DocumentGenerator {
    model: Arc<dyn CompletionModel>,
    analysis_model: String,
    generation_model: String,
}

impl DocumentGenerator {
    pub fn new(model: Arc<dyn CompletionModel>, config: &ModelConfig) -> Self {
        Self {
            model,
            analysis_model: config.analysis_model.clone(),
            generation_model: config.generation_model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_configured()
    }

    /// Analyse the fit, then write the CV and the cover letter from that analysis
    pub async fn generate(&self, profile: &Profile, job: &JobDetails) -> Result<GeneratedDocuments, GenerationError> {
        validate(profile, job)?;

        info!(
            "Generating documents for {} / {}",
            profile.name.trim(),
            job.title.as_deref().unwrap_or("untitled job")
        );

        let analysis = self.analyze(profile, job).await?;

        let cv_request = CompletionRequest::new(
            &self.generation_model,
            prompts::CV_SYSTEM,
            prompts::cv_prompt(profile, job, &analysis),
        )
        .temperature(WRITING_TEMPERATURE)
        .max_tokens(CV_MAX_TOKENS);
        let cv = self.model.complete(&cv_request).await?;

        let letter_request = CompletionRequest::new(
            &self.generation_model,
            prompts::COVER_LETTER_SYSTEM,
            prompts::cover_letter_prompt(profile, job, &analysis),
        )
        .temperature(WRITING_TEMPERATURE)
        .max_tokens(COVER_LETTER_MAX_TOKENS);
        let cover_letter = self.model.complete(&letter_request).await?;

        info!(
            cv_chars = cv.len(),
            cover_letter_chars = cover_letter.len(),
            "Documents generated"
        );

        Ok(GeneratedDocuments {
            cv: cv.trim().to_string(),
            cover_letter: cover_letter.trim().to_string(),
            analysis,
        })
    }

    async fn analyze(&self, profile: &Profile, job: &JobDetails) -> Result<FitAnalysis, GenerationError> {
        let request = CompletionRequest::new(
            &self.analysis_model,
            prompts::ANALYSIS_SYSTEM,
            prompts::analysis_prompt(profile, job),
        )
        .temperature(ANALYSIS_TEMPERATURE)
        .json();

        let content = self.model.complete(&request).await?;
        serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
            warn!("Fit analysis is not valid JSON: {}", e);
            GenerationError::Analysis(e.to_string())
        })
    }
}

fn validate(profile: &Profile, job: &JobDetails) -> Result<(), GenerationError> {
    if !profile.has_name() {
        return Err(GenerationError::Validation(
            "Profile name is required".to_string(),
        ));
    }
    if is_blank(job.title.as_deref()) && is_blank(job.description.as_deref()) {
        return Err(GenerationError::Validation(
            "Job title or description is required".to_string(),
        ));
    }
    Ok(())
}
