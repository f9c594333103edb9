// src/web/types.rs

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::core::error_classifier::{format_error_message, ErrorCategory, ErrorEnvelope, Severity};
use crate::generation::DocumentGenerator;
use crate::job_extraction::{JobDetails, JobExtractionService, JobParser};
use crate::profile_import::{ProfileExtractor, ProfileParser};
use crate::types::Profile;

/// Shared state handed to every handler
pub struct AppState {
    pub extraction: JobExtractionService,
    pub job_parser: JobParser,
    pub cv_parser: ProfileParser,
    pub profile_extractor: ProfileExtractor,
    pub generator: DocumentGenerator,
}

pub type ApiError = (Status, Json<StandardErrorResponse>);

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct JobExtractRequest {
    pub url: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct JobParseRequest {
    #[serde(alias = "jobText")]
    pub text: String,
    pub url: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CvParseRequest {
    #[serde(alias = "cvText")]
    pub text: String,
    #[serde(alias = "fileName")]
    pub file_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ProfileExtractRequest {
    pub url: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct GenerateRequest {
    #[serde(alias = "profileData")]
    pub profile: Profile,
    #[serde(alias = "jobData")]
    pub job: JobDetails,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct InvalidateRequest {
    pub key: Option<String>,
    pub prefix: Option<String>,
    pub url: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthData {
    pub status: String,
    pub model_configured: bool,
    pub cached_jobs: usize,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Action,
    Error,
}

// Request types with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
            conversation_id,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            severity: None,
            suggestions,
            conversation_id,
        }
    }

    /// Error body for a classified failure
    pub fn from_envelope(envelope: &ErrorEnvelope, conversation_id: Option<String>) -> Self {
        Self {
            severity: Some(envelope.severity),
            ..Self::new(
                format_error_message(envelope),
                envelope.category.code().to_string(),
                envelope.suggested_action.iter().cloned().collect(),
                conversation_id,
            )
        }
    }
}

/// HTTP status used when a classified failure reaches the client
pub fn status_for(category: ErrorCategory) -> Status {
    match category {
        ErrorCategory::Validation => Status::BadRequest,
        ErrorCategory::Authentication => Status::Unauthorized,
        ErrorCategory::Network | ErrorCategory::UpstreamApi => Status::BadGateway,
        ErrorCategory::General => Status::InternalServerError,
    }
}

pub fn api_error(envelope: &ErrorEnvelope, conversation_id: Option<String>) -> ApiError {
    (
        status_for(envelope.category),
        Json(StandardErrorResponse::from_envelope(envelope, conversation_id)),
    )
}
