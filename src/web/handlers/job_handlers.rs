// src/web/handlers/job_handlers.rs

use crate::core::error_classifier::classify;
use crate::job_extraction::JobDetails;
use crate::web::types::{
    api_error, ApiError, AppState, DataResponse, JobExtractRequest, JobParseRequest, StandardRequest,
    WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn extract_job_handler(
    request: Json<StandardRequest<JobExtractRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<JobDetails>>, ApiError> {
    let conversation_id = request.conversation_id();
    info!("Job extraction requested for {}", request.data.url);

    match state.extraction.extract(&request.data.url).await {
        Ok(details) => {
            let message = if details.extraction_error {
                "Could not extract the job details automatically. Please paste the job description manually.".to_string()
            } else {
                format!(
                    "Extracted job: {} at {}",
                    details.title.as_deref().unwrap_or("Untitled"),
                    details.company.as_deref().unwrap_or("unknown company")
                )
            };
            Ok(Json(DataResponse::success(message, details, conversation_id)))
        }
        Err(e) => {
            let envelope = classify(&e.to_failure());
            warn!("Job extraction rejected: {}", envelope);
            Err(api_error(&envelope, conversation_id))
        }
    }
}

pub async fn parse_job_handler(
    request: Json<StandardRequest<JobParseRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<JobDetails>>, ApiError> {
    let conversation_id = request.conversation_id();
    let data = &request.data;

    match state.job_parser.parse_text(&data.text, data.url.as_deref()).await {
        Ok(details) => {
            let message = format!(
                "Parsed job: {}",
                details.title.as_deref().unwrap_or("Untitled")
            );
            Ok(Json(DataResponse::success(message, details, conversation_id)))
        }
        Err(e) => {
            let envelope = classify(&e.to_failure());
            warn!("Job text parsing failed: {}", e);
            Err(api_error(&envelope, conversation_id))
        }
    }
}
