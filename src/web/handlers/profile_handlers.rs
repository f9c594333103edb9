// src/web/handlers/profile_handlers.rs

use crate::core::error_classifier::classify;
use crate::types::Profile;
use crate::web::types::{
    api_error, ApiError, AppState, CvParseRequest, DataResponse, ProfileExtractRequest, StandardRequest,
    WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn parse_cv_handler(
    request: Json<StandardRequest<CvParseRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    let conversation_id = request.conversation_id();
    let data = &request.data;
    info!(
        "CV parsing requested ({})",
        data.file_name.as_deref().unwrap_or("pasted text")
    );

    match state.cv_parser.parse_cv_text(&data.text, data.file_name.as_deref()).await {
        Ok(profile) => Ok(Json(DataResponse::success(
            format!("Parsed CV for {}", profile.name),
            profile,
            conversation_id,
        ))),
        Err(e) => {
            warn!("CV parsing failed: {}", e);
            Err(api_error(&classify(&e.to_failure()), conversation_id))
        }
    }
}

pub async fn extract_profile_handler(
    request: Json<StandardRequest<ProfileExtractRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    let conversation_id = request.conversation_id();

    match state.profile_extractor.extract(&request.data.url).await {
        Ok(profile) => {
            let message = if profile.extraction_error {
                "Could not extract the profile automatically. Please enter your profile information manually.".to_string()
            } else {
                format!("Extracted profile: {}", profile.name)
            };
            Ok(Json(DataResponse::success(message, profile, conversation_id)))
        }
        Err(e) => {
            warn!("Profile extraction rejected: {}", e);
            Err(api_error(&classify(&e.to_failure()), conversation_id))
        }
    }
}
