// src/web/handlers/generation_handlers.rs

use crate::core::error_classifier::classify;
use crate::types::GeneratedDocuments;
use crate::web::types::{
    api_error, ApiError, AppState, DataResponse, GenerateRequest, StandardRequest, WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn generate_documents_handler(
    request: Json<StandardRequest<GenerateRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<GeneratedDocuments>>, ApiError> {
    let conversation_id = request.conversation_id();
    let GenerateRequest { profile, job } = &request.data;

    info!("Document generation requested for {}", profile.name);

    match state.generator.generate(profile, job).await {
        Ok(documents) => Ok(Json(DataResponse::success(
            "CV and cover letter generated".to_string(),
            documents,
            conversation_id,
        ))),
        Err(e) => {
            let envelope = classify(&e.to_failure());
            error!("Document generation failed: {}", e);
            Err(api_error(&envelope, conversation_id))
        }
    }
}
