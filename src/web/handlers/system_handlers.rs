// src/web/handlers/system_handlers.rs

use crate::web::types::{AppState, DataResponse, HealthData};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn health_handler(state: &State<AppState>) -> Json<DataResponse<HealthData>> {
    let model_configured = state.generator.is_configured();
    if model_configured {
        info!("Health check");
    } else {
        warn!("Health check: OpenAI API key is not configured, extraction will use the page fallback");
    }

    Json(DataResponse::success(
        "OK".to_string(),
        HealthData {
            status: "ok".to_string(),
            model_configured,
            cached_jobs: state.extraction.cache().len(),
        },
        None,
    ))
}
