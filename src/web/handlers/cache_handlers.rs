// src/web/handlers/cache_handlers.rs

use crate::core::cache::CacheStats;
use crate::core::error_classifier::{classify, Failure};
use crate::web::types::{
    api_error, ActionResponse, ApiError, AppState, DataResponse, InvalidateRequest, StandardRequest,
    WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn cache_stats_handler(state: &State<AppState>) -> Json<DataResponse<CacheStats>> {
    let stats = state.extraction.cache().stats();
    Json(DataResponse::success(
        format!("{} cached entries ({} active)", stats.total, stats.active),
        stats,
        None,
    ))
}

pub async fn invalidate_cache_handler(
    request: Json<StandardRequest<InvalidateRequest>>,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let conversation_id = request.conversation_id();
    let cache = state.extraction.cache();

    let removed = match (&request.data.url, &request.data.key, &request.data.prefix) {
        (Some(url), _, _) => match state.extraction.invalidate(url) {
            Ok(existed) => usize::from(existed),
            Err(e) => return Err(api_error(&classify(&e.to_failure()), conversation_id)),
        },
        (None, Some(key), _) => usize::from(cache.invalidate(key)),
        (None, None, Some(prefix)) => cache.invalidate_prefix(prefix),
        (None, None, None) => {
            let failure = Failure::Http {
                status: 400,
                message: Some("Provide one of url, key or prefix".to_string()),
            };
            return Err(api_error(&classify(&failure), conversation_id));
        }
    };

    info!(removed, "Cache invalidation requested");
    Ok(Json(
        ActionResponse::success(
            format!("Removed {} cache entries", removed),
            "cache_invalidated".to_string(),
            conversation_id,
        )
        .with_next_actions(vec!["Extract the job again to refresh it".to_string()]),
    ))
}
