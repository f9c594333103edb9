// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::core::cache::{CacheStats, TtlCache};
use crate::core::config_manager::ConfigManager;
use crate::core::llm_client::{CompletionModel, OpenAiClient};
use crate::generation::DocumentGenerator;
use crate::job_extraction::{JobDetails, JobExtractionService, JobParser};
use crate::profile_import::{ProfileExtractor, ProfileParser};
use crate::types::{GeneratedDocuments, Profile};
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "POST, GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/job/extract", data = "<request>")]
pub async fn extract_job(
    request: Json<StandardRequest<JobExtractRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<JobDetails>>, ApiError> {
    handlers::extract_job_handler(request, state).await
}

#[post("/job/parse", data = "<request>")]
pub async fn parse_job(
    request: Json<StandardRequest<JobParseRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<JobDetails>>, ApiError> {
    handlers::parse_job_handler(request, state).await
}

#[post("/profile/parse", data = "<request>")]
pub async fn parse_cv(
    request: Json<StandardRequest<CvParseRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    handlers::parse_cv_handler(request, state).await
}

#[post("/profile/extract", data = "<request>")]
pub async fn extract_profile(
    request: Json<StandardRequest<ProfileExtractRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Profile>>, ApiError> {
    handlers::extract_profile_handler(request, state).await
}

#[post("/generate", data = "<request>")]
pub async fn generate_documents(
    request: Json<StandardRequest<GenerateRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<GeneratedDocuments>>, ApiError> {
    handlers::generate_documents_handler(request, state).await
}

#[get("/cache/stats")]
pub async fn cache_stats(state: &State<AppState>) -> Json<DataResponse<CacheStats>> {
    handlers::cache_stats_handler(state).await
}

#[post("/cache/invalidate", data = "<request>")]
pub async fn invalidate_cache(
    request: Json<StandardRequest<InvalidateRequest>>,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::invalidate_cache_handler(request, state).await
}

#[get("/health")]
pub async fn health(state: &State<AppState>) -> Json<DataResponse<HealthData>> {
    handlers::health_handler(state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "API route not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path and method".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "VALIDATION_ERROR".to_string(),
        vec!["Verify all required fields are present and correctly typed".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Wire services from configuration: one OpenAI client and one job cache for the whole process
pub fn build_state(config: &ConfigManager) -> Result<AppState> {
    let model: Arc<dyn CompletionModel> =
        Arc::new(OpenAiClient::new(&config.model).context("Failed to create model client")?);
    let cache = Arc::new(TtlCache::<JobDetails>::new());

    let extraction = JobExtractionService::from_config(config, model.clone(), cache)?;

    Ok(AppState {
        extraction,
        job_parser: JobParser::new(model.clone(), &config.model),
        cv_parser: ProfileParser::new(model.clone(), &config.model),
        profile_extractor: ProfileExtractor::new(model.clone(), &config.model),
        generator: DocumentGenerator::new(model, &config.model),
    })
}

pub fn build_rocket(figment: Figment, state: AppState) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                extract_job,
                parse_job,
                parse_cv,
                extract_profile,
                generate_documents,
                cache_stats,
                invalidate_cache,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let state = build_state(&config)?;

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    info!("Starting cvtailor API server");
    info!("Server: http://{}:{}", config.server.address, config.server.port);
    info!("Job cache TTL: {}s", config.cache.job_ttl_secs);

    let _rocket = build_rocket(figment, state)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_manager::ModelConfig;
    use crate::core::llm_client::LlmError;
    use crate::job_extraction::JobExtractor;
    use crate::test_support::{sample_job, MockCompletionModel, MockExtractor};
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};

    async fn client(primary: MockExtractor, fallback: MockExtractor, model: MockCompletionModel) -> Client {
        let primary: Arc<dyn JobExtractor> = Arc::new(primary);
        let fallback: Arc<dyn JobExtractor> = Arc::new(fallback);
        let model = Arc::new(model);
        let config = ModelConfig::default();
        let state = AppState {
            extraction: JobExtractionService::new(primary, fallback, Arc::new(TtlCache::new())),
            job_parser: JobParser::new(model.clone(), &config),
            cv_parser: ProfileParser::new(model.clone(), &config),
            profile_extractor: ProfileExtractor::new(model.clone(), &config),
            generator: DocumentGenerator::new(model, &config),
        };

        Client::tracked(build_rocket(rocket::Config::figment(), state))
            .await
            .unwrap()
    }

    async fn default_client() -> Client {
        client(
            MockExtractor::succeeding(sample_job()),
            MockExtractor::failing("unused"),
            MockCompletionModel::with_replies([]),
        )
        .await
    }

    async fn json_body(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
        let text = response.into_string().await.unwrap_or_default();
        serde_json::from_str(&text).unwrap()
    }

    #[rocket::async_test]
    async fn test_extract_returns_job_details() {
        let client = default_client().await;

        let response = client
            .post("/api/job/extract")
            .header(ContentType::JSON)
            .body(json!({"url": "https://www.linkedin.com/jobs/view/77?trk=x", "conversation_id": "c-1"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        assert!(response.headers().get_one("Access-Control-Allow-Origin").is_some());

        let body = json_body(response).await;
        assert_eq!(body["type"], "data");
        assert_eq!(body["conversation_id"], "c-1");
        assert_eq!(body["data"]["url"], "https://www.linkedin.com/jobs/view/77");
        assert_eq!(body["data"]["title"], "Senior Rust Engineer");
    }

    #[rocket::async_test]
    async fn test_extract_invalid_url_is_bad_request() {
        let client = default_client().await;

        let response = client
            .post("/api/job/extract")
            .header(ContentType::JSON)
            .body(json!({"url": "https://example.com/careers/1"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
        assert_eq!(body["severity"], "warning");
    }

    #[rocket::async_test]
    async fn test_extract_total_failure_is_placeholder_not_error() {
        let client = client(
            MockExtractor::failing("model down"),
            MockExtractor::failing("blocked"),
            MockCompletionModel::with_replies([]),
        )
        .await;

        let response = client
            .post("/api/job/extract")
            .header(ContentType::JSON)
            .body(json!({"url": "https://www.linkedin.com/jobs/view/78"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["title"], "Job Extraction Failed");
        assert_eq!(body["data"]["extractionError"], true);
    }

    #[rocket::async_test]
    async fn test_cache_stats_and_invalidation() {
        let client = default_client().await;
        let url = "https://www.linkedin.com/jobs/view/79";

        client
            .post("/api/job/extract")
            .header(ContentType::JSON)
            .body(json!({"url": url}).to_string())
            .dispatch()
            .await;

        let stats = json_body(client.get("/api/cache/stats").dispatch().await).await;
        assert_eq!(stats["data"]["active"], 1);

        let response = client
            .post("/api/cache/invalidate")
            .header(ContentType::JSON)
            .body(json!({"url": url}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json_body(response).await["message"], "Removed 1 cache entries");

        let response = client
            .post("/api/cache/invalidate")
            .header(ContentType::JSON)
            .body("{}")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn test_generate_documents() {
        let client = client(
            MockExtractor::failing("unused"),
            MockExtractor::failing("unused"),
            MockCompletionModel::with_replies([
                Ok(json!({"keySkills": ["Rust"]}).to_string()),
                Ok("CV text".to_string()),
                Ok("Letter text".to_string()),
            ]),
        )
        .await;

        let response = client
            .post("/api/generate")
            .header(ContentType::JSON)
            .body(
                json!({
                    "profileData": {"name": "Ada Lovelace", "skills": ["Rust"]},
                    "jobData": {"title": "Engineer", "description": "Build things"}
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["cv"], "CV text");
        assert_eq!(body["data"]["coverLetter"], "Letter text");
    }

    #[rocket::async_test]
    async fn test_generate_without_name_is_validation_error() {
        let client = default_client().await;

        let response = client
            .post("/api/generate")
            .header(ContentType::JSON)
            .body(json!({"profile": {}, "job": {"title": "Engineer"}}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(json_body(response).await["error"], "Profile name is required");
    }

    async fn post_json(client: &Client, path: &str, body: Value) -> (Status, Value) {
        let response = client
            .post(path)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, json_body(response).await)
    }

    #[rocket::async_test]
    async fn test_parse_job_text() {
        let client = client(
            MockExtractor::failing("unused"),
            MockExtractor::failing("unused"),
            MockCompletionModel::with_replies([Ok(json!({"title": "Engineer", "description": "Build things"}).to_string())]),
        )
        .await;

        let (status, body) = post_json(&client, "/api/job/parse", json!({"jobText": "Engineer wanted to build things"})).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["title"], "Engineer");
        assert_eq!(body["data"]["extractionMethod"], "text");

        let (status, body) = post_json(&client, "/api/job/parse", json!({"text": "  "})).await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
    }

    #[rocket::async_test]
    async fn test_parse_cv_text() {
        let client = client(
            MockExtractor::failing("unused"),
            MockExtractor::failing("unused"),
            MockCompletionModel::with_replies([Ok(json!({"name": "Ada Lovelace", "skills": ["Rust"]}).to_string())]),
        )
        .await;

        let (status, body) = post_json(
            &client,
            "/api/profile/parse",
            json!({"cvText": "Ada Lovelace, Rust", "fileName": "ada.pdf"}),
        )
        .await;

        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["name"], "Ada Lovelace");
        assert_eq!(body["data"]["url"], "ada.pdf");
    }

    #[rocket::async_test]
    async fn test_extract_profile_degrades_to_placeholder() {
        let client = client(
            MockExtractor::failing("unused"),
            MockExtractor::failing("unused"),
            MockCompletionModel::with_replies([Err(LlmError::Transport("reset".to_string()))]),
        )
        .await;

        let (status, body) = post_json(
            &client,
            "/api/profile/extract",
            json!({"url": "https://www.linkedin.com/in/ada"}),
        )
        .await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["data"]["name"], "Profile Extraction Error");
        assert_eq!(body["data"]["extractionError"], true);

        let (status, _) = post_json(
            &client,
            "/api/profile/extract",
            json!({"url": "https://www.linkedin.com/jobs/view/1"}),
        )
        .await;
        assert_eq!(status, Status::BadRequest);
    }

    #[rocket::async_test]
    async fn test_health_reports_model_configuration() {
        let client = default_client().await;

        let body = json_body(client.get("/api/health").dispatch().await).await;
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["model_configured"], true);
    }

    #[rocket::async_test]
    async fn test_unknown_route_uses_json_catcher() {
        let client = default_client().await;

        let response = client.get("/api/nope").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(json_body(response).await["error_code"], "NOT_FOUND");
    }
}
