// src/job_extraction/orchestrator.rs
use anyhow::Result;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::job_scraper::BrowserExtractor;
use super::model_extractor::ModelExtractor;
use super::page_scraper::HttpPageScraper;
use super::types::{ExtractionError, JobUrl};
use super::{JobDetails, JobExtractor};
use crate::core::cache::{cache_key, with_cache, TtlCache};
use crate::core::config_manager::ConfigManager;
use crate::core::error_classifier::classify;
use crate::core::llm_client::CompletionModel;

pub const CACHE_NAMESPACE: &str = "job-extract";
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Serialize)]
struct ExtractParams {
    url: String,
}

/// Primary extractor, then fallback, then placeholder. Results are cached per normalised URL.
pub struct JobExtractionService {
    primary: Arc<dyn JobExtractor>,
    fallback: Arc<dyn JobExtractor>,
    cache: Arc<TtlCache<JobDetails>>,
    ttl: Duration,
}

impl JobExtractionService {
    pub fn new(
        primary: Arc<dyn JobExtractor>,
        fallback: Arc<dyn JobExtractor>,
        cache: Arc<TtlCache<JobDetails>>,
    ) -> Self {
        Self {
            primary,
            fallback,
            cache,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Model extractor backed by `model`, page extractor backed by a static HTTP fetch
    pub fn from_config(
        config: &ConfigManager,
        model: Arc<dyn CompletionModel>,
        cache: Arc<TtlCache<JobDetails>>,
    ) -> Result<Self> {
        let primary = Arc::new(ModelExtractor::new(model, &config.model));
        let scraper = Arc::new(HttpPageScraper::new()?);
        let fallback = Arc::new(BrowserExtractor::new(scraper, &config.browser));

        Ok(Self::new(primary, fallback, cache).with_ttl(config.cache.job_ttl()))
    }

    pub fn cache(&self) -> &Arc<TtlCache<JobDetails>> {
        &self.cache
    }

    /// Extract job details for `url`.
    ///
    /// Fails only when `url` is not a job posting URL. Every extractor failure
    /// degrades to the fallback and finally to [`JobDetails::placeholder`].
    pub async fn extract(&self, url: &str) -> Result<JobDetails, ExtractionError> {
        let job_url = JobUrl::parse(url).inspect_err(|e| warn!("Rejected job URL: {}", e))?;

        let service = self;
        let target = &job_url;
        let cached = with_cache(self.cache.clone(), CACHE_NAMESPACE, self.ttl, move |_: ExtractParams| async move {
            Ok::<_, Infallible>(service.run_chain(target).await)
        });

        let request_id = Uuid::new_v4();
        let span = info_span!("job_extract", %request_id, url = %job_url, cache = cached.namespace());

        let params = ExtractParams {
            url: job_url.to_string(),
        };
        match cached.call(params).instrument(span).await {
            Ok(details) => Ok(details),
            Err(never) => match never {},
        }
    }

    /// Drop the cached result for `url`. Returns whether an entry existed.
    pub fn invalidate(&self, url: &str) -> Result<bool, ExtractionError> {
        let key = self.cache_key_for(url)?;
        Ok(self.cache.invalidate(&key))
    }

    pub fn cache_key_for(&self, url: &str) -> Result<String, ExtractionError> {
        let job_url = JobUrl::parse(url)?;
        Ok(key_for(&job_url))
    }

    async fn run_chain(&self, url: &JobUrl) -> JobDetails {
        info!("Cache miss, running extraction chain");

        match self.primary.extract(url).await {
            Ok(details) if details.has_required_content() => {
                info!(extractor = self.primary.name(), "Primary extraction succeeded");
                return stamp_url(details, url);
            }
            Ok(_) => warn!(
                extractor = self.primary.name(),
                "Primary extraction missing title or description, trying fallback"
            ),
            Err(e) => {
                let envelope = classify(&e.to_failure());
                warn!(
                    extractor = self.primary.name(),
                    category = ?envelope.category,
                    "Primary extraction failed, trying fallback: {}",
                    e
                );
            }
        }

        match self.fallback.extract(url).await {
            Ok(details) => {
                info!(extractor = self.fallback.name(), "Fallback extraction succeeded");
                stamp_url(details, url)
            }
            Err(e) => {
                error!(
                    extractor = self.fallback.name(),
                    "Fallback extraction failed, returning placeholder: {}",
                    e
                );
                JobDetails::placeholder(url.as_str())
            }
        }
    }
}

fn key_for(url: &JobUrl) -> String {
    let params = ExtractParams {
        url: url.to_string(),
    };
    cache_key(CACHE_NAMESPACE, &params).unwrap_or_else(|_| format!("{}:{}", CACHE_NAMESPACE, url))
}

fn stamp_url(mut details: JobDetails, url: &JobUrl) -> JobDetails {
    details.url = url.to_string();
    details
}
