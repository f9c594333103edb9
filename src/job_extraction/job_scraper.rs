// src/job_extraction/job_scraper.rs
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::page_scraper::{PageScraper, PageSession};
use super::types::{ExtractionError, JobUrl};
use super::{ExtractionMethod, JobDetails, JobExtractor};
use crate::core::config_manager::BrowserConfig;
use crate::utils::clean_text;

const WAIT_SELECTORS: &[&str] = &[".job-details", ".description", ".job-view-layout", "[data-job-id]"];

const TITLE_SELECTORS: &[&str] = &[
    ".job-title",
    "[data-test-job-title]",
    "h1",
    ".top-card-layout__title",
    ".job-details-jobs-unified-top-card__job-title",
];

const COMPANY_SELECTORS: &[&str] = &[
    ".company-name",
    "[data-test-company-name]",
    ".topcard__org-name",
    ".job-details-jobs-unified-top-card__company-name",
];

const LOCATION_SELECTORS: &[&str] = &[
    ".job-location",
    "[data-test-job-location]",
    ".topcard__flavor--bullet",
    ".job-details-jobs-unified-top-card__bullet",
];

const DESCRIPTION_SELECTORS: &[&str] = &[
    ".job-description",
    ".description__text",
    ".show-more-less-html",
    ".description",
    ".jobs-description__content",
    ".jobs-box__html-content",
    ".jobs-description-content__text",
];

const CONTAINER_SELECTORS: &[&str] = &[
    ".job-view-layout",
    ".jobs-details",
    ".jobs-unified-top-card__content-container",
];

const MIN_DESCRIPTION_CHARS: usize = 50;
const MIN_REQUIREMENT_CHARS: usize = 5;

/// Fallback extractor: loads the posting in a page session and reads fields by CSS selector
pub struct BrowserExtractor {
    scraper: Arc<dyn PageScraper>,
    user_agent: String,
    navigation_timeout: Duration,
    selector_timeout: Duration,
}

impl BrowserExtractor {
    pub fn new(scraper: Arc<dyn PageScraper>, config: &BrowserConfig) -> Self {
        Self {
            scraper,
            user_agent: config.user_agent.clone(),
            navigation_timeout: config.navigation_timeout(),
            selector_timeout: config.selector_timeout(),
        }
    }

    pub fn with_timeouts(mut self, navigation: Duration, selector: Duration) -> Self {
        self.navigation_timeout = navigation;
        self.selector_timeout = selector;
        self
    }

    async fn scrape(&self, session: &mut dyn PageSession, url: &JobUrl) -> Result<JobDetails, ExtractionError> {
        match timeout(self.navigation_timeout, session.navigate(url.as_str(), &self.user_agent)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ExtractionError::Timeout {
                    stage: "navigation",
                    seconds: self.navigation_timeout.as_secs(),
                })
            }
        }

        match timeout(self.selector_timeout, session.wait_for_any(WAIT_SELECTORS)).await {
            Ok(Ok(())) => debug!("Content selectors matched"),
            Ok(Err(e)) => warn!("Content selectors not found, extracting anyway: {}", e),
            Err(_) => warn!(
                "Timed out after {:?} waiting for content selectors, extracting anyway",
                self.selector_timeout
            ),
        }

        let html = session.content().await?;
        extract_from_html(&html, url)
    }
}

#[async_trait]
impl JobExtractor for BrowserExtractor {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn extract(&self, url: &JobUrl) -> Result<JobDetails, ExtractionError> {
        info!("Launching page session for {}", url);
        let mut session = self.scraper.launch().await?;

        let result = self.scrape(session.as_mut(), url).await;

        // Every exit after launch goes through here
        if let Err(e) = session.close().await {
            warn!("Failed to close page session: {}", e);
        }

        match &result {
            Ok(details) => info!(
                "Scraped job page: {} at {}",
                details.title.as_deref().unwrap_or("?"),
                details.company.as_deref().unwrap_or("?")
            ),
            Err(e) => warn!("Page extraction failed: {}", e),
        }
        result
    }
}

/// Read job fields from a loaded page
pub fn extract_from_html(html: &str, url: &JobUrl) -> Result<JobDetails, ExtractionError> {
    let document = Html::parse_document(html);

    let title = find_text_by_selectors(&document, TITLE_SELECTORS);
    let company = find_text_by_selectors(&document, COMPANY_SELECTORS);
    let location = find_text_by_selectors(&document, LOCATION_SELECTORS);
    let mut description = find_text_by_selectors(&document, DESCRIPTION_SELECTORS);
    let requirements = collect_requirements(&document);

    let mut method = ExtractionMethod::Browser;
    let short = description
        .as_deref()
        .map_or(true, |d| d.chars().count() < MIN_DESCRIPTION_CHARS);
    if short {
        if let Some(container) = find_text_by_selectors(&document, CONTAINER_SELECTORS) {
            debug!("Description too short, using container text");
            description = Some(container);
            method = ExtractionMethod::BrowserContainer;
        }
    }

    if title.is_none() && description.is_none() {
        return Err(ExtractionError::NoContent);
    }

    Ok(JobDetails {
        title,
        company,
        location,
        description,
        requirements,
        extraction_method: Some(method),
        ..JobDetails::new(url.as_str())
    })
}

fn find_text_by_selectors(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn collect_requirements(document: &Html) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for container in DESCRIPTION_SELECTORS {
        let Ok(selector) = Selector::parse(&format!("{} li", container)) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if text.chars().count() > MIN_REQUIREMENT_CHARS && !items.contains(&text) {
                items.push(text);
            }
        }
    }

    items
}
