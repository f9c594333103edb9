// src/job_extraction/page_scraper.rs
//! Page loading capability used by the fallback extractor.
//!
//! A [`PageScraper`] hands out one isolated [`PageSession`] per extraction. The
//! shipped implementation fetches static HTML with reqwest and answers selector
//! queries with `scraper`; a headless browser can sit behind the same traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

use super::types::ExtractionError;

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Start a fresh session. Nothing is shared between sessions.
    async fn launch(&self) -> Result<Box<dyn PageSession>, ExtractionError>;
}

#[async_trait]
pub trait PageSession: Send {
    async fn navigate(&mut self, url: &str, user_agent: &str) -> Result<(), ExtractionError>;

    /// Resolves once any of `selectors` is present on the page
    async fn wait_for_any(&mut self, selectors: &[&str]) -> Result<(), ExtractionError>;

    /// Current page HTML
    async fn content(&mut self) -> Result<String, ExtractionError>;

    async fn close(&mut self) -> Result<(), ExtractionError>;
}

pub struct HttpPageScraper {
    client: Client,
}

impl HttpPageScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    async fn launch(&self) -> Result<Box<dyn PageSession>, ExtractionError> {
        Ok(Box::new(HttpPageSession {
            client: self.client.clone(),
            html: None,
        }))
    }
}

struct HttpPageSession {
    client: Client,
    html: Option<String>,
}

impl HttpPageSession {
    fn loaded_html(&self) -> Result<&str, ExtractionError> {
        self.html
            .as_deref()
            .ok_or_else(|| ExtractionError::Browser("no page has been loaded".to_string()))
    }
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn navigate(&mut self, url: &str, user_agent: &str) -> Result<(), ExtractionError> {
        info!("Fetching job page: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Upstream {
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        debug!(bytes = html.len(), "Job page loaded");
        self.html = Some(html);
        Ok(())
    }

    async fn wait_for_any(&mut self, selectors: &[&str]) -> Result<(), ExtractionError> {
        // Static HTML never changes after load, so one check is the whole wait.
        if document_matches_any(self.loaded_html()?, selectors) {
            Ok(())
        } else {
            Err(ExtractionError::Browser(format!(
                "none of [{}] present on page",
                selectors.join(", ")
            )))
        }
    }

    async fn content(&mut self) -> Result<String, ExtractionError> {
        self.loaded_html().map(str::to_string)
    }

    async fn close(&mut self) -> Result<(), ExtractionError> {
        self.html = None;
        debug!("Page session closed");
        Ok(())
    }
}

/// True if any of `selectors` matches at least one element of `html`
pub fn document_matches_any(html: &str, selectors: &[&str]) -> bool {
    let document = Html::parse_document(html);
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .any(|selector| document.select(&selector).next().is_some())
}
