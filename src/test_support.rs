// src/test_support.rs
//! Hand-written doubles for the capability traits, with call counters

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::llm_client::{CompletionModel, CompletionRequest, LlmError};
use crate::job_extraction::page_scraper::{PageScraper, PageSession};
use crate::job_extraction::types::{ExtractionError, JobUrl};
use crate::job_extraction::{JobDetails, JobExtractor};

pub fn sample_job() -> JobDetails {
    JobDetails {
        title: Some("Senior Rust Engineer".to_string()),
        company: Some("Acme Robotics".to_string()),
        location: Some("Zurich".to_string()),
        description: Some("Design and operate the fleet control plane.".to_string()),
        requirements: vec!["Async Rust".to_string(), "Distributed systems".to_string()],
        ..JobDetails::new("https://www.linkedin.com/jobs/view/1")
    }
}

enum Outcome {
    Succeed(JobDetails),
    Fail(String),
}

pub struct MockExtractor {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn succeeding(details: JobDetails) -> Self {
        Self {
            outcome: Outcome::Succeed(details),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Outcome::Fail(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobExtractor for MockExtractor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn extract(&self, _url: &JobUrl) -> Result<JobDetails, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Succeed(details) => Ok(details.clone()),
            Outcome::Fail(message) => Err(ExtractionError::Browser(message.clone())),
        }
    }
}

/// Replies are consumed in order; an exhausted queue answers `EmptyContent`.
pub struct MockCompletionModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionModel {
    pub fn with_replies(replies: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum NavigationBehaviour {
    Load,
    Fail,
    Hang,
}

#[derive(Debug, Clone, Copy)]
pub enum WaitBehaviour {
    Match,
    NoMatch,
    Hang,
}

pub struct MockPageScraper {
    html: String,
    navigation: NavigationBehaviour,
    wait: WaitBehaviour,
    launch_fails: bool,
    launches: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl MockPageScraper {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            navigation: NavigationBehaviour::Load,
            wait: WaitBehaviour::Match,
            launch_fails: false,
            launches: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn navigation(mut self, behaviour: NavigationBehaviour) -> Self {
        self.navigation = behaviour;
        self
    }

    pub fn wait(mut self, behaviour: WaitBehaviour) -> Self {
        self.wait = behaviour;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageScraper for MockPageScraper {
    async fn launch(&self) -> Result<Box<dyn PageSession>, ExtractionError> {
        if self.launch_fails {
            return Err(ExtractionError::Browser("browser failed to start".to_string()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockPageSession {
            html: self.html.clone(),
            navigation: self.navigation,
            wait: self.wait,
            loaded: false,
            closes: self.closes.clone(),
        }))
    }
}

struct MockPageSession {
    html: String,
    navigation: NavigationBehaviour,
    wait: WaitBehaviour,
    loaded: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl PageSession for MockPageSession {
    async fn navigate(&mut self, _url: &str, _user_agent: &str) -> Result<(), ExtractionError> {
        match self.navigation {
            NavigationBehaviour::Load => {
                self.loaded = true;
                Ok(())
            }
            NavigationBehaviour::Fail => Err(ExtractionError::Transport("connection reset".to_string())),
            NavigationBehaviour::Hang => std::future::pending().await,
        }
    }

    async fn wait_for_any(&mut self, _selectors: &[&str]) -> Result<(), ExtractionError> {
        match self.wait {
            WaitBehaviour::Match => Ok(()),
            WaitBehaviour::NoMatch => Err(ExtractionError::Browser("no selector matched".to_string())),
            WaitBehaviour::Hang => std::future::pending().await,
        }
    }

    async fn content(&mut self) -> Result<String, ExtractionError> {
        if self.loaded {
            Ok(self.html.clone())
        } else {
            Err(ExtractionError::Browser("no page has been loaded".to_string()))
        }
    }

    async fn close(&mut self) -> Result<(), ExtractionError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
