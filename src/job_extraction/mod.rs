// src/job_extraction/mod.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod job_parser;
pub mod job_scraper;
pub mod model_extractor;
pub mod orchestrator;
pub mod page_scraper;
pub mod types;

pub use job_parser::JobParser;
pub use job_scraper::BrowserExtractor;
pub use model_extractor::ModelExtractor;
pub use orchestrator::JobExtractionService;
pub use page_scraper::{HttpPageScraper, PageScraper, PageSession};
pub use types::{ExtractionError, JobUrl};

pub const PLACEHOLDER_TITLE: &str = "Job Extraction Failed";
pub const PLACEHOLDER_COMPANY: &str = "LinkedIn";
pub const PLACEHOLDER_LOCATION: &str = "Unknown";
pub const PLACEHOLDER_DESCRIPTION: &str = "The system was unable to extract job details from the provided URL. Please paste the job description manually.";

/// Which path produced a [`JobDetails`] value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    Model,
    Browser,
    BrowserContainer,
    /// Parsed from posting text pasted by the user
    Text,
    Placeholder,
}

/// Structured job posting. Every field except `url` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[serde(default)]
    pub url: String,

    #[serde(default, deserialize_with = "crate::types::lenient_text", alias = "jobTitle", alias = "job_title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "crate::types::lenient_text", alias = "companyName", alias = "company_name", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "crate::types::lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "crate::types::lenient_text", alias = "jobDescription", alias = "job_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::types::string_or_list")]
    pub requirements: Vec<String>,

    #[serde(default, deserialize_with = "crate::types::string_or_list")]
    pub qualifications: Vec<String>,

    #[serde(default, deserialize_with = "crate::types::string_or_list")]
    pub responsibilities: Vec<String>,

    #[serde(default, deserialize_with = "crate::types::string_or_list")]
    pub benefits: Vec<String>,

    #[serde(default, deserialize_with = "crate::types::lenient_text", alias = "job_type", alias = "employmentType", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,

    #[serde(default, deserialize_with = "crate::types::lenient_text", skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(default, deserialize_with = "crate::types::lenient_text", alias = "experience_level", alias = "seniorityLevel", skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,

    /// Set only on the placeholder produced when every extractor failed
    #[serde(default)]
    pub extraction_error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<ExtractionMethod>,
}

impl JobDetails {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Renderable stand-in returned when no extractor produced anything usable
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self {
            title: Some(PLACEHOLDER_TITLE.to_string()),
            company: Some(PLACEHOLDER_COMPANY.to_string()),
            location: Some(PLACEHOLDER_LOCATION.to_string()),
            description: Some(PLACEHOLDER_DESCRIPTION.to_string()),
            extraction_error: true,
            extraction_method: Some(ExtractionMethod::Placeholder),
            ..Self::new(url)
        }
    }

    /// True when both title and description carry text
    pub fn has_required_content(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.title) && filled(&self.description)
    }
}

/// Extraction capability used by the orchestrator. Both the model path and the page path implement it.
#[async_trait]
pub trait JobExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, url: &JobUrl) -> Result<JobDetails, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_shape() {
        let placeholder = JobDetails::placeholder("https://www.linkedin.com/jobs/view/1");
        assert_eq!(placeholder.title.as_deref(), Some(PLACEHOLDER_TITLE));
        assert!(placeholder.requirements.is_empty());
        assert!(placeholder.extraction_error);
        assert_eq!(placeholder.extraction_method, Some(ExtractionMethod::Placeholder));
        assert!(placeholder.has_required_content());
    }

    #[test]
    fn test_required_content_rule() {
        let mut details = JobDetails::new("u");
        details.title = Some("Engineer".to_string());
        assert!(!details.has_required_content());

        details.description = Some("   ".to_string());
        assert!(!details.has_required_content());

        details.description = Some("Build things".to_string());
        assert!(details.has_required_content());
    }

    #[test]
    fn test_lenient_deserialisation() {
        let details: JobDetails = serde_json::from_value(json!({
            "job_title": "Backend Engineer",
            "company": {"name": "Acme"},
            "location": "",
            "description": "Ship Rust services",
            "requirements": "5 years of Rust",
            "benefits": ["Remote", null, 401],
            "experience_level": "Senior",
            "jobType": null
        }))
        .unwrap();

        assert_eq!(details.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(details.company.as_deref(), Some(r#"{"name":"Acme"}"#));
        assert_eq!(details.location, None);
        assert_eq!(details.requirements, vec!["5 years of Rust"]);
        assert_eq!(details.benefits, vec!["Remote", "401"]);
        assert_eq!(details.experience_level.as_deref(), Some("Senior"));
        assert_eq!(details.job_type, None);
        assert!(!details.extraction_error);
    }

    #[test]
    fn test_serialises_camel_case() {
        let value = serde_json::to_value(JobDetails::placeholder("u")).unwrap();
        assert_eq!(value["extractionError"], true);
        assert_eq!(value["extractionMethod"], "placeholder");
        assert_eq!(value["requirements"], json!([]));
        assert!(value.get("jobType").is_none());
    }
}
