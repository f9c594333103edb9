// src/core/error_classifier.rs
//! Maps failures from outbound calls into a single envelope for display.

use serde::Serialize;
use std::fmt;
use tracing::debug;

const DEFAULT_MESSAGE: &str = "An unexpected error occurred";
const IDENTITY_CODE_PREFIX: &str = "auth/";
const EXTRACTION_KEYWORDS: &[&str] = &["LinkedIn", "profile", "extract"];
const MODEL_KEYWORDS: &[&str] = &["OpenAI", "API key", "generate"];

/// Closed set of failure shapes, built at the boundary of each external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No response was received (DNS, connect, timeout).
    Transport { message: String },
    /// The remote answered with a non-success status.
    Http { status: u16, message: Option<String> },
    /// Identity provider error code such as `auth/wrong-password`.
    IdentityProvider { code: String, message: Option<String> },
    /// Anything else. Classified by its text.
    Message(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Network,
    Authentication,
    Validation,
    UpstreamApi,
    General,
}

impl ErrorCategory {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "NETWORK_ERROR",
            ErrorCategory::Authentication => "AUTHENTICATION_ERROR",
            ErrorCategory::Validation => "VALIDATION_ERROR",
            ErrorCategory::UpstreamApi => "UPSTREAM_API_ERROR",
            ErrorCategory::General => "GENERAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Which upstream system a keyword-classified failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorDomain {
    Extraction,
    Model,
    IdentityProvider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<ErrorDomain>,
}

impl ErrorEnvelope {
    fn new(category: ErrorCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            suggested_action: None,
            severity,
            code: None,
            domain: None,
        }
    }

    fn with_action(mut self, action: &str) -> Self {
        self.suggested_action = Some(action.to_string());
        self
    }

    fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    fn with_domain(mut self, domain: ErrorDomain) -> Self {
        self.domain = Some(domain);
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_error_message(self))
    }
}

pub fn classify(failure: &Failure) -> ErrorEnvelope {
    let envelope = match failure {
        Failure::Transport { .. } => ErrorEnvelope::new(
            ErrorCategory::Network,
            Severity::Error,
            "Network error: Could not connect to the server",
        )
        .with_action("Please check your internet connection and try again"),
        Failure::Http { status, message } => classify_status(*status, message.as_deref()),
        Failure::IdentityProvider { code, message } if code.starts_with(IDENTITY_CODE_PREFIX) => {
            classify_identity_code(code, message.as_deref())
        }
        Failure::IdentityProvider { message, .. } => {
            classify_message(message.as_deref().unwrap_or_default())
        }
        Failure::Message(message) => classify_message(message),
    };

    debug!(
        category = ?envelope.category,
        severity = ?envelope.severity,
        "Classified failure: {}",
        envelope.message
    );
    envelope
}

/// Message followed by the suggested action, if there is one.
pub fn format_error_message(envelope: &ErrorEnvelope) -> String {
    match &envelope.suggested_action {
        Some(action) => format!("{}. {}", envelope.message.trim_end_matches('.'), action),
        None => envelope.message.clone(),
    }
}

fn classify_status(status: u16, message: Option<&str>) -> ErrorEnvelope {
    let message = message.map(str::trim).filter(|m| !m.is_empty());

    match status {
        401 | 403 => ErrorEnvelope::new(
            ErrorCategory::Authentication,
            Severity::Warning,
            "Authentication error: You are not authorized to perform this action",
        )
        .with_action("Please sign in again to continue"),
        400 => ErrorEnvelope::new(
            ErrorCategory::Validation,
            Severity::Warning,
            message.unwrap_or("Invalid request"),
        ),
        404 => ErrorEnvelope::new(
            ErrorCategory::General,
            Severity::Warning,
            "The requested resource was not found",
        ),
        s if s >= 500 => ErrorEnvelope::new(
            ErrorCategory::UpstreamApi,
            Severity::Error,
            "Server error: The server encountered an error",
        )
        .with_action("Please try again later"),
        s => {
            let text = match message {
                Some(m) => format!("Request failed with status {}: {}", s, m),
                None => format!("Request failed with status {}", s),
            };
            ErrorEnvelope::new(ErrorCategory::General, Severity::Error, text)
        }
    }
}

fn classify_identity_code(code: &str, message: Option<&str>) -> ErrorEnvelope {
    let known = match code {
        "auth/email-already-in-use" => Some((
            "This email is already registered",
            "Try signing in instead or use a different email",
        )),
        "auth/wrong-password" => Some(("Incorrect password", "Check your password and try again")),
        "auth/user-not-found" => Some((
            "No account found with this email",
            "Check your email or create a new account",
        )),
        "auth/too-many-requests" => Some((
            "Too many unsuccessful login attempts",
            "Please try again later or reset your password",
        )),
        _ => None,
    };

    let envelope = match known {
        Some((text, action)) => {
            ErrorEnvelope::new(ErrorCategory::Authentication, Severity::Warning, text).with_action(action)
        }
        None => {
            let text = message
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or("Authentication provider error");
            ErrorEnvelope::new(ErrorCategory::Authentication, Severity::Error, text)
        }
    };

    envelope.with_code(code).with_domain(ErrorDomain::IdentityProvider)
}

fn classify_message(text: &str) -> ErrorEnvelope {
    let text = text.trim();

    if EXTRACTION_KEYWORDS.iter().any(|k| text.contains(k)) {
        ErrorEnvelope::new(ErrorCategory::UpstreamApi, Severity::Warning, text)
            .with_action("Please check the URL or try manual input instead")
            .with_domain(ErrorDomain::Extraction)
    } else if MODEL_KEYWORDS.iter().any(|k| text.contains(k)) {
        ErrorEnvelope::new(
            ErrorCategory::UpstreamApi,
            Severity::Warning,
            format!("AI generation error: {}", text),
        )
        .with_action("Please try again later or contact support")
        .with_domain(ErrorDomain::Model)
    } else if text.is_empty() {
        ErrorEnvelope::new(ErrorCategory::General, Severity::Error, DEFAULT_MESSAGE)
    } else {
        ErrorEnvelope::new(ErrorCategory::General, Severity::Error, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> Failure {
        Failure::Http {
            status,
            message: None,
        }
    }

    #[test]
    fn test_transport_failure_is_network() {
        let envelope = classify(&Failure::Transport {
            message: "connection refused".to_string(),
        });
        assert_eq!(envelope.category, ErrorCategory::Network);
        assert_eq!(envelope.severity, Severity::Error);
        assert!(envelope.suggested_action.is_some());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(classify(&http(401)).category, ErrorCategory::Authentication);
        assert_eq!(classify(&http(403)).severity, Severity::Warning);
        assert_eq!(classify(&http(400)).category, ErrorCategory::Validation);
        assert_eq!(classify(&http(404)).category, ErrorCategory::General);
        assert_eq!(classify(&http(404)).severity, Severity::Warning);
        assert_eq!(classify(&http(502)).category, ErrorCategory::UpstreamApi);
        assert_eq!(classify(&http(502)).severity, Severity::Error);

        let teapot = classify(&http(418));
        assert_eq!(teapot.category, ErrorCategory::General);
        assert_eq!(teapot.message, "Request failed with status 418");
    }

    #[test]
    fn test_bad_request_prefers_body_message() {
        let envelope = classify(&Failure::Http {
            status: 400,
            message: Some("url is required".to_string()),
        });
        assert_eq!(envelope.message, "url is required");

        let blank = classify(&Failure::Http {
            status: 400,
            message: Some("  ".to_string()),
        });
        assert_eq!(blank.message, "Invalid request");
    }

    #[test]
    fn test_email_in_use_suggests_signing_in() {
        let envelope = classify(&Failure::IdentityProvider {
            code: "auth/email-already-in-use".to_string(),
            message: None,
        });
        assert_eq!(envelope.category, ErrorCategory::Authentication);
        assert_eq!(envelope.severity, Severity::Warning);
        assert_eq!(envelope.code.as_deref(), Some("auth/email-already-in-use"));
        assert!(envelope
            .suggested_action
            .as_deref()
            .unwrap_or_default()
            .contains("signing in instead"));
        assert!(format_error_message(&envelope).contains("signing in instead"));
    }

    #[test]
    fn test_unknown_identity_code_keeps_provider_message() {
        let envelope = classify(&Failure::IdentityProvider {
            code: "auth/quota-exceeded".to_string(),
            message: Some("Quota exceeded for project".to_string()),
        });
        assert_eq!(envelope.severity, Severity::Error);
        assert_eq!(envelope.message, "Quota exceeded for project");
        assert_eq!(envelope.domain, Some(ErrorDomain::IdentityProvider));
    }

    #[test]
    fn test_keyword_classification() {
        let extraction = classify(&Failure::Message(
            "Failed to extract job content from page".to_string(),
        ));
        assert_eq!(extraction.domain, Some(ErrorDomain::Extraction));
        assert_eq!(extraction.severity, Severity::Warning);

        let model = classify(&Failure::Message("OpenAI API key is not configured".to_string()));
        assert_eq!(model.domain, Some(ErrorDomain::Model));
        assert!(model.message.starts_with("AI generation error"));
    }

    #[test]
    fn test_every_branch_has_a_message() {
        let failures = [
            Failure::Transport {
                message: String::new(),
            },
            http(401),
            http(400),
            http(404),
            http(500),
            http(429),
            Failure::IdentityProvider {
                code: "auth/other".to_string(),
                message: None,
            },
            Failure::IdentityProvider {
                code: "custom".to_string(),
                message: None,
            },
            Failure::Message(String::new()),
        ];

        for failure in &failures {
            assert!(!classify(failure).message.is_empty(), "{:?}", failure);
        }
    }

    #[test]
    fn test_format_error_message() {
        let envelope = classify(&http(500));
        assert_eq!(
            format_error_message(&envelope),
            "Server error: The server encountered an error. Please try again later"
        );
        assert_eq!(classify(&http(404)).to_string(), "The requested resource was not found");
    }
}
