// src/types/profile.rs
//! Candidate profile as entered by the user or imported from a CV

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "super::text_or_empty", alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", alias = "about", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "super::string_or_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "super::string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<Certification>,
    /// Where the profile came from (profile URL, uploaded file name, or "Manual entry")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Set only on the stand-in returned when a profile URL could not be read
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub extraction_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default, deserialize_with = "super::text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "super::text_or_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>, // None means current
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "super::text_or_empty")]
    pub institution: String,
    #[serde(default, deserialize_with = "super::text_or_empty")]
    pub degree: String,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default, deserialize_with = "super::text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Profile {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Stand-in for a profile URL whose model reply could not be parsed
    pub fn unreadable(url: impl Into<String>) -> Self {
        Self {
            name: "Failed to extract".to_string(),
            headline: Some("Could not parse LinkedIn profile".to_string()),
            summary: Some("Please enter your profile information manually.".to_string()),
            url: Some(url.into()),
            extraction_error: true,
            ..Default::default()
        }
    }

    /// Stand-in for a profile URL when the model call itself failed
    pub fn extraction_failed(url: impl Into<String>) -> Self {
        Self {
            name: "Profile Extraction Error".to_string(),
            headline: Some("Please enter your profile details manually".to_string()),
            summary: Some("The system encountered an error while trying to extract your LinkedIn profile. Please enter your profile information manually.".to_string()),
            url: Some(url.into()),
            extraction_error: true,
            ..Default::default()
        }
    }
}
