// src/types/response.rs
use serde::{Deserialize, Serialize};

/// Profile/job fit produced by the analysis step and fed into both documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitAnalysis {
    #[serde(default, deserialize_with = "super::string_or_list")]
    pub key_skills: Vec<String>,
    #[serde(default, deserialize_with = "super::string_or_list")]
    pub relevant_experience: Vec<String>,
    #[serde(default, deserialize_with = "super::string_or_list")]
    pub missing_skills: Vec<String>,
    #[serde(default, deserialize_with = "super::lenient_text", skip_serializing_if = "Option::is_none")]
    pub suggested_tone: Option<String>,
    #[serde(default, deserialize_with = "super::string_or_list")]
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocuments {
    pub cv: String,
    pub cover_letter: String,
    pub analysis: FitAnalysis,
}
