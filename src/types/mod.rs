// src/types/mod.rs
//! Request/response data shared by the generation and HTTP layers, plus lenient serde helpers
//! for model-produced JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod profile;
pub mod response;

pub use profile::{Certification, Education, Experience, Profile};
pub use response::{FitAnalysis, GeneratedDocuments};

fn value_to_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .filter_map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accept any JSON value as optional text. Blank strings and `null` become `None`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

/// Like [`lenient_text`], but absent text is an empty string
pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Accept a list or a single value as a list of non-blank strings
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_to_text).collect(),
        other => value_to_text(other).into_iter().collect(),
    };
    Ok(items)
}
