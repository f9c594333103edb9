// src/core/mod.rs
//! Shared services: configuration, caching, failure classification and the model client

pub mod cache;
pub mod config_manager;
pub mod error_classifier;
pub mod llm_client;

pub use cache::{cache_key, with_cache, Clock, ManualClock, SystemClock, TtlCache};
pub use config_manager::ConfigManager;
pub use error_classifier::{classify, format_error_message, ErrorEnvelope, Failure};
pub use llm_client::{CompletionModel, CompletionRequest, LlmError, OpenAiClient};
