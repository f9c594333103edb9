// src/lib.rs
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub mod cli;
pub mod core;
pub mod generation;
pub mod job_extraction;
pub mod profile_import;
pub mod types;
pub mod utils;
pub mod web;

#[cfg(test)]
mod test_support;

pub use web::start_web_server;

const DEFAULT_LOG_FILTER: &str = "cv_tailor=info,rocket::server=off";

/// Human-readable logs on stderr. When `LOG_FILE` is set, JSON lines are also written there (truncated on start).
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json_layer = match std::env::var("LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path))?;

            Some(
                fmt::layer()
                    .json()
                    .with_writer(Arc::new(file))
                    .with_current_span(true)
                    .with_span_list(false),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(json_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
