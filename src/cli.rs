// src/cli.rs
use crate::core::cache::TtlCache;
use crate::core::config_manager::ConfigManager;
use crate::core::error_classifier::{classify, format_error_message, Failure};
use crate::core::llm_client::OpenAiClient;
use crate::job_extraction::JobExtractionService;
use crate::profile_import::ProfileParser;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "cvtailor")]
#[command(about = "Tailored CV and cover letter backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the HTTP API server (default)
    Serve,
    /// Extract one job posting and print it as JSON
    Extract {
        url: String,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Parse a plain-text CV file into profile JSON
    ParseCv {
        file: PathBuf,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Show how an HTTP status is reported to users
    ClassifyStatus { status: u16 },
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,

        Command::Extract { url, compact } => {
            let model = Arc::new(OpenAiClient::new(&config.model)?);
            let service = JobExtractionService::from_config(&config, model, Arc::new(TtlCache::new()))?;

            let details = match service.extract(&url).await {
                Ok(details) => details,
                Err(e) => anyhow::bail!("{}", format_error_message(&classify(&e.to_failure()))),
            };

            if details.extraction_error {
                info!("All extractors failed for {}, printing placeholder", url);
            }

            println!("{}", to_json(&details, compact)?);
            Ok(())
        }

        Command::ParseCv { file, compact } => {
            let cv_text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read CV file: {}", file.display()))?;

            let model = Arc::new(OpenAiClient::new(&config.model)?);
            let parser = ProfileParser::new(model, &config.model);
            let source = file.file_name().and_then(|name| name.to_str());

            let profile = match parser.parse_cv_text(&cv_text, source).await {
                Ok(profile) => profile,
                Err(e) => anyhow::bail!("{}", format_error_message(&classify(&e.to_failure()))),
            };

            println!("{}", to_json(&profile, compact)?);
            Ok(())
        }

        Command::ClassifyStatus { status } => {
            println!("{}", render_status(status)?);
            Ok(())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("Failed to serialize output")
}

fn render_status(status: u16) -> Result<String> {
    let envelope = classify(&Failure::Http {
        status,
        message: None,
    });
    let json = serde_json::to_string_pretty(&envelope).context("Failed to serialize envelope")?;
    Ok(format!("{}\n{}", json, format_error_message(&envelope)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["cvtailor"]).unwrap();
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["cvtailor", "extract", "https://www.linkedin.com/jobs/view/1", "--compact"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Extract {
                url: "https://www.linkedin.com/jobs/view/1".to_string(),
                compact: true
            })
        );

        let cli = Cli::try_parse_from(["cvtailor", "parse-cv", "cv.txt"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::ParseCv {
                file: PathBuf::from("cv.txt"),
                compact: false
            })
        );

        let cli = Cli::try_parse_from(["cvtailor", "classify-status", "401"]).unwrap();
        assert_eq!(cli.command, Some(Command::ClassifyStatus { status: 401 }));

        assert!(Cli::try_parse_from(["cvtailor", "classify-status", "abc"]).is_err());
    }

    #[test]
    fn test_render_status() {
        let rendered = render_status(401).unwrap();
        assert!(rendered.contains("\"category\": \"authentication\""));
        assert!(rendered.ends_with("Please sign in again to continue"));
    }
}
