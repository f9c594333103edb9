use anyhow::Result;
use clap::Parser;
use cv_tailor::cli::{handle_command, Cli};
use cv_tailor::core::ConfigManager;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging first
    cv_tailor::init_logging()?;

    let config = ConfigManager::load()?;
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );

    handle_command(cli, config).await
}
