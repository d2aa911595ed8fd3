//! Table Translator
//!
//! Fills missing target-language rows of `*_translation` tables with DeepL translations

// tabletranslator/src/main.rs
mod backup;
mod cli;
mod config;
mod errors;
mod store;
mod sync;
mod translate;
mod utils;

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{error, info, warn};

use cli::Cli;
use config::AppConfig;

/// Main entry point for the translation tool
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenv::dotenv();

    if let Err(e) = init_logging() {
        eprintln!("❌ Error: {:?}", e);
        return ExitCode::FAILURE;
    }

    match run_app().await {
        Ok(_) => {
            info!("✅ Translation completed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tabletranslator=info".parse()?),
        )
        .init();
    Ok(())
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse_args();
    let app_config = AppConfig::load(&cli).context("Failed to load application configuration")?;

    info!(
        "🚀 Starting translation {} -> {}",
        app_config.translate.source_locale, app_config.translate.target_locale
    );
    let report = sync::run_translation_flow(&app_config)
        .await
        .context("Translation run failed")?;

    for table in &report.tables {
        info!("{}", table);
    }
    if report.failures() > 0 {
        warn!(
            "⚠️ {} writes, {} row/column errors (see log above)",
            report.writes(),
            report.failures()
        );
    } else {
        info!("{} writes across {} tables", report.writes(), report.tables.len());
    }
    Ok(())
}
