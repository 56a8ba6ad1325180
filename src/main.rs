//! MediPredict: terminal health screening.
//!
//! Main entry point for the terminal application.

use std::fs::OpenOptions;
use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medipredict::adapters::sanitize::SanitizingMakeWriter;
use medipredict::tui::App;
use medipredict::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Terminal logging would corrupt the alternate screen, so an interactive
    // session logs to a file unless told otherwise.
    let (writer, _guard) = if config.log_mode.use_file(std::io::stdout().is_terminal()) {
        if let Some(parent) = config.log_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(
        user_db = ?config.user_db,
        model_dir = ?config.model_dir,
        "Starting MediPredict"
    );

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("MediPredict shutdown complete");
    Ok(())
}
