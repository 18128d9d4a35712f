//! tubescribe CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubescribe::cli::{commands, Cli, Commands};
use tubescribe::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The server logs requests at info by default; one-shot commands stay quiet.
    let log_level = match (cli.verbose, &cli.command) {
        (0, Commands::Serve { .. }) => "info",
        (0, _) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("tubescribe={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Transcribe {
            input,
            language,
            use_whisper,
            format,
            output,
        } => {
            commands::run_transcribe(&input, language, use_whisper, &format, output, settings)
                .await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
