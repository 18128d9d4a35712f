//! HTTP API server.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::server;
use std::sync::Arc;
use tracing::warn;

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    // Captions work without any external tool, so missing ones only warn.
    for (tool, e) in preflight::missing_tools(&settings) {
        warn!("{} unavailable, the Whisper fallback will fail: {}", tool.name, e);
    }

    std::fs::create_dir_all(settings.temp_dir())?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let model = settings.whisper.model;
    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("tubescribe API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Whisper model", model.as_str());
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Transcribe", "POST /transcribe");
    Output::kv("Transcribe by ID", "GET  /transcribe/{video_id}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(listener, orchestrator).await?;

    Ok(())
}
