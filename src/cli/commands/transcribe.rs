//! Transcribe command implementation.

use crate::cli::output::format_duration;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcription::{format_transcript, OutputFormat, TranscriptRequest};
use anyhow::Result;

/// Run the pipeline once and print or save the transcript.
pub async fn run_transcribe(
    input: &str,
    language: Option<String>,
    use_whisper: bool,
    format: &str,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let output_format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    std::fs::create_dir_all(settings.temp_dir())?;
    let orchestrator = Orchestrator::new(settings)?;

    let request = TranscriptRequest {
        url: input.to_string(),
        language,
        use_whisper,
    };

    let spinner = Output::spinner(&format!("Transcribing {}...", input));
    let result = orchestrator.transcribe(&request).await;
    spinner.finish_and_clear();

    let transcript = match result {
        Ok(transcript) => transcript,
        Err(e) => {
            Output::error(&format!("Failed to transcribe: {}", e));
            if !e.is_client_error() {
                Output::info("Run 'tubescribe doctor' for detailed diagnostics.");
            }
            return Err(e.into());
        }
    };

    Output::success(&format!(
        "'{}' ({}, {} segments from {})",
        transcript.title.as_deref().unwrap_or(&transcript.video_id),
        format_duration(transcript.duration.unwrap_or_default()),
        transcript.segments.len(),
        transcript.source
    ));

    let rendered = format_transcript(&transcript, output_format);

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            Output::success(&format!("Transcript written to {}", path));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
