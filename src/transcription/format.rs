//! Transcript rendering for the command line (JSON, SRT, VTT, plain text).

use super::{format_timestamp, TranscriptResponse};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Srt,
    Vtt,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown format: {}. Use json, srt, vtt or text.", s)),
        }
    }
}

/// Render a transcript in the requested format.
pub fn format_transcript(transcript: &TranscriptResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(transcript).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Srt => format_cues(transcript, ',', false),
        OutputFormat::Vtt => format_cues(transcript, '.', true),
        OutputFormat::Text => format_text(transcript),
    }
}

/// SRT and WebVTT differ only in the header and the millisecond separator.
fn format_cues(transcript: &TranscriptResponse, ms_separator: char, webvtt: bool) -> String {
    let mut output = if webvtt {
        String::from("WEBVTT\n\n")
    } else {
        String::new()
    };

    for (i, segment) in transcript.segments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            cue_timestamp(segment.start, ms_separator),
            cue_timestamp(segment.end(), ms_separator)
        ));
        output.push_str(&segment.text);
        output.push_str("\n\n");
    }

    output
}

fn format_text(transcript: &TranscriptResponse) -> String {
    transcript
        .segments
        .iter()
        .map(|s| format!("[{}] {}", format_timestamp(s.start), s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cue timestamp, e.g. `00:01:01,500`.
fn cue_timestamp(seconds: f64, ms_separator: char) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, ms_separator, ms)
}
