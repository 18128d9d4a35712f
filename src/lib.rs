//! tubescribe - YouTube transcripts over HTTP
//!
//! Given a YouTube URL or video ID, returns a timestamped transcript. The
//! video's own captions are preferred; when they are missing (or the caller
//! asks for it) the audio is downloaded and run through a local Whisper model.
//!
//! # Architecture
//!
//! - `video_id` - URL / bare ID resolution
//! - `metadata` - best-effort title and duration lookup
//! - `captions` - caption track discovery and download
//! - `audio` - audio download into scoped scratch directories
//! - `transcription` - transcript types, formats and the Whisper recognizer
//! - `orchestrator` - captions-or-fallback pipeline
//! - `server` - axum HTTP API
//! - `config` - configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use tubescribe::config::Settings;
//! use tubescribe::orchestrator::Orchestrator;
//! use tubescribe::transcription::TranscriptRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let transcript = orchestrator
//!         .transcribe(&TranscriptRequest::new("https://youtu.be/dQw4w9WgXcQ"))
//!         .await?;
//!     println!("{} segments from {}", transcript.segments.len(), transcript.source);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod orchestrator;
pub mod server;
pub mod transcription;
pub mod video_id;

#[cfg(test)]
mod testing;

pub use error::{Result, ScribeError};
