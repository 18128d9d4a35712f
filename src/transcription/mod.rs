//! Transcript types and speech recognition.
//!
//! The [`Recognizer`] trait is the seam between the orchestrator and the
//! speech-to-text engine; [`WhisperCli`] is the local Whisper implementation.

mod format;
mod models;
mod whisper;

pub use format::{format_transcript, OutputFormat};
pub use models::{
    format_timestamp, lenient_flag, segments_monotonic, RecognizedSegment, TranscriptRequest,
    TranscriptResponse, TranscriptSegment, TranscriptSource, AUTO_DETECTED_LANGUAGE,
};
pub use whisper::{parse_whisper_json, WhisperCli};

use crate::config::ModelSize;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for speech recognition engines.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Configured model size.
    fn model_size(&self) -> ModelSize;

    /// Whether the engine has finished its one-time initialization.
    fn is_loaded(&self) -> bool;

    /// Transcribe an audio file into timed segments.
    async fn recognize(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>>;
}
