//! Platform caption lookup.
//!
//! A failed lookup is not an error for the request: [`fetch_outcome`] turns it
//! into a [`CaptionOutcome`] that the orchestrator branches on.

mod youtube;

pub use youtube::{find_track, json3_url, parse_caption_tracks, parse_json3, YoutubeCaptions};

use crate::error::Result;
use crate::transcription::TranscriptSegment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One caption track offered for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub name: String,
    /// Auto-generated (speech recognition) rather than uploaded captions.
    pub is_generated: bool,
    pub base_url: String,
}

/// Trait for caption providers.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch captions in `language`, or in the provider's default languages.
    async fn fetch_captions(
        &self,
        video_id: &str,
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>>;
}

/// Result of the caption step.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionOutcome {
    /// Captions were found and are non-empty.
    Found(Vec<TranscriptSegment>),
    /// No usable captions; carries the reason.
    Unavailable(String),
    /// The caller asked to bypass captions.
    Skipped,
}

/// Run the caption step, folding every failure into [`CaptionOutcome::Unavailable`].
pub async fn fetch_outcome(
    source: &dyn CaptionSource,
    video_id: &str,
    language: Option<&str>,
) -> CaptionOutcome {
    match source.fetch_captions(video_id, language).await {
        Ok(segments) if segments.is_empty() => {
            info!("Captions for {} are empty", video_id);
            CaptionOutcome::Unavailable("caption track is empty".to_string())
        }
        Ok(segments) => CaptionOutcome::Found(segments),
        Err(e) => {
            info!("Could not get captions for {}: {}", video_id, e);
            CaptionOutcome::Unavailable(e.to_string())
        }
    }
}
