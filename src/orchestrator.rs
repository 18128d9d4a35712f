//! Pipeline orchestrator for tubescribe.
//!
//! Resolves the video, gathers metadata, tries captions and falls back to
//! local speech recognition on downloaded audio.

use crate::audio::{AudioDownloader, ScratchDir, YtDlpDownloader};
use crate::captions::{fetch_outcome, CaptionOutcome, CaptionSource, YoutubeCaptions};
use crate::config::Settings;
use crate::error::Result;
use crate::metadata::{fetch_best_effort, MetadataSource, YtDlpMetadata};
use crate::transcription::{
    segments_monotonic, Recognizer, TranscriptRequest, TranscriptResponse, TranscriptSegment,
    TranscriptSource, WhisperCli, AUTO_DETECTED_LANGUAGE,
};
use crate::video_id::resolve_video_id;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The main orchestrator for the transcript pipeline.
pub struct Orchestrator {
    settings: Settings,
    metadata: Arc<dyn MetadataSource>,
    captions: Arc<dyn CaptionSource>,
    downloader: Arc<dyn AudioDownloader>,
    recognizer: Arc<dyn Recognizer>,
    temp_dir: PathBuf,
}

impl Orchestrator {
    /// Create an orchestrator with the default collaborators.
    pub fn new(settings: Settings) -> Result<Self> {
        let metadata = Arc::new(YtDlpMetadata::new(
            settings.download.program.clone(),
            &settings.metadata,
        ));
        let captions = Arc::new(YoutubeCaptions::with_config(&settings.captions)?);
        let downloader = Arc::new(YtDlpDownloader::with_config(&settings.download));

        info!("Using Whisper model: {}", settings.whisper.model);
        let recognizer = Arc::new(WhisperCli::with_config(&settings.whisper));

        Ok(Self::with_components(
            settings, metadata, captions, downloader, recognizer,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        metadata: Arc<dyn MetadataSource>,
        captions: Arc<dyn CaptionSource>,
        downloader: Arc<dyn AudioDownloader>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        let temp_dir = settings.temp_dir();

        Self {
            settings,
            metadata,
            captions,
            downloader,
            recognizer,
            temp_dir,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a reference to the recognizer.
    pub fn recognizer(&self) -> Arc<dyn Recognizer> {
        self.recognizer.clone()
    }

    /// Produce a transcript for the requested video.
    #[instrument(skip(self, request), fields(input = %request.url))]
    pub async fn transcribe(&self, request: &TranscriptRequest) -> Result<TranscriptResponse> {
        let video_id = resolve_video_id(&request.url)?;
        info!("Processing video: {}", video_id);

        let metadata = fetch_best_effort(self.metadata.as_ref(), &video_id).await;
        let language = request.preferred_language();

        let outcome = if request.use_whisper {
            CaptionOutcome::Skipped
        } else {
            fetch_outcome(self.captions.as_ref(), &video_id, language).await
        };

        let (segments, source, language) = match outcome {
            CaptionOutcome::Found(segments) => {
                info!("Successfully got captions for {}", video_id);
                if !segments_monotonic(&segments) {
                    warn!("Caption segments for {} overlap out of order", video_id);
                }
                (segments, TranscriptSource::Captions, language.map(str::to_string))
            }
            CaptionOutcome::Unavailable(reason) => {
                info!("Captions not available for {}, falling back to Whisper: {}", video_id, reason);
                let segments = self.run_fallback(&video_id).await?;
                (segments, TranscriptSource::Fallback, Some(AUTO_DETECTED_LANGUAGE.to_string()))
            }
            CaptionOutcome::Skipped => {
                info!("Whisper forced for {}", video_id);
                let segments = self.run_fallback(&video_id).await?;
                (segments, TranscriptSource::Fallback, Some(AUTO_DETECTED_LANGUAGE.to_string()))
            }
        };

        Ok(TranscriptResponse {
            video_id,
            title: metadata.title,
            duration: metadata.duration,
            language,
            source,
            segments,
            created_at: Utc::now(),
        })
    }

    /// Download audio into a scratch directory and run speech recognition.
    ///
    /// The scratch directory is removed when this returns, on every path.
    #[instrument(skip(self))]
    async fn run_fallback(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let scratch = ScratchDir::create(&self.temp_dir, video_id)?;

        let audio_path = self
            .downloader
            .download_audio(video_id, scratch.path())
            .await?;

        let segments = self.recognizer.recognize(&audio_path).await?;
        info!("Successfully transcribed {} with Whisper ({} segments)", video_id, segments.len());

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScribeError;
    use crate::testing::{harness, FakeDownloader};
    use std::sync::atomic::Ordering;

    fn caption_segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new(0.0, 1.5, "All right, so here we are"),
            TranscriptSegment::new(1.5, 2.5, "in front of the elephants"),
        ]
    }

    fn request(url: &str, language: Option<&str>, use_whisper: bool) -> TranscriptRequest {
        TranscriptRequest {
            url: url.to_string(),
            language: language.map(|l| l.to_string()),
            use_whisper,
        }
    }

    fn assert_scratch_removed(downloader: &FakeDownloader) {
        let dir = downloader.last_dir.lock().unwrap().clone().expect("downloader ran");
        assert!(!dir.exists(), "scratch dir {} still exists", dir.display());
    }

    #[tokio::test]
    async fn test_captions_preferred() {
        let h = harness(true, Some(caption_segments()), true, true);

        let response = h
            .orchestrator
            .transcribe(&request("https://youtu.be/jNQXAC9IVRw", Some("de"), false))
            .await
            .unwrap();

        assert_eq!(response.video_id, "jNQXAC9IVRw");
        assert_eq!(response.source, TranscriptSource::Captions);
        assert_eq!(response.language.as_deref(), Some("de"));
        assert_eq!(response.segments, caption_segments());
        assert_eq!(response.title.as_deref(), Some("Video jNQXAC9IVRw"));
        assert_eq!(response.duration, Some(212.0));
        assert_eq!(h.captions.last_language.lock().unwrap().as_deref(), Some("de"));
        assert_eq!(h.downloader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_when_captions_missing() {
        let h = harness(true, None, true, true);

        let response = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", None, false))
            .await
            .unwrap();

        assert_eq!(response.source, TranscriptSource::Fallback);
        assert_eq!(response.language.as_deref(), Some(AUTO_DETECTED_LANGUAGE));
        assert_eq!(response.segments.len(), 2);
        assert_eq!(response.segments[1].text, "give you up");
        assert_scratch_removed(&h.downloader);
    }

    #[tokio::test]
    async fn test_fallback_when_captions_empty() {
        let h = harness(true, Some(vec![]), true, true);

        let response = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", Some("en"), false))
            .await
            .unwrap();

        assert_eq!(response.source, TranscriptSource::Fallback);
        assert_eq!(response.language.as_deref(), Some(AUTO_DETECTED_LANGUAGE));
    }

    #[tokio::test]
    async fn test_forced_fallback_skips_captions() {
        let h = harness(true, Some(caption_segments()), true, true);

        let response = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", Some("en"), true))
            .await
            .unwrap();

        assert_eq!(response.source, TranscriptSource::Fallback);
        assert_eq!(response.language.as_deref(), Some(AUTO_DETECTED_LANGUAGE));
        assert_eq!(h.captions.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.downloader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recognition_failure_still_cleans_up() {
        let h = harness(true, None, true, false);

        let err = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", None, false))
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Recognition(_)));
        assert_scratch_removed(&h.downloader);
    }

    #[tokio::test]
    async fn test_missing_audio_file() {
        let h = harness(true, None, false, true);

        let err = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", None, false))
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::AudioNotFound(_)));
        assert_scratch_removed(&h.downloader);
    }

    #[tokio::test]
    async fn test_metadata_failure_is_not_fatal() {
        let h = harness(false, Some(caption_segments()), true, true);

        let response = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", None, false))
            .await
            .unwrap();

        assert_eq!(response.source, TranscriptSource::Captions);
        assert!(response.title.is_none());
        assert!(response.duration.is_none());
        assert!(response.language.is_none());
    }

    #[tokio::test]
    async fn test_blank_language_uses_default_captions() {
        let h = harness(true, Some(caption_segments()), true, true);

        let response = h
            .orchestrator
            .transcribe(&request("dQw4w9WgXcQ", Some(" "), false))
            .await
            .unwrap();

        assert_eq!(response.source, TranscriptSource::Captions);
        assert!(response.language.is_none());
        assert_eq!(h.captions.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*h.captions.last_language.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_identifier() {
        let h = harness(true, Some(caption_segments()), true, true);

        let err = h
            .orchestrator
            .transcribe(&request("not a url", None, false))
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::InvalidIdentifier(_)));
        assert_eq!(h.captions.calls.load(Ordering::SeqCst), 0);
    }
}
