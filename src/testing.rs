//! In-memory collaborators for pipeline tests.

use crate::audio::{find_audio_file, AudioDownloader};
use crate::captions::CaptionSource;
use crate::config::{ModelSize, Settings};
use crate::error::{Result, ScribeError};
use crate::metadata::{MetadataSource, VideoMetadata};
use crate::orchestrator::Orchestrator;
use crate::transcription::{Recognizer, TranscriptSegment};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns a fixed title and duration, or fails when constructed with `false`.
pub(crate) struct FakeMetadata(pub bool);

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        if self.0 {
            Ok(VideoMetadata {
                title: Some(format!("Video {}", video_id)),
                duration: Some(212.0),
                ..VideoMetadata::default()
            })
        } else {
            Err(ScribeError::Metadata("private video".to_string()))
        }
    }
}

/// Serves `segments`, or reports captions as disabled when `None`.
#[derive(Default)]
pub(crate) struct FakeCaptions {
    pub segments: Option<Vec<TranscriptSegment>>,
    pub calls: AtomicUsize,
    pub last_language: Mutex<Option<String>>,
}

#[async_trait]
impl CaptionSource for FakeCaptions {
    async fn fetch_captions(
        &self,
        _video_id: &str,
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_language.lock().unwrap() = language.map(|l| l.to_string());
        self.segments
            .clone()
            .ok_or_else(|| ScribeError::CaptionsUnavailable("disabled".to_string()))
    }
}

/// Writes `<id>.wav` into the scratch directory when `write_file` is set.
#[derive(Default)]
pub(crate) struct FakeDownloader {
    pub write_file: bool,
    pub calls: AtomicUsize,
    pub last_dir: Mutex<Option<PathBuf>>,
}

#[async_trait]
impl AudioDownloader for FakeDownloader {
    async fn download_audio(&self, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_dir.lock().unwrap() = Some(output_dir.to_path_buf());
        if self.write_file {
            std::fs::write(output_dir.join(format!("{}.wav", video_id)), b"RIFF")?;
        }
        find_audio_file(output_dir, video_id)
    }
}

/// Recognizes two fixed segments, or fails when `ok` is false.
pub(crate) struct FakeRecognizer {
    pub ok: bool,
    pub model: ModelSize,
}

#[async_trait]
impl Recognizer for FakeRecognizer {
    fn model_size(&self) -> ModelSize {
        self.model
    }

    fn is_loaded(&self) -> bool {
        false
    }

    async fn recognize(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>> {
        assert!(audio_path.exists());
        if self.ok {
            Ok(vec![
                TranscriptSegment::new(0.0, 2.0, "never gonna"),
                TranscriptSegment::new(2.0, 1.5, "give you up"),
            ])
        } else {
            Err(ScribeError::Recognition("model crashed".to_string()))
        }
    }
}

/// An orchestrator wired to fakes, with handles to inspect them.
pub(crate) struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub captions: Arc<FakeCaptions>,
    pub downloader: Arc<FakeDownloader>,
    _root: tempfile::TempDir,
}

pub(crate) fn harness(
    metadata_ok: bool,
    captions: Option<Vec<TranscriptSegment>>,
    write_audio: bool,
    recognizer_ok: bool,
) -> Harness {
    harness_with(
        Settings::default(),
        metadata_ok,
        captions,
        write_audio,
        recognizer_ok,
    )
}

/// Like [`harness`], with the recognizer model taken from `settings`.
pub(crate) fn harness_with(
    mut settings: Settings,
    metadata_ok: bool,
    captions: Option<Vec<TranscriptSegment>>,
    write_audio: bool,
    recognizer_ok: bool,
) -> Harness {
    let root = tempfile::tempdir().unwrap();
    settings.download.temp_dir = root.path().to_string_lossy().into_owned();

    let captions = Arc::new(FakeCaptions {
        segments: captions,
        ..FakeCaptions::default()
    });
    let downloader = Arc::new(FakeDownloader {
        write_file: write_audio,
        ..FakeDownloader::default()
    });

    let recognizer = Arc::new(FakeRecognizer {
        ok: recognizer_ok,
        model: settings.whisper.model,
    });

    let orchestrator = Orchestrator::with_components(
        settings,
        Arc::new(FakeMetadata(metadata_ok)),
        captions.clone(),
        downloader.clone(),
        recognizer,
    );

    Harness {
        orchestrator: Arc::new(orchestrator),
        captions,
        downloader,
        _root: root,
    }
}
