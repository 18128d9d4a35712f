//! Audio download via yt-dlp.
//!
//! yt-dlp fetches the best available audio stream and has ffmpeg transcode
//! it to WAV, which is what the recognizer reads.

use super::AudioDownloader;
use crate::config::DownloadSettings;
use crate::error::{Result, ScribeError};
use crate::video_id::watch_url;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, instrument};

/// Container the downloaded audio is transcoded to.
pub const AUDIO_FORMAT: &str = "wav";

/// yt-dlp backed audio downloader.
pub struct YtDlpDownloader {
    program: String,
    timeout: Duration,
}

impl YtDlpDownloader {
    pub fn with_config(settings: &DownloadSettings) -> Self {
        Self {
            program: settings.program.clone(),
            timeout: Duration::from_secs(settings.timeout_seconds),
        }
    }
}

#[async_trait]
impl AudioDownloader for YtDlpDownloader {
    #[instrument(skip(self, output_dir), fields(video_id = %video_id))]
    async fn download_audio(&self, video_id: &str, output_dir: &Path) -> Result<PathBuf> {
        let url = watch_url(video_id);
        info!("Downloading audio from {}", url);

        let template = output_dir.join(format!("{}.%(ext)s", video_id));

        let mut cmd = Command::new(&self.program);
        cmd.arg("--format").arg("bestaudio/best")
            .arg("--extract-audio")
            .arg("--audio-format").arg(AUDIO_FORMAT)
            .arg("--output").arg(&template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(&url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                return Err(ScribeError::Timeout("Audio download", self.timeout.as_secs()));
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScribeError::ToolNotFound(self.program.clone()));
            }
            Ok(Err(e)) => {
                return Err(ScribeError::AudioDownload(format!("yt-dlp execution failed: {e}")));
            }
            Ok(Ok(o)) => o,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScribeError::AudioDownload(format!("yt-dlp failed: {}", stderr.trim())));
        }

        find_audio_file(output_dir, video_id)
    }
}

/// Locates the transcoded audio file for a video by filename prefix.
pub fn find_audio_file(dir: &Path, video_id: &str) -> Result<PathBuf> {
    let suffix = format!(".{}", AUDIO_FORMAT);
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ScribeError::AudioNotFound(format!("Cannot read {}: {e}", dir.display())))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(video_id) && name.ends_with(&suffix) {
            return Ok(entry.path());
        }
    }

    Err(ScribeError::AudioNotFound(video_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_audio_file_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.webm.part"), b"").unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.wav"), b"RIFF").unwrap();

        let found = find_audio_file(dir.path(), "dQw4w9WgXcQ").unwrap();
        assert_eq!(found, dir.path().join("dQw4w9WgXcQ.wav"));
    }

    #[test]
    fn test_find_audio_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other_video.wav"), b"RIFF").unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.m4a"), b"").unwrap();

        assert!(matches!(
            find_audio_file(dir.path(), "dQw4w9WgXcQ"),
            Err(ScribeError::AudioNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let downloader = YtDlpDownloader::with_config(&DownloadSettings {
            program: "tubescribe-no-such-ytdlp".to_string(),
            ..DownloadSettings::default()
        });
        let dir = tempfile::tempdir().unwrap();

        let err = downloader
            .download_audio("dQw4w9WgXcQ", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::ToolNotFound(_)));
    }
}
