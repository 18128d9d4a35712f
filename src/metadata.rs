//! Video metadata lookup.
//!
//! Metadata only enriches a transcript; lookups never fail a request.

use crate::config::MetadataSettings;
use crate::error::{Result, ScribeError};
use crate::video_id::watch_url;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Descriptive information about a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub description: Option<String>,
}

impl VideoMetadata {
    /// Extract the fields we care about from a yt-dlp info dict.
    pub fn from_info_json(json: &serde_json::Value) -> Self {
        Self {
            title: json["title"].as_str().map(|s| s.to_string()),
            duration: json["duration"].as_f64(),
            uploader: json["uploader"]
                .as_str()
                .or_else(|| json["channel"].as_str())
                .map(|s| s.to_string()),
            description: json["description"].as_str().map(|s| s.to_string()),
        }
    }
}

/// Trait for metadata providers.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata>;
}

/// Fetch metadata, converting any failure into empty metadata.
pub async fn fetch_best_effort(source: &dyn MetadataSource, video_id: &str) -> VideoMetadata {
    match source.fetch_metadata(video_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Could not extract video info for {}: {}", video_id, e);
            VideoMetadata::default()
        }
    }
}

/// yt-dlp backed metadata provider.
pub struct YtDlpMetadata {
    program: String,
    timeout: Duration,
}

impl YtDlpMetadata {
    pub fn new(program: impl Into<String>, settings: &MetadataSettings) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(settings.timeout_seconds),
        }
    }
}

#[async_trait]
impl MetadataSource for YtDlpMetadata {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let url = watch_url(video_id);

        let mut cmd = Command::new(&self.program);
        cmd.args(["--dump-json", "--no-download", "--no-playlist", "--no-warnings", &url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => return Err(ScribeError::Timeout("Metadata lookup", self.timeout.as_secs())),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScribeError::ToolNotFound(self.program.clone()));
            }
            Ok(Err(e)) => {
                return Err(ScribeError::Metadata(format!("Failed to run yt-dlp: {}", e)));
            }
            Ok(Ok(o)) => o,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScribeError::Metadata(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            ScribeError::Metadata(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        let metadata = VideoMetadata::from_info_json(&json);
        debug!("Fetched metadata: {:?}", metadata.title);
        Ok(metadata)
    }
}
