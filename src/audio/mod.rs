//! Audio acquisition for the fallback path.
//!
//! Downloads land in a per-request [`ScratchDir`] that is removed when the
//! fallback step finishes.

mod downloader;
mod scratch;

pub use downloader::{find_audio_file, YtDlpDownloader, AUDIO_FORMAT};
pub use scratch::ScratchDir;

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for audio download backends.
#[async_trait]
pub trait AudioDownloader: Send + Sync {
    /// Download audio for a video into `output_dir` and return the file path.
    async fn download_audio(&self, video_id: &str, output_dir: &Path) -> Result<PathBuf>;
}
