//! Per-request scratch directories for downloaded audio.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// A uniquely named temporary directory owned by one fallback run.
///
/// The directory and everything in it are removed when the guard is dropped,
/// whichever way the owning step exits. Removal failures are logged only.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a new scratch directory under `root`, named after the video.
    pub fn create(root: &Path, video_id: &str) -> Result<Self> {
        std::fs::create_dir_all(root)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", video_id))
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        debug!("Created scratch directory {}", path.display());

        Ok(Self {
            path,
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!("Removed scratch directory {}", self.path.display()),
                Err(e) => warn!(
                    "Could not clean up scratch directory {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path(), "dQw4w9WgXcQ").unwrap();
        let path = scratch.path().to_path_buf();

        std::fs::write(path.join("dQw4w9WgXcQ.wav"), b"RIFF").unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("dQw4w9WgXcQ-")));

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_dirs_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = ScratchDir::create(root.path(), "abc").unwrap();
        let b = ScratchDir::create(root.path(), "abc").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_root_is_created() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let scratch = ScratchDir::create(&nested, "abc").unwrap();
        assert!(scratch.path().starts_with(&nested));
    }
}
