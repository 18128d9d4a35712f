//! Error types for tubescribe.

use thiserror::Error;

/// Library-level error type for tubescribe operations.
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Invalid YouTube URL or video ID: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Captions unavailable: {0}")]
    CaptionsUnavailable(String),

    #[error("Metadata unavailable: {0}")]
    Metadata(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Audio file not found after download: {0}")]
    AudioNotFound(String),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    #[error("{0} timed out after {1}s")]
    Timeout(&'static str, u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

impl ScribeError {
    /// Whether the error was caused by the caller's input rather than the pipeline.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScribeError::InvalidIdentifier(_) | ScribeError::InvalidRequest(_)
        )
    }
}

/// Result type alias for tubescribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;
