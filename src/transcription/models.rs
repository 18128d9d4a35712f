//! Data models for transcripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Language reported for transcripts produced by the recognizer.
pub const AUTO_DETECTED_LANGUAGE: &str = "auto-detected";

/// A single timed unit of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Segment text.
    pub text: String,
}

impl TranscriptSegment {
    /// Create a new segment. Negative or NaN offsets are clamped to zero.
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start: non_negative(start),
            duration: non_negative(duration),
            text: text.into(),
        }
    }

    /// End offset in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Raw segment as produced by the speech recognizer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognizedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<RecognizedSegment> for TranscriptSegment {
    fn from(seg: RecognizedSegment) -> Self {
        TranscriptSegment::new(seg.start, seg.end - seg.start, seg.text.trim())
    }
}

/// Where a transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSource {
    Captions,
    Fallback,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Captions => write!(f, "captions"),
            TranscriptSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A transcript request, as accepted by the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRequest {
    /// YouTube URL or bare video ID.
    pub url: String,
    /// Preferred caption language.
    #[serde(default)]
    pub language: Option<String>,
    /// Skip captions and always run speech recognition.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub use_whisper: bool,
}

impl TranscriptRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            language: None,
            use_whisper: false,
        }
    }

    /// The requested caption language; blank means no preference.
    pub fn preferred_language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }
}

/// Accepts a JSON boolean or a query-string flag (`""`, `0`/`1`, `true`/`false`,
/// `yes`/`no`, `on`/`off`).
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_lowercase().as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "use_whisper: expected a boolean, got '{}'",
                other
            ))),
        },
    }
}

/// A finished transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub video_id: String,
    pub title: Option<String>,
    /// Video duration in seconds.
    pub duration: Option<f64>,
    pub language: Option<String>,
    pub source: TranscriptSource,
    pub segments: Vec<TranscriptSegment>,
    pub created_at: DateTime<Utc>,
}

/// Whether segment end times never decrease.
///
/// Caption tracks do not guarantee this, so callers log rather than reject.
pub fn segments_monotonic(segments: &[TranscriptSegment]) -> bool {
    segments.windows(2).all(|pair| pair[1].end() >= pair[0].end())
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
