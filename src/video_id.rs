//! YouTube video ID resolution.
//!
//! Accepts watch, short, embed, shorts and live URLs as well as bare IDs.

use crate::error::{Result, ScribeError};
use regex::Regex;
use std::sync::LazyLock;

/// Ordered URL patterns; the first capture wins.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\s?#/]+)",
        r"youtube\.com/watch\?.*v=([^&\s?#/]+)",
        r"youtube\.com/(?:shorts|live|v)/([^&\s?#/]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("Invalid regex"));

/// Resolve a URL or bare ID into a canonical video ID.
pub fn resolve_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    for pattern in URL_PATTERNS.iter() {
        if let Some(id) = pattern.captures(input).and_then(|caps| caps.get(1)) {
            return Ok(id.as_str().to_string());
        }
    }

    if BARE_ID.is_match(input) {
        return Ok(input.to_string());
    }

    Err(ScribeError::InvalidIdentifier(input.to_string()))
}

/// Canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
