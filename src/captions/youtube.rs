//! YouTube caption tracks.
//!
//! Tracks are listed from the player response embedded in the watch page and
//! fetched from the timedtext endpoint in `json3` format.

use super::{CaptionSource, CaptionTrack};
use crate::config::CaptionSettings;
use crate::error::{Result, ScribeError};
use crate::transcription::TranscriptSegment;
use crate::video_id::watch_url;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

/// Caption provider backed by youtube.com.
pub struct YoutubeCaptions {
    client: reqwest::Client,
    default_languages: Vec<String>,
}

impl YoutubeCaptions {
    pub fn with_config(settings: &CaptionSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("tubescribe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            default_languages: settings.default_languages.clone(),
        })
    }

    /// List the caption tracks available for a video.
    #[instrument(skip(self))]
    pub async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let html = self
            .client
            .get(watch_url(video_id))
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tracks = parse_caption_tracks(&html)?;
        debug!("Found {} caption tracks", tracks.len());
        Ok(tracks)
    }

    /// Fetch one track and convert it to segments.
    #[instrument(skip(self, track), fields(language = %track.language_code))]
    pub async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>> {
        let url = json3_url(&track.base_url)?;
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_json3(&body)
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptions {
    async fn fetch_captions(
        &self,
        video_id: &str,
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>> {
        let languages: Vec<String> = match language {
            Some(lang) => vec![lang.to_string()],
            None => self.default_languages.clone(),
        };

        let tracks = self.list_tracks(video_id).await?;
        let track = find_track(&tracks, &languages)?;
        self.fetch_track(track).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: RawName,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    text: String,
}

impl From<RawTrack> for CaptionTrack {
    fn from(raw: RawTrack) -> Self {
        let name = raw.name.simple_text.unwrap_or_else(|| {
            raw.name
                .runs
                .iter()
                .map(|r| r.text.as_str())
                .collect::<String>()
        });

        CaptionTrack {
            is_generated: raw.kind.as_deref() == Some("asr"),
            language_code: raw.language_code,
            name,
            base_url: raw.base_url,
        }
    }
}

/// Extract caption tracks from a watch page.
pub fn parse_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>> {
    let Some(start) = html.find(CAPTION_TRACKS_KEY) else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(ScribeError::CaptionsUnavailable(
                "YouTube is rate-limiting requests from this address".to_string(),
            ));
        }
        return Err(ScribeError::CaptionsUnavailable(
            "Subtitles are disabled for this video".to_string(),
        ));
    };

    // The array is followed by the rest of the page; read a single JSON value.
    let rest = &html[start + CAPTION_TRACKS_KEY.len()..];
    let raw: Vec<RawTrack> = serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<RawTrack>>()
        .next()
        .ok_or_else(|| ScribeError::CaptionsUnavailable("Empty caption track list".to_string()))??;

    Ok(raw.into_iter().map(CaptionTrack::from).collect())
}

/// Pick a track for the first language that has one, preferring manual captions.
pub fn find_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Result<&'a CaptionTrack> {
    for language in languages {
        let manual = tracks
            .iter()
            .find(|t| &t.language_code == language && !t.is_generated);
        let generated = || {
            tracks
                .iter()
                .find(|t| &t.language_code == language && t.is_generated)
        };

        if let Some(track) = manual.or_else(generated) {
            return Ok(track);
        }
    }

    let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
    Err(ScribeError::CaptionsUnavailable(format!(
        "No transcript found for {:?} (available: {})",
        languages,
        if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        }
    )))
}

/// Force the `json3` format on a timedtext URL.
pub fn json3_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ScribeError::CaptionsUnavailable(format!("Bad caption URL: {e}")))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: f64,
    #[serde(default)]
    d_duration_ms: f64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Convert a `json3` caption body into segments, dropping empty events.
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>> {
    let doc: Json3 = serde_json::from_str(body)
        .map_err(|e| ScribeError::CaptionsUnavailable(format!("Malformed caption track: {e}")))?;

    let segments = doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment::new(
                event.t_start_ms / 1000.0,
                event.d_duration_ms / 1000.0,
                text,
            ))
        })
        .collect();

    Ok(segments)
}
