//! Configuration settings for tubescribe.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable selecting the Whisper model size.
pub const WHISPER_MODEL_ENV: &str = "WHISPER_MODEL";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub whisper: WhisperSettings,
    pub download: DownloadSettings,
    pub captions: CaptionSettings,
    pub metadata: MetadataSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Whisper model sizes accepted by the recognizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    /// All accepted sizes, smallest first.
    pub const ALL: [ModelSize; 5] = [
        ModelSize::Tiny,
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::Large,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// Parse a configured value, falling back to `base` on anything unknown.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.parse() {
            Ok(size) => size,
            Err(_) => {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                warn!("Invalid {} '{}'. Using 'base' instead.", WHISPER_MODEL_ENV, raw);
                info!("Valid models: {}", valid.join(", "));
                ModelSize::default()
            }
        }
    }
}

impl std::str::FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            _ => Err(format!("Unknown Whisper model size: {}", s)),
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local Whisper recognizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperSettings {
    /// Model size passed to the recognizer.
    pub model: ModelSize,
    /// Whisper executable.
    pub program: String,
    /// Upper bound for a single recognition run.
    pub timeout_seconds: u64,
    /// Maximum recognition runs in flight at once.
    pub max_concurrent: usize,
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model: ModelSize::Base,
            program: "whisper".to_string(),
            timeout_seconds: 1800,
            max_concurrent: 1,
        }
    }
}

/// Audio download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// yt-dlp executable.
    pub program: String,
    /// Root directory for per-request scratch directories.
    pub temp_dir: String,
    /// Upper bound for a single download.
    pub timeout_seconds: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            temp_dir: std::env::temp_dir()
                .join("tubescribe")
                .to_string_lossy()
                .into_owned(),
            timeout_seconds: 600,
        }
    }
}

/// Caption lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Languages tried, in order, when the request names none.
    pub default_languages: Vec<String>,
    /// HTTP timeout for caption requests.
    pub timeout_seconds: u64,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            default_languages: vec!["en".to_string()],
            timeout_seconds: 30,
        }
    }
}

/// Metadata lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Upper bound for the yt-dlp info lookup.
    pub timeout_seconds: u64,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self { timeout_seconds: 60 }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied on top of the file.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else if path.is_some() {
            return Err(crate::error::ScribeError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        } else {
            Settings::default()
        };

        settings.apply_env();
        Ok(settings)
    }

    /// Apply overrides from environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(WHISPER_MODEL_ENV) {
            self.apply_model_override(&raw);
        }
    }

    /// Override the Whisper model size from a raw string value.
    pub fn apply_model_override(&mut self, raw: &str) {
        self.whisper.model = ModelSize::parse_or_default(raw);
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubescribe")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded scratch root directory.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.download.temp_dir)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download.timeout_seconds)
    }

    pub fn whisper_timeout(&self) -> Duration {
        Duration::from_secs(self.whisper.timeout_seconds)
    }

    pub fn caption_timeout(&self) -> Duration {
        Duration::from_secs(self.captions.timeout_seconds)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_size_parsing() {
        assert_eq!("tiny".parse::<ModelSize>(), Ok(ModelSize::Tiny));
        assert_eq!("LARGE".parse::<ModelSize>(), Ok(ModelSize::Large));
        assert_eq!(" medium ".parse::<ModelSize>(), Ok(ModelSize::Medium));
        assert!("huge".parse::<ModelSize>().is_err());
    }

    #[test]
    fn test_invalid_model_falls_back_to_base() {
        assert_eq!(ModelSize::parse_or_default("huge"), ModelSize::Base);
        assert_eq!(ModelSize::parse_or_default(""), ModelSize::Base);
        assert_eq!(ModelSize::parse_or_default("Small"), ModelSize::Small);
    }

    #[test]
    fn test_model_override() {
        let mut settings = Settings::default();
        settings.apply_model_override("medium");
        assert_eq!(settings.whisper.model, ModelSize::Medium);

        settings.apply_model_override("huge");
        assert_eq!(settings.whisper.model, ModelSize::Base);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.whisper.model, ModelSize::Base);
        assert_eq!(settings.download.program, "yt-dlp");
        assert_eq!(settings.captions.default_languages, vec!["en".to_string()]);
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [whisper]
            model = "small"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(settings.whisper.model, ModelSize::Small);
        assert_eq!(settings.whisper.program, "whisper");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[download]\ntimeout_seconds = 42\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.download.timeout_seconds, 42);
        assert_eq!(settings.download_timeout(), Duration::from_secs(42));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(Settings::load_from(Some(&path)).is_err());
    }
}
