//! Configuration module for tubescribe.
//!
//! Settings are read from a TOML file and then overridden from the environment.

mod settings;

pub use settings::{
    CaptionSettings, DownloadSettings, MetadataSettings, ModelSize, ServerSettings, Settings,
    WhisperSettings, WHISPER_MODEL_ENV,
};
