//! Local Whisper recognizer backed by the `whisper` command line tool.

use super::{RecognizedSegment, Recognizer, TranscriptSegment};
use crate::config::{ModelSize, WhisperSettings};
use crate::error::{Result, ScribeError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::{OnceCell, Semaphore};
use tracing::{debug, info, instrument};

/// Engine state established on first use.
#[derive(Debug)]
struct WhisperEngine {
    /// Cached weights, when whisper has already downloaded them.
    weights: Option<PathBuf>,
}

/// Recognizer that shells out to openai-whisper.
///
/// The engine is probed once, on the first recognition request; concurrent
/// first callers wait on the same initialization.
pub struct WhisperCli {
    program: String,
    model: ModelSize,
    timeout: Duration,
    engine: OnceCell<WhisperEngine>,
    permits: Semaphore,
}

impl WhisperCli {
    /// Create a recognizer from settings.
    pub fn with_config(settings: &WhisperSettings) -> Self {
        Self {
            program: settings.program.clone(),
            model: settings.model,
            timeout: Duration::from_secs(settings.timeout_seconds),
            engine: OnceCell::new(),
            permits: Semaphore::new(settings.max_concurrent.max(1)),
        }
    }

    async fn engine(&self) -> Result<&WhisperEngine> {
        self.engine
            .get_or_try_init(|| async {
                info!("Loading Whisper model: {}", self.model);
                let engine = probe_engine(&self.program, self.model).await?;
                match &engine.weights {
                    Some(path) => info!("Whisper model '{}' ready ({})", self.model, path.display()),
                    None => info!(
                        "Whisper model '{}' ready, weights will be fetched on first run",
                        self.model
                    ),
                }
                Ok::<_, ScribeError>(engine)
            })
            .await
    }

    async fn run(&self, audio_path: &Path, output_dir: &Path) -> Result<std::process::Output> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(audio_path)
            .arg("--model").arg(self.model.as_str())
            .arg("--output_format").arg("json")
            .arg("--output_dir").arg(output_dir)
            .arg("--verbose").arg("False")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => Err(ScribeError::Timeout("Speech recognition", self.timeout.as_secs())),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScribeError::ToolNotFound(self.program.clone()))
            }
            Ok(Err(e)) => Err(ScribeError::Recognition(format!("whisper execution failed: {e}"))),
            Ok(Ok(output)) => Ok(output),
        }
    }
}

#[async_trait]
impl Recognizer for WhisperCli {
    fn model_size(&self) -> ModelSize {
        self.model
    }

    fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn recognize(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>> {
        self.engine().await?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ScribeError::Recognition(format!("recognizer closed: {e}")))?;

        let output_dir = tempfile::tempdir()?;
        debug!("Running whisper ({})", self.model);

        let output = self.run(audio_path, output_dir.path()).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScribeError::Recognition(format!("whisper failed: {}", stderr.trim())));
        }

        let stem = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let json_path = output_dir.path().join(format!("{}.json", stem));
        let json = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            ScribeError::Recognition(format!("whisper produced no output at {}: {e}", json_path.display()))
        })?;

        let segments = parse_whisper_json(&json)?;
        debug!("Recognized {} segments", segments.len());
        Ok(segments)
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<RecognizedSegment>,
}

/// Parse whisper's JSON output into transcript segments.
pub fn parse_whisper_json(json: &str) -> Result<Vec<TranscriptSegment>> {
    let output: WhisperOutput = serde_json::from_str(json)
        .map_err(|e| ScribeError::Recognition(format!("Invalid whisper output: {e}")))?;

    Ok(output.segments.into_iter().map(TranscriptSegment::from).collect())
}

/// Check that the whisper executable runs and locate cached weights.
async fn probe_engine(program: &str, model: ModelSize) -> Result<WhisperEngine> {
    let result = Command::new(program)
        .arg("--help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await;

    match result {
        Ok(status) if status.success() => Ok(WhisperEngine {
            weights: cached_weights(model),
        }),
        Ok(status) => Err(ScribeError::Recognition(format!(
            "{} is installed but not working correctly ({})",
            program, status
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ScribeError::ToolNotFound(program.to_string()))
        }
        Err(e) => Err(ScribeError::Recognition(format!("{}: {}", program, e))),
    }
}

/// Whisper keeps downloaded weights under `<cache>/whisper/<name>*.pt`.
fn cached_weights(model: ModelSize) -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("whisper");
    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| {
            path.extension().is_some_and(|ext| ext == "pt")
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|stem| {
                        stem == model.as_str() || stem.starts_with(&format!("{}-", model.as_str()))
                    })
        })
}
