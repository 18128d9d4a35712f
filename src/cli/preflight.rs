//! Pre-flight checks before expensive operations.
//!
//! Verifies that the external tools the pipeline shells out to are on the
//! path. Failures are reported, never fatal: captions work without any of
//! them.

use crate::config::Settings;
use crate::error::{Result, ScribeError};
use std::process::Command;

/// An external tool the pipeline depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub name: String,
    version_arg: &'static str,
}

impl Tool {
    fn new(name: &str) -> Self {
        // ffmpeg uses -version (single dash), the others use --version
        let version_arg = match name {
            "ffmpeg" | "ffprobe" => "-version",
            _ => "--version",
        };
        Self {
            name: name.to_string(),
            version_arg,
        }
    }

    /// Run the tool's version command and return the first line of output.
    pub fn probe(&self) -> Result<String> {
        check_tool(&self.name, self.version_arg)
    }
}

/// The tools needed by the fallback path, as configured.
pub fn required_tools(settings: &Settings) -> Vec<Tool> {
    vec![
        Tool::new(&settings.download.program),
        Tool::new("ffmpeg"),
        Tool::new(&settings.whisper.program),
    ]
}

/// Check every required tool, returning the ones that are missing or broken.
pub fn missing_tools(settings: &Settings) -> Vec<(Tool, ScribeError)> {
    required_tools(settings)
        .into_iter()
        .filter_map(|tool| match tool.probe() {
            Ok(_) => None,
            Err(e) => Some((tool, e)),
        })
        .collect()
}

fn check_tool(name: &str, version_arg: &str) -> Result<String> {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(stdout.lines().next().unwrap_or("installed").trim().to_string())
        }
        Ok(_) => Err(ScribeError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ScribeError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(ScribeError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
