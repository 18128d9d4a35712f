//! CLI module for tubescribe.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// tubescribe - YouTube transcripts from captions or local Whisper
///
/// Serves an HTTP API that returns timestamped transcripts, preferring the
/// video's own captions and falling back to speech recognition on its audio.
#[derive(Parser, Debug)]
#[command(name = "tubescribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP transcription API
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Transcribe one video without starting the server
    Transcribe {
        /// YouTube URL or 11-character video ID
        input: String,

        /// Preferred caption language (e.g. "en", "de")
        #[arg(short, long)]
        language: Option<String>,

        /// Skip captions and always run Whisper on the audio
        #[arg(long)]
        use_whisper: bool,

        /// Output format (json, srt, vtt, text)
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check external tools and show the effective configuration
    Doctor,
}
