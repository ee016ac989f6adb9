//! # Kolam Studio
//!
//! Headless host for the Pongal kolam studio.
//!
//! Places motifs over a photo (or camera frame), replays scripted touch
//! sessions, captures the composition and sends it to an AI generation
//! service.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p kolam-studio -- --background street.jpg --script session.json --no-ai
//! ```
//!
//! ## With a generation service:
//!
//! ```bash
//! KOLAM_AI_URL=https://ai.example.com/v1/kolam KOLAM_AI_KEY=... \
//!   cargo run -p kolam-studio -- --background street.jpg --script session.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StudioConfig` - Viewport, export size, service and output settings
//! - `Studio` - Capture / generation pipeline around a `StudioState`
//! - `HttpGenerationService` - reqwest client for the generation endpoint

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ai;
pub mod camera;
pub mod pipeline;
pub mod script;

pub use ai::{GenerationError, GenerationService, HttpGenerationService, UnconfiguredService};
pub use camera::{StillFrameSource, StillFrameStream};
pub use pipeline::{GenerationOutcome, Studio, StudioError, ARTIFACT_FILENAME};
pub use script::{ScriptAction, ScriptError, ScriptSummary, SessionScript};

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use kolam_core::{Viewport, MAX_ITEMS};

/// Default request timeout for the generation service, in seconds.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for kolam-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "kolam-studio")]
#[command(about = "Pongal kolam studio: place motifs over a photo and generate a festive image")]
#[command(version)]
pub struct CliArgs {
    /// Generation service endpoint (e.g., <https://ai.example.com/v1/kolam>)
    #[arg(long, env = "KOLAM_AI_URL")]
    pub ai_url: Option<String>,

    /// Bearer key for the generation service
    #[arg(long, env = "KOLAM_AI_KEY", hide_env_values = true)]
    pub ai_key: Option<String>,

    /// Generation request timeout in seconds
    #[arg(long, env = "KOLAM_AI_TIMEOUT", default_value_t = DEFAULT_AI_TIMEOUT_SECS)]
    pub ai_timeout: u64,

    /// Skip the generation service and save the plain capture
    #[arg(long)]
    pub no_ai: bool,

    /// Live viewport width in pixels
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Live viewport height in pixels
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Export width in pixels (defaults to the viewport width)
    #[arg(long)]
    pub export_width: Option<u32>,

    /// Export height in pixels (defaults to the viewport height)
    #[arg(long)]
    pub export_height: Option<u32>,

    /// Photo to use as background instead of the camera
    #[arg(long, env = "KOLAM_BACKGROUND")]
    pub background: Option<PathBuf>,

    /// Still image served as the camera feed
    #[arg(long)]
    pub camera_frame: Option<PathBuf>,

    /// JSON session script to replay
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Directory the artifact is written to
    #[arg(long, env = "KOLAM_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum number of placed items
    #[arg(long, default_value_t = MAX_ITEMS)]
    pub max_items: usize,
}

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Live viewport width in pixels.
    pub width: u32,
    /// Live viewport height in pixels.
    pub height: u32,
    /// Export width; `None` uses the viewport width.
    pub export_width: Option<u32>,
    /// Export height; `None` uses the viewport height.
    pub export_height: Option<u32>,
    /// Generation service endpoint.
    pub ai_url: Option<String>,
    /// Generation service bearer key.
    pub ai_key: Option<String>,
    /// Generation request timeout.
    pub ai_timeout: Duration,
    /// Skip generation.
    pub no_ai: bool,
    /// Background photo.
    pub background: Option<PathBuf>,
    /// Still image standing in for the camera.
    pub camera_frame: Option<PathBuf>,
    /// Session script.
    pub script: Option<PathBuf>,
    /// Artifact directory.
    pub output_dir: PathBuf,
    /// Item limit.
    pub max_items: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            export_width: None,
            export_height: None,
            ai_url: None,
            ai_key: None,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            no_ai: false,
            background: None,
            camera_frame: None,
            script: None,
            output_dir: PathBuf::from("."),
            max_items: MAX_ITEMS,
        }
    }

    /// Live viewport.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}

impl From<CliArgs> for StudioConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            export_width: args.export_width,
            export_height: args.export_height,
            ai_url: args.ai_url.filter(|u| !u.is_empty()),
            ai_key: args.ai_key,
            ai_timeout: Duration::from_secs(args.ai_timeout),
            no_ai: args.no_ai,
            background: args.background,
            camera_frame: args.camera_frame,
            script: args.script,
            output_dir: args.output_dir,
            max_items: args.max_items,
        }
    }
}
