//! # Kolam Studio
//!
//! Headless host: load a background, replay a session, capture and generate.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kolam_core::{ExportState, Frame};
use kolam_studio::{
    CliArgs, GenerationService, HttpGenerationService, SessionScript, StillFrameSource, Studio,
    StudioConfig, UnconfiguredService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,kolam_studio=debug,kolam_renderer=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kolam_studio=debug,kolam_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = StudioConfig::from(args);

    tracing::info!(
        "Viewport {}x{}, up to {} items",
        config.width,
        config.height,
        config.max_items
    );

    let service = build_service(&config)?;
    let mut studio = Studio::new(config.clone(), service);

    let script = config
        .script
        .as_deref()
        .map(SessionScript::load)
        .transpose()
        .context("Failed to load session script")?;

    // An explicit photo wins over the script's, which wins over the camera.
    let background = config
        .background
        .clone()
        .or_else(|| script.as_ref().and_then(|s| s.background.clone()));
    match background {
        Some(path) => studio.state.use_uploaded_image(load_photo(&path)),
        None => {
            let frame = match &config.camera_frame {
                Some(path) => Some(load_frame(path)?),
                None => None,
            };
            if let Err(e) = studio.state.start_camera(&mut StillFrameSource::new(frame)) {
                tracing::warn!("No camera ({e}); capturing over the fallback fill");
            }
        }
    }

    if let Some(script) = &script {
        script.run(&mut studio.state);
    }

    if config.no_ai {
        // no request is sent, so the lifecycle stays in Loading and the
        // artifact is the original capture
        studio.capture().await.context("Capture failed")?;
        tracing::info!(
            state = studio.state.export.state().name(),
            "Generation skipped (--no-ai); saving the original capture"
        );
    } else {
        match studio.capture_and_generate().await.context("Capture failed")? {
            ExportState::Success(_) => tracing::info!("Generation succeeded"),
            ExportState::Error(message) => {
                tracing::warn!("{message} Saving the original capture instead.");
            }
            other => tracing::debug!(state = other.name(), "Unexpected export state"),
        }
    }

    let saved = studio
        .save_artifact(&config.output_dir)
        .context("Failed to save artifact")?;
    if let Some(path) = saved {
        tracing::info!("Saved {}", path.display());
    }

    studio.state.stop_camera();
    Ok(())
}

fn build_service(config: &StudioConfig) -> anyhow::Result<Arc<dyn GenerationService>> {
    match (&config.ai_url, config.no_ai) {
        (Some(url), false) => {
            let client = HttpGenerationService::new(url, config.ai_key.clone(), config.ai_timeout)
                .context("Failed to create generation client")?;
            tracing::info!("Generation service: {}", client.endpoint());
            Ok(Arc::new(client))
        }
        (None, false) => {
            tracing::warn!("KOLAM_AI_URL not set; generation will fail and the original is kept");
            Ok(Arc::new(UnconfiguredService))
        }
        (_, true) => Ok(Arc::new(UnconfiguredService)),
    }
}

fn load_frame(path: &Path) -> anyhow::Result<Frame> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    kolam_renderer::frame_from_bytes(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))
}

/// Uploaded photos that fail to decode still produce a capture.
fn load_photo(path: &Path) -> Option<Frame> {
    match load_frame(path) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::warn!("{e:#}; using fallback background");
            None
        }
    }
}
