//! Capture and generation pipeline.
//!
//! ```text
//! capture ─▶ deselect ─▶ yield ─▶ snapshot ─▶ composite ─▶ PNG ─▶ submit ─▶ complete
//! ```
//!
//! `submit` only holds the service handle, so the caller keeps full access
//! to the studio state while a request is in flight. Responses are applied
//! through `complete`, which discards anything but the latest request.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kolam_core::{
    ExportState, Generation, GenerationRequest, PlacementStore, StudioState,
    GENERATION_FAILED_MESSAGE,
};
use kolam_renderer::{encode_png, Compositor, RenderError};
use thiserror::Error;

use crate::ai::{GenerationError, GenerationService};
use crate::StudioConfig;

/// File name of the downloaded artifact.
pub const ARTIFACT_FILENAME: &str = "pongal-kolam.png";

/// Errors surfaced by the pipeline.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Compositing or encoding the capture failed.
    #[error("capture failed: {0}")]
    Capture(#[from] RenderError),
    /// Retry requested before any capture.
    #[error("nothing has been captured yet")]
    NothingCaptured,
    /// Writing the artifact failed.
    #[error("failed to write artifact {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Response of the generation service, tagged with its request.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Request this answers.
    pub generation: Generation,
    /// Generated image or the failure.
    pub result: Result<Vec<u8>, GenerationError>,
}

/// The studio: state plus the services the pipeline needs.
pub struct Studio {
    /// Scene, background and export lifecycle.
    pub state: StudioState,
    compositor: Compositor,
    service: Arc<dyn GenerationService>,
    config: StudioConfig,
}

impl Studio {
    /// Create a studio with the built-in compositor.
    #[must_use]
    pub fn new(config: StudioConfig, service: Arc<dyn GenerationService>) -> Self {
        Self::with_compositor(config, service, Compositor::new())
    }

    /// Create a studio with a custom compositor.
    #[must_use]
    pub fn with_compositor(
        config: StudioConfig,
        service: Arc<dyn GenerationService>,
        compositor: Compositor,
    ) -> Self {
        let placement = PlacementStore::with_max_items(config.viewport(), config.max_items);
        Self {
            state: StudioState::with_placement(placement),
            compositor,
            service,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Raster size of the next capture.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn export_size(&self) -> (u32, u32) {
        let viewport = self.state.placement.viewport();
        (
            self.config
                .export_width
                .unwrap_or(viewport.width.round() as u32),
            self.config
                .export_height
                .unwrap_or(viewport.height.round() as u32),
        )
    }

    /// Capture the scene and start a generation request.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Capture`] if compositing or encoding fails; the
    /// export lifecycle is left untouched in that case.
    pub async fn capture(&mut self) -> Result<GenerationRequest, StudioError> {
        self.state.prepare_capture();
        // let the view drop the selection outline before reading the scene
        tokio::task::yield_now().await;

        let (width, height) = self.export_size();
        let snapshot = self.state.snapshot(width, height);
        let pixmap = self.compositor.composite(&snapshot)?;
        let png = encode_png(&pixmap)?;

        tracing::info!(width, height, bytes = png.len(), "capture encoded");
        Ok(self.state.export.begin_capture(png))
    }

    /// Re-submit the stored capture.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::NothingCaptured`] if there is no capture.
    pub fn retry(&mut self) -> Result<GenerationRequest, StudioError> {
        self.state
            .export
            .begin_retry()
            .ok_or(StudioError::NothingCaptured)
    }

    /// Run a request against the generation service.
    ///
    /// The returned future owns everything it needs.
    pub fn submit(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = GenerationOutcome> + Send + 'static {
        let service = Arc::clone(&self.service);
        async move {
            let result = service.generate(&request.image).await;
            GenerationOutcome {
                generation: request.generation,
                result,
            }
        }
    }

    /// Apply a service response. Returns `false` if it was stale.
    pub fn complete(&mut self, outcome: GenerationOutcome) -> bool {
        let result = outcome.result.map_err(|e| {
            tracing::warn!(generation = %outcome.generation, error = %e, "generation failed");
            GENERATION_FAILED_MESSAGE.to_string()
        });
        self.state.export.resolve(outcome.generation, result)
    }

    /// Capture, generate and apply the result.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Capture`] if the capture itself fails. Service
    /// failures end in [`ExportState::Error`] instead.
    pub async fn capture_and_generate(&mut self) -> Result<&ExportState, StudioError> {
        let request = self.capture().await?;
        let outcome = self.submit(request).await;
        self.complete(outcome);
        Ok(self.state.export.state())
    }

    /// Retry, generate and apply the result.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::NothingCaptured`] if there is no capture.
    pub async fn retry_and_generate(&mut self) -> Result<&ExportState, StudioError> {
        let request = self.retry()?;
        let outcome = self.submit(request).await;
        self.complete(outcome);
        Ok(self.state.export.state())
    }

    /// Write the displayed image to `dir/pongal-kolam.png`.
    ///
    /// Returns `Ok(None)` when nothing has been captured.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Io`] if the directory or file cannot be written.
    pub fn save_artifact(&self, dir: &Path) -> Result<Option<PathBuf>, StudioError> {
        let Some(image) = self.state.export.display_image() else {
            return Ok(None);
        };
        let path = dir.join(ARTIFACT_FILENAME);
        std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::write(&path, image.as_slice()))
            .map_err(|source| StudioError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), bytes = image.len(), "artifact saved");
        Ok(Some(path))
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
