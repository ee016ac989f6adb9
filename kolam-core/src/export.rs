//! Export lifecycle - the capture / AI generation request state machine.
//!
//! ```text
//! idle ──capture──▶ loading ──ok──▶ success
//!                     │  ▲             │
//!                   fail └──capture────┘
//!                     ▼  │  or retry
//!                   error┘
//! ```
//!
//! Every capture or retry bumps a generation counter. A response is only
//! applied when it carries the current generation, so a slow reply to an
//! older request can never overwrite a newer one.

use std::sync::Arc;

/// User-facing message shown when generation fails.
pub const GENERATION_FAILED_MESSAGE: &str = "AI generation failed. Please try again.";

/// Identifier of one logical generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of the AI generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportState {
    /// Nothing captured yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The service returned an image.
    Success(Arc<Vec<u8>>),
    /// The request failed; holds a user-facing message.
    Error(String),
}

impl ExportState {
    /// Short lowercase name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }
}

/// Payload to hand to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Generation the eventual response must be tagged with.
    pub generation: Generation,
    /// Encoded original capture.
    pub image: Arc<Vec<u8>>,
}

/// Tracks the original capture, the request state and the generation counter.
#[derive(Debug, Clone, Default)]
pub struct ExportLifecycle {
    state: ExportState,
    generation: u64,
    original: Option<Arc<Vec<u8>>>,
}

impl ExportLifecycle {
    /// Create an idle lifecycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new capture and enter `Loading`. Allowed from any state.
    pub fn begin_capture(&mut self, original: Vec<u8>) -> GenerationRequest {
        self.original = Some(Arc::new(original));
        self.start_request()
    }

    /// Re-submit the stored capture and enter `Loading`.
    ///
    /// Returns `None` if nothing has been captured.
    pub fn begin_retry(&mut self) -> Option<GenerationRequest> {
        if self.original.is_none() {
            return None;
        }
        Some(self.start_request())
    }

    fn start_request(&mut self) -> GenerationRequest {
        self.generation += 1;
        let previous = std::mem::replace(&mut self.state, ExportState::Loading);
        let generation = Generation(self.generation);
        tracing::info!(%generation, from = previous.name(), "generation request started");
        GenerationRequest {
            generation,
            image: self.original.clone().unwrap_or_default(),
        }
    }

    /// Apply a service response.
    ///
    /// Returns `false` and leaves the state untouched when `generation` is
    /// not the latest request.
    pub fn resolve(&mut self, generation: Generation, result: Result<Vec<u8>, String>) -> bool {
        if generation.0 != self.generation || self.state != ExportState::Loading {
            tracing::warn!(
                %generation,
                current = self.generation,
                "discarding stale generation response"
            );
            return false;
        }
        self.state = match result {
            Ok(image) => ExportState::Success(Arc::new(image)),
            Err(message) => ExportState::Error(message),
        };
        tracing::info!(%generation, state = self.state.name(), "generation request resolved");
        true
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ExportState {
        &self.state
    }

    /// Latest generation issued.
    #[must_use]
    pub fn current_generation(&self) -> Option<Generation> {
        (self.generation > 0).then_some(Generation(self.generation))
    }

    /// The unmodified capture.
    #[must_use]
    pub fn original(&self) -> Option<&Arc<Vec<u8>>> {
        self.original.as_ref()
    }

    /// Image to display or download: the AI result on success, else the original.
    #[must_use]
    pub fn display_image(&self) -> Option<&Arc<Vec<u8>>> {
        match &self.state {
            ExportState::Success(image) => Some(image),
            _ => self.original.as_ref(),
        }
    }

    /// Whether a retry is offered (error state with a stored capture).
    #[must_use]
    pub fn can_retry(&self) -> bool {
        matches!(self.state, ExportState::Error(_)) && self.original.is_some()
    }

    /// Back to `Idle` with no capture. In-flight responses become stale.
    pub fn reset(&mut self) {
        self.state = ExportState::Idle;
        self.original = None;
        self.generation += 1;
    }
}
