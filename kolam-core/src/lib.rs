//! # Kolam Core
//!
//! Scene logic for the Pongal kolam studio: a fixed catalog of motifs placed
//! over a photo background, manipulated with touch gestures, and captured
//! into a composited export.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 kolam-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Placement       │  Gesture Interpreter     │
//! │  - Items         │  - Drag                  │
//! │  - Selection     │  - Pinch / rotate        │
//! │  - Motif catalog │  - Re-anchoring          │
//! ├─────────────────────────────────────────────┤
//! │  Background      │  Export Lifecycle        │
//! │  - Camera slot   │  - Capture snapshot      │
//! │  - Upload frame  │  - Generation counter    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rasterization lives in `kolam-renderer`; this crate has no pixel code.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod error;
pub mod event;
pub mod export;
pub mod frame;
pub mod gesture;
pub mod item;
pub mod motif;
pub mod placement;
pub mod snapshot;
pub mod state;

pub use camera::{CameraError, CameraSlot, CameraStream, MediaSource};
pub use error::{CoreError, CoreResult};
pub use event::{InputEvent, TouchEvent, TouchPhase, TouchPoint};
pub use export::{
    ExportLifecycle, ExportState, Generation, GenerationRequest, GENERATION_FAILED_MESSAGE,
};
pub use frame::Frame;
pub use gesture::{Anchor, GestureInterpreter, TransformDelta};
pub use item::{Item, ItemId, ItemTransform, Point, MAX_SCALE, MIN_SCALE};
pub use motif::{MotifAsset, MotifKind, TILE_SIZE};
pub use placement::{PlacementStore, Viewport, FALLBACK_CENTER, MAX_ITEMS};
pub use snapshot::{BackgroundSource, CaptureSnapshot};
pub use state::StudioState;

/// Kolam core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
