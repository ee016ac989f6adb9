//! # Kolam Renderer
//!
//! Offscreen compositor for kolam captures, built on resvg/tiny-skia.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              CaptureSnapshot                │
//! ├─────────────────────────────────────────────┤
//! │ Background  │ Items        │ Encoding       │
//! │ cover fit   │ replayed in  │ PNG            │
//! │ or #333     │ insert order │                │
//! └─────────────┴──────────────┴────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod error;
pub mod export;
pub mod image;

pub use compositor::{
    cover_fit, replay_transform, CatalogResolver, Compositor, CoverFit, MotifResolver,
    FALLBACK_FILL,
};
pub use error::{RenderError, RenderResult};
pub use export::{encode_png, PNG_MIME_TYPE};
pub use image::{decode_data_uri, frame_from_bytes, ImageFormat};

/// Re-exported so callers can hold composited output without a direct dependency.
pub use tiny_skia::Pixmap;
