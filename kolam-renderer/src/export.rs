//! Encoding composited captures.
//!
//! PNG is the only artifact format: it is what the generation service
//! receives and what the download writes to disk.

use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};

/// MIME type of encoded captures.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Encode a composited pixmap as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Export`] if encoding fails.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
}
