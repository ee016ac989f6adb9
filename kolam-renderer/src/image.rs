//! Decoding uploaded photos into background frames.
//!
//! Also decodes base64 data URIs, which the generation service may answer with.

use base64::Engine;
use kolam_core::Frame;

use crate::error::{RenderError, RenderResult};

/// Image container formats recognised for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else {
            Self::Unknown
        }
    }
}

/// Decode an uploaded image into a straight-alpha RGBA frame.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the bytes are not a decodable image.
pub fn frame_from_bytes(data: &[u8]) -> RenderResult<Frame> {
    let format = ImageFormat::from_magic_bytes(data);
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode {format:?} image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, ?format, "uploaded image decoded");
    Frame::new(width, height, rgba.into_raw()).map_err(|e| RenderError::Resource(e.to_string()))
}

/// Extract the payload of a base64 data URI (`data:image/png;base64,...`).
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the URI is malformed or not base64.
pub fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;
    if !metadata.ends_with(";base64") {
        return Err(RenderError::Resource(
            "Invalid data URI: only base64 payloads are supported".to_string(),
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))
}
