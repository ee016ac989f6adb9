//! Background raster frames.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// One RGBA8 frame (straight alpha, row-major, 4 bytes per pixel).
///
/// Pixel data is shared, so cloning a frame into a snapshot is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Frame {
    /// Create a frame from RGBA data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length doesn't match width * height * 4.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(CoreError::InvalidFrame {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// A frame filled with one colour.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(pixel_count).into(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the frame has any pixels.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && !self.data.is_empty()
    }
}
