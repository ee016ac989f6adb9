//! Capture snapshots - immutable scene copies handed to the compositor.

use crate::frame::Frame;
use crate::item::Item;
use crate::placement::Viewport;

/// Where the background pixels come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackgroundSource {
    /// Live camera. `None` while the stream has not produced a frame yet.
    Camera(Option<Frame>),
    /// Uploaded photo. `None` if it could not be decoded.
    Upload(Option<Frame>),
    /// Nothing to show.
    #[default]
    Empty,
}

impl BackgroundSource {
    /// The frame to draw, if one with pixels is available.
    #[must_use]
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::Camera(frame) | Self::Upload(frame) => frame.as_ref().filter(|f| f.is_valid()),
            Self::Empty => None,
        }
    }

    /// Whether this background is the live camera.
    #[must_use]
    pub fn is_camera(&self) -> bool {
        matches!(self, Self::Camera(_))
    }
}

/// Everything the compositor needs, copied at capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSnapshot {
    /// Background at the moment of capture.
    pub background: BackgroundSource,
    /// Items in insertion order.
    pub items: Vec<Item>,
    /// Live viewport the item coordinates were authored in.
    pub viewport: Viewport,
    /// Output raster width in pixels.
    pub target_width: u32,
    /// Output raster height in pixels.
    pub target_height: u32,
}

impl CaptureSnapshot {
    /// Factor mapping viewport pixels to target pixels.
    ///
    /// Scaling is uniform and taken from the widths; 1 when the viewport
    /// has no width.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scale_factor(&self) -> f32 {
        if self.viewport.width > 0.0 {
            self.target_width as f32 / self.viewport.width
        } else {
            1.0
        }
    }
}
