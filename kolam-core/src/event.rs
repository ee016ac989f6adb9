//! Input events for item interaction.

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, Point};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in viewport coordinates.
    pub x: f32,
    /// Y position in viewport coordinates.
    pub y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    /// Position as a [`Point`].
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event carrying every contact still on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points. Lifted fingers are absent.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since session start.
    #[serde(default)]
    pub timestamp_ms: u64,
    /// Item the touch started on, when the view already knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_item: Option<ItemId>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
            target_item: None,
        }
    }

    /// Set the item this touch targets.
    #[must_use]
    pub fn with_target(mut self, target: ItemId) -> Self {
        self.target_item = Some(target);
        self
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }

    /// Contact positions in arrival order.
    #[must_use]
    pub fn contacts(&self) -> Vec<Point> {
        self.touches.iter().map(TouchPoint::position).collect()
    }
}

/// All input events the studio can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Pointer (mouse) button event. Used for explicit selection on desktop.
    Pointer {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
        /// Whether the button is pressed.
        pressed: bool,
    },
}
