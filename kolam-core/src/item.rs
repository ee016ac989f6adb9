//! Placed motif instances and the geometry they live in.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::motif::{MotifKind, TILE_SIZE};

/// Smallest scale an item may have.
pub const MIN_SCALE: f32 = 0.5;

/// Largest scale an item may have.
pub const MAX_SCALE: f32 = 3.0;

/// A point in live-viewport pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle in degrees of the vector from `self` to `other`.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Unique identifier for a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new unique item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position, scale and rotation of an item.
///
/// `position` is the item's centre. `rotation` is in degrees and is never
/// wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemTransform {
    /// Centre in live-viewport pixels.
    pub position: Point,
    /// Uniform scale, within `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl ItemTransform {
    /// Identity transform centred at `position`.
    #[must_use]
    pub const fn at(position: Point) -> Self {
        Self {
            position,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Clamp a scale into the allowed range. NaN maps to 1.
    #[must_use]
    pub fn clamped_scale(scale: f32) -> f32 {
        if scale.is_nan() {
            1.0
        } else {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        }
    }

    /// This transform with its scale clamped.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            scale: Self::clamped_scale(self.scale),
            ..self
        }
    }
}

impl Default for ItemTransform {
    fn default() -> Self {
        Self::at(Point::default())
    }
}

/// A placed motif instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    kind: MotifKind,
    /// Current transform.
    pub transform: ItemTransform,
}

impl Item {
    /// Create a new item of `kind` centred at `position`.
    #[must_use]
    pub fn new(kind: MotifKind, position: Point) -> Self {
        Self {
            id: ItemId::new(),
            kind,
            transform: ItemTransform::at(position),
        }
    }

    /// Set the transform. The scale is clamped.
    #[must_use]
    pub fn with_transform(mut self, transform: ItemTransform) -> Self {
        self.transform = transform.clamped();
        self
    }

    /// The item's identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// The motif this item shows.
    #[must_use]
    pub const fn kind(&self) -> MotifKind {
        self.kind
    }

    /// Check if a viewport point falls on this item's tile.
    ///
    /// The point is mapped into the item's local frame (undo translate,
    /// rotate and scale) and tested against the `TILE_SIZE` square.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        let t = &self.transform;
        if t.scale <= 0.0 {
            return false;
        }
        let d = point - t.position;
        let (sin, cos) = (-t.rotation.to_radians()).sin_cos();
        let local_x = (d.x * cos - d.y * sin) / t.scale;
        let local_y = (d.x * sin + d.y * cos) / t.scale;
        let half = TILE_SIZE / 2.0;
        local_x.abs() <= half && local_y.abs() <= half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_angle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!((a.angle_to(Point::new(0.0, 10.0)) - 90.0).abs() < 1e-4);
        assert!((a.angle_to(Point::new(-10.0, 0.0)) - 180.0).abs() < 1e-4);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
    }

    #[test]
    fn test_scale_is_clamped() {
        assert_eq!(ItemTransform::clamped_scale(10.0), MAX_SCALE);
        assert_eq!(ItemTransform::clamped_scale(0.1), MIN_SCALE);
        assert_eq!(ItemTransform::clamped_scale(f32::NAN), 1.0);
        let item = Item::new(MotifKind::Sun, Point::default()).with_transform(ItemTransform {
            position: Point::default(),
            scale: 7.0,
            rotation: 0.0,
        });
        assert_eq!(item.transform.scale, MAX_SCALE);
    }

    #[test]
    fn test_contains_point_axis_aligned() {
        let item = Item::new(MotifKind::Pot, Point::new(100.0, 100.0));
        assert!(item.contains_point(Point::new(100.0, 100.0)));
        assert!(item.contains_point(Point::new(149.0, 51.0)));
        assert!(!item.contains_point(Point::new(151.0, 100.0)));
    }

    #[test]
    fn test_contains_point_follows_rotation_and_scale() {
        let item = Item::new(MotifKind::Pot, Point::new(0.0, 0.0)).with_transform(ItemTransform {
            position: Point::new(0.0, 0.0),
            scale: 2.0,
            rotation: 45.0,
        });
        // Corner of the unrotated 200x200 box is outside once rotated.
        assert!(!item.contains_point(Point::new(95.0, 95.0)));
        // Along the rotated diagonal axis the tile reaches further.
        assert!(item.contains_point(Point::new(0.0, 130.0)));
    }
}
