//! # Gesture Interpreter
//!
//! Turns raw multi-touch contacts into item transforms.
//!
//! ```text
//! 1 contact   → drag:   position = baseline.position + (current − anchor)
//! 2 contacts  → pinch:  scale    = clamp(baseline.scale × dist / anchor_dist)
//!               twist:  rotation = baseline.rotation + (angle − anchor_angle)
//! 3+ contacts → only the first two are tracked
//! ```
//!
//! Deltas are always computed against the baseline frozen at session start,
//! never against the live item. A two-contact gesture does not move the item:
//! the midpoint is recorded in the anchor but never applied, so a pinch never
//! drags. Any change in the tracked contacts re-anchors the session on the
//! item's committed transform.

use serde::{Deserialize, Serialize};

use crate::event::TouchPoint;
use crate::item::{ItemTransform, Point};

/// Absolute transform values produced by one gesture update.
///
/// Written as-is into the active item; never added to its current values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    /// New centre position.
    pub position: Point,
    /// New scale, already clamped.
    pub scale: f32,
    /// New rotation in degrees.
    pub rotation: f32,
}

impl TransformDelta {
    /// The transform this delta describes.
    #[must_use]
    pub const fn to_transform(self) -> ItemTransform {
        ItemTransform {
            position: self.position,
            scale: self.scale,
            rotation: self.rotation,
        }
    }
}

/// Reference captured when a gesture session (re)starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// One contact: drag anchor.
    Single {
        /// Touch identifier.
        id: u32,
        /// Contact position at start.
        point: Point,
    },
    /// Two contacts: pinch/rotate anchor.
    Pair {
        /// Touch identifiers of the first and second contact.
        ids: (u32, u32),
        /// Midpoint between the contacts.
        midpoint: Point,
        /// Distance between the contacts.
        distance: f32,
        /// Angle from first to second contact, in degrees.
        angle: f32,
    },
}

impl Anchor {
    /// Build an anchor from the first one or two contacts.
    #[must_use]
    pub fn from_contacts(contacts: &[TouchPoint]) -> Option<Self> {
        match contacts {
            [] => None,
            [only] => Some(Self::Single {
                id: only.id,
                point: only.position(),
            }),
            [first, second, ..] => {
                let (a, b) = (first.position(), second.position());
                Some(Self::Pair {
                    ids: (first.id, second.id),
                    midpoint: a.midpoint(b),
                    distance: a.distance(b),
                    angle: a.angle_to(b),
                })
            }
        }
    }

    /// Number of contacts this anchor tracks.
    #[must_use]
    pub const fn contact_count(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Pair { .. } => 2,
        }
    }

    /// Whether `contacts` are still the ones this anchor was built from.
    fn tracks(&self, contacts: &[TouchPoint]) -> bool {
        match (self, contacts) {
            (Self::Single { id, .. }, [only]) => only.id == *id,
            (Self::Pair { ids, .. }, [first, second, ..]) => (first.id, second.id) == *ids,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureSession {
    anchor: Anchor,
    baseline: ItemTransform,
}

/// Interprets touch contacts for the active item.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    session: Option<GestureSession>,
}

impl GestureInterpreter {
    /// Create an idle interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from the current contacts and the item's transform.
    ///
    /// Returns `false` (and stays idle) when there are no contacts.
    pub fn on_gesture_start(&mut self, contacts: &[TouchPoint], baseline: ItemTransform) -> bool {
        self.session = Anchor::from_contacts(contacts).map(|anchor| GestureSession {
            anchor,
            baseline,
        });
        if let Some(session) = &self.session {
            tracing::debug!(
                contacts = session.anchor.contact_count(),
                "gesture session started"
            );
        }
        self.session.is_some()
    }

    /// Process a move with the contacts still down.
    ///
    /// `current` is the active item's committed transform. It becomes the new
    /// baseline when the tracked contacts change, in which case the event only
    /// re-anchors and yields no delta.
    pub fn on_gesture_update(
        &mut self,
        contacts: &[TouchPoint],
        current: ItemTransform,
    ) -> Option<TransformDelta> {
        if contacts.is_empty() {
            self.on_gesture_end();
            return None;
        }

        let session = self.session.as_mut()?;
        if !session.anchor.tracks(contacts) {
            let anchor = Anchor::from_contacts(contacts)?;
            tracing::debug!(
                from = session.anchor.contact_count(),
                to = anchor.contact_count(),
                "contact change, re-anchoring gesture"
            );
            *session = GestureSession {
                anchor,
                baseline: current,
            };
            return None;
        }

        let base = session.baseline;
        match (session.anchor, contacts) {
            (Anchor::Single { point, .. }, [only]) => {
                let now = only.position();
                if !now.is_finite() {
                    return None;
                }
                Some(TransformDelta {
                    position: base.position + (now - point),
                    scale: base.scale,
                    rotation: base.rotation,
                })
            }
            (
                Anchor::Pair {
                    distance, angle, ..
                },
                [first, second, ..],
            ) => {
                let (a, b) = (first.position(), second.position());
                if !a.is_finite() || !b.is_finite() {
                    return None;
                }
                let factor = scale_factor(distance, a.distance(b));
                Some(TransformDelta {
                    position: base.position,
                    scale: ItemTransform::clamped_scale(base.scale * factor),
                    rotation: base.rotation + (a.angle_to(b) - angle),
                })
            }
            _ => None,
        }
    }

    /// End the session (all fingers lifted or touch cancelled).
    pub fn on_gesture_end(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("gesture session ended");
        }
    }

    /// Whether a session is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The anchor of the current session.
    #[must_use]
    pub fn anchor(&self) -> Option<Anchor> {
        self.session.map(|s| s.anchor)
    }

    /// The frozen baseline of the current session.
    #[must_use]
    pub fn baseline(&self) -> Option<ItemTransform> {
        self.session.map(|s| s.baseline)
    }
}

/// Ratio of current to anchor distance; 1 when undefined.
fn scale_factor(anchor_distance: f32, current_distance: f32) -> f32 {
    if anchor_distance <= 0.0 {
        return 1.0;
    }
    let factor = current_distance / anchor_distance;
    if factor.is_finite() {
        factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MAX_SCALE, MIN_SCALE};
    use proptest::prelude::*;

    fn tp(id: u32, x: f32, y: f32) -> TouchPoint {
        TouchPoint::new(id, x, y)
    }

    fn base() -> ItemTransform {
        ItemTransform {
            position: Point::new(200.0, 300.0),
            scale: 1.0,
            rotation: 10.0,
        }
    }

    #[test]
    fn test_single_contact_translates_from_baseline() {
        let mut g = GestureInterpreter::new();
        assert!(g.on_gesture_start(&[tp(0, 50.0, 50.0)], base()));

        let d = g
            .on_gesture_update(&[tp(0, 60.0, 45.0)], base())
            .expect("delta");
        assert_eq!(d.position, Point::new(210.0, 295.0));

        // Second move is measured from the anchor, not the previous move.
        let d = g
            .on_gesture_update(&[tp(0, 80.0, 50.0)], d.to_transform())
            .expect("delta");
        assert_eq!(d.position, Point::new(230.0, 300.0));
        assert_eq!(d.scale, 1.0);
        assert_eq!(d.rotation, 10.0);
    }

    #[test]
    fn test_pinch_scales_and_rotates_without_moving() {
        let mut g = GestureInterpreter::new();
        g.on_gesture_start(&[tp(0, 0.0, 0.0), tp(1, 100.0, 0.0)], base());

        let d = g
            .on_gesture_update(&[tp(0, 0.0, 0.0), tp(1, 0.0, 150.0)], base())
            .expect("delta");
        assert!((d.scale - 1.5).abs() < 1e-5);
        assert!((d.rotation - 100.0).abs() < 1e-4);
        assert_eq!(d.position, base().position);

        // Both fingers sliding together does not translate.
        let d = g
            .on_gesture_update(&[tp(0, 500.0, 500.0), tp(1, 600.0, 500.0)], base())
            .expect("delta");
        assert_eq!(d.position, base().position);
        assert!((d.scale - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pinch_scale_is_clamped() {
        let mut g = GestureInterpreter::new();
        g.on_gesture_start(&[tp(0, 0.0, 0.0), tp(1, 10.0, 0.0)], base());
        let d = g
            .on_gesture_update(&[tp(0, 0.0, 0.0), tp(1, 1000.0, 0.0)], base())
            .expect("delta");
        assert_eq!(d.scale, MAX_SCALE);

        let d = g
            .on_gesture_update(&[tp(0, 0.0, 0.0), tp(1, 1.0, 0.0)], base())
            .expect("delta");
        assert_eq!(d.scale, MIN_SCALE);
    }

    #[test]
    fn test_zero_anchor_distance_keeps_scale() {
        let mut g = GestureInterpreter::new();
        g.on_gesture_start(&[tp(0, 40.0, 40.0), tp(1, 40.0, 40.0)], base());
        let d = g
            .on_gesture_update(&[tp(0, 0.0, 0.0), tp(1, 300.0, 0.0)], base())
            .expect("delta");
        assert_eq!(d.scale, 1.0);
        assert!(d.scale.is_finite() && d.rotation.is_finite());
    }

    #[test]
    fn test_contact_count_change_reanchors() {
        let mut g = GestureInterpreter::new();
        let mut item = base();

        // Phase 1: drag by (+20, 0).
        g.on_gesture_start(&[tp(0, 0.0, 0.0)], item);
        item = g
            .on_gesture_update(&[tp(0, 20.0, 0.0)], item)
            .expect("drag")
            .to_transform();

        // Phase 2: second finger lands; first event only re-anchors.
        assert!(g
            .on_gesture_update(&[tp(0, 20.0, 0.0), tp(1, 120.0, 0.0)], item)
            .is_none());
        assert_eq!(g.baseline(), Some(item));
        item = g
            .on_gesture_update(&[tp(0, 70.0, 50.0), tp(1, 270.0, 50.0)], item)
            .expect("pinch")
            .to_transform();
        assert!((item.scale - 2.0).abs() < 1e-5);

        // Phase 3: back to one finger, re-anchor then drag by (-5, +15).
        assert!(g.on_gesture_update(&[tp(1, 270.0, 50.0)], item).is_none());
        item = g
            .on_gesture_update(&[tp(1, 265.0, 65.0)], item)
            .expect("drag")
            .to_transform();

        assert_eq!(item.position, Point::new(215.0, 315.0));
        assert!((item.scale - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_extra_contacts_are_ignored() {
        let mut g = GestureInterpreter::new();
        g.on_gesture_start(&[tp(0, 0.0, 0.0), tp(1, 100.0, 0.0)], base());

        let d = g
            .on_gesture_update(
                &[tp(0, 0.0, 0.0), tp(1, 200.0, 0.0), tp(2, 9.0, 9.0)],
                base(),
            )
            .expect("third finger does not cancel");
        assert!((d.scale - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_lifting_all_contacts_ends_session() {
        let mut g = GestureInterpreter::new();
        g.on_gesture_start(&[tp(0, 0.0, 0.0)], base());
        assert!(g.is_active());
        assert!(g.on_gesture_update(&[], base()).is_none());
        assert!(!g.is_active());
        assert!(g.on_gesture_update(&[tp(0, 5.0, 5.0)], base()).is_none());
    }

    #[test]
    fn test_start_without_contacts_stays_idle() {
        let mut g = GestureInterpreter::new();
        assert!(!g.on_gesture_start(&[], base()));
        assert!(!g.is_active());
    }

    #[test]
    fn test_nan_contact_yields_nothing() {
        let mut g = GestureInterpreter::new();
        g.on_gesture_start(&[tp(0, 0.0, 0.0)], base());
        assert!(g.on_gesture_update(&[tp(0, f32::NAN, 1.0)], base()).is_none());
    }

    fn arb_pair() -> impl Strategy<Value = [TouchPoint; 2]> {
        (
            -2000.0f32..2000.0,
            -2000.0f32..2000.0,
            -2000.0f32..2000.0,
            -2000.0f32..2000.0,
        )
            .prop_map(|(ax, ay, bx, by)| [tp(0, ax, ay), tp(1, bx, by)])
    }

    proptest! {
        #[test]
        fn prop_scale_stays_in_range(
            start in arb_pair(),
            start_scale in 0.5f32..3.0,
            moves in prop::collection::vec(arb_pair(), 1..20)
        ) {
            let mut g = GestureInterpreter::new();
            let mut item = ItemTransform { scale: start_scale, ..base() };
            g.on_gesture_start(&start, item);
            for contacts in moves {
                if let Some(d) = g.on_gesture_update(&contacts, item) {
                    item = d.to_transform();
                }
                prop_assert!(item.scale >= MIN_SCALE && item.scale <= MAX_SCALE,
                    "scale {} out of range", item.scale);
            }
        }
    }
}
