//! Studio state management.

use crate::camera::{CameraError, CameraSlot, MediaSource};
use crate::event::{InputEvent, TouchEvent, TouchPhase};
use crate::export::ExportLifecycle;
use crate::frame::Frame;
use crate::gesture::GestureInterpreter;
use crate::item::{Item, ItemId, Point};
use crate::motif::MotifKind;
use crate::placement::{PlacementStore, Viewport};
use crate::snapshot::{BackgroundSource, CaptureSnapshot};

/// The complete studio state.
///
/// Single owner of items, selection, gesture session, background, camera
/// and export lifecycle. Every operation goes through a `&mut StudioState`.
#[derive(Debug)]
pub struct StudioState {
    /// Placed items and selection.
    pub placement: PlacementStore,
    /// Capture / generation lifecycle.
    pub export: ExportLifecycle,
    gesture: GestureInterpreter,
    background: BackgroundSource,
    camera: CameraSlot,
    camera_denied: bool,
}

impl StudioState {
    /// Create a new state for the given viewport size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_placement(PlacementStore::new(viewport))
    }

    /// Create a state around an existing placement store.
    #[must_use]
    pub fn with_placement(placement: PlacementStore) -> Self {
        Self {
            placement,
            export: ExportLifecycle::new(),
            gesture: GestureInterpreter::new(),
            background: BackgroundSource::Empty,
            camera: CameraSlot::new(),
            camera_denied: false,
        }
    }

    /// Process an input event. Returns `true` if an item transform changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Touch(touch) => self.handle_touch(touch),
            InputEvent::Pointer { x, y, pressed } => {
                if *pressed {
                    self.handle_pointer_down(Point::new(*x, *y));
                }
                false
            }
        }
    }

    /// Process a touch event. Returns `true` if an item transform changed.
    pub fn handle_touch(&mut self, touch: &TouchEvent) -> bool {
        match touch.phase {
            TouchPhase::Start => {
                let target = touch.target_item.or_else(|| {
                    touch
                        .primary_touch()
                        .and_then(|p| self.placement.item_at(p.position()))
                });
                let continuing = self.gesture.is_active()
                    && (target.is_none() || target == self.placement.selected());
                match target {
                    // the interpreter re-anchors only if the tracked contacts changed
                    _ if continuing => self.update_gesture(touch),
                    Some(id) => {
                        self.begin_gesture(id, touch);
                        false
                    }
                    None => false,
                }
            }
            TouchPhase::Move => self.update_gesture(touch),
            TouchPhase::End | TouchPhase::Cancel => {
                if touch.touches.is_empty() {
                    self.gesture.on_gesture_end();
                    false
                } else {
                    self.update_gesture(touch)
                }
            }
        }
    }

    fn begin_gesture(&mut self, id: ItemId, touch: &TouchEvent) {
        if self.placement.select(id).is_err() {
            tracing::debug!(%id, "touch on unknown item ignored");
            return;
        }
        if let Some(baseline) = self.placement.transform_of(id) {
            self.gesture.on_gesture_start(&touch.touches, baseline);
        }
    }

    fn update_gesture(&mut self, touch: &TouchEvent) -> bool {
        let Some((id, current)) = self
            .placement
            .selected_item()
            .map(|item| (item.id(), item.transform))
        else {
            self.gesture.on_gesture_end();
            return false;
        };
        match self.gesture.on_gesture_update(&touch.touches, current) {
            Some(delta) => self.placement.apply_transform_delta(id, delta),
            None => false,
        }
    }

    /// Explicit selection by pointer: select the hit item or clear selection.
    pub fn handle_pointer_down(&mut self, point: Point) {
        self.gesture.on_gesture_end();
        match self.placement.item_at(point) {
            Some(id) => {
                // item_at only returns stored ids
                let _ = self.placement.select(id);
            }
            None => self.placement.deselect(),
        }
    }

    /// Add an item at the viewport centre. `None` when the limit is reached.
    pub fn add_item(&mut self, kind: MotifKind) -> Option<ItemId> {
        let id = self.placement.add(kind)?;
        self.gesture.on_gesture_end();
        Some(id)
    }

    /// Remove an item; idempotent.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        if self.placement.selected() == Some(id) {
            self.gesture.on_gesture_end();
        }
        self.placement.remove(id)
    }

    /// Remove the selected item, if any.
    pub fn remove_selected(&mut self) -> Option<Item> {
        let id = self.placement.selected()?;
        self.remove_item(id)
    }

    /// Acquire the camera as background.
    ///
    /// On failure the previous background is kept and, for a denial, the
    /// persistent "upload instead" notice is raised.
    ///
    /// # Errors
    ///
    /// Returns the [`CameraError`] from the media source.
    pub fn start_camera(&mut self, source: &mut dyn MediaSource) -> Result<(), CameraError> {
        match source.open() {
            Ok(stream) => {
                self.camera.replace(stream);
                self.camera_denied = false;
                self.background = BackgroundSource::Camera(self.camera.latest_frame());
                tracing::info!("camera stream started");
                Ok(())
            }
            Err(err) => {
                if err == CameraError::PermissionDenied {
                    self.camera_denied = true;
                }
                tracing::warn!(error = %err, "camera unavailable, upload a photo instead");
                Err(err)
            }
        }
    }

    /// Stop the camera. A camera background loses its frame.
    pub fn stop_camera(&mut self) {
        self.camera.release();
        if self.background.is_camera() {
            self.background = BackgroundSource::Camera(None);
        }
    }

    /// Use an uploaded photo as background; stops the camera.
    ///
    /// `None` means the upload could not be decoded; the export then falls
    /// back to a flat fill.
    pub fn use_uploaded_image(&mut self, frame: Option<Frame>) {
        self.camera.release();
        self.background = BackgroundSource::Upload(frame);
    }

    /// Pull the newest camera frame into the background.
    pub fn refresh_background(&mut self) {
        if self.background.is_camera() && self.camera.is_active() {
            if let Some(frame) = self.camera.latest_frame() {
                self.background = BackgroundSource::Camera(Some(frame));
            }
        }
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> &BackgroundSource {
        &self.background
    }

    /// Whether a camera is streaming.
    #[must_use]
    pub fn camera_active(&self) -> bool {
        self.camera.is_active()
    }

    /// Whether camera access was denied (show the upload notice).
    #[must_use]
    pub fn camera_denied(&self) -> bool {
        self.camera_denied
    }

    /// Whether a gesture session is in progress.
    #[must_use]
    pub fn gesture_active(&self) -> bool {
        self.gesture.is_active()
    }

    /// Drop the selection and any gesture so the view shows no decoration.
    pub fn prepare_capture(&mut self) {
        self.gesture.on_gesture_end();
        self.placement.deselect();
    }

    /// Copy the scene for an export at the given raster size.
    pub fn snapshot(&mut self, target_width: u32, target_height: u32) -> CaptureSnapshot {
        self.refresh_background();
        self.placement
            .snapshot(self.background.clone(), target_width, target_height)
    }

    /// Clear items, selection, gesture and export state.
    pub fn reset(&mut self) {
        self.gesture.on_gesture_end();
        self.placement.reset();
        self.export.reset();
    }
}

impl Default for StudioState {
    fn default() -> Self {
        Self::with_placement(PlacementStore::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::camera::testing::counting;
    use crate::camera::CameraStream;
    use crate::event::TouchPoint;
    use crate::export::ExportState;
    use crate::item::MAX_SCALE;

    fn touch(phase: TouchPhase, points: &[(u32, f32, f32)]) -> InputEvent {
        InputEvent::Touch(TouchEvent::new(
            phase,
            points
                .iter()
                .map(|&(id, x, y)| TouchPoint::new(id, x, y))
                .collect(),
            0,
        ))
    }

    struct Source(Result<Option<Frame>, CameraError>);

    impl MediaSource for Source {
        fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
            match &self.0 {
                Ok(frame) => Ok(counting(frame.clone()).0),
                Err(e) => Err(e.clone()),
            }
        }
    }

    #[test]
    fn test_drag_moves_touched_item() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let id = state.add_item(MotifKind::Pot).expect("added");
        state.placement.deselect();

        state.handle_input(&touch(TouchPhase::Start, &[(0, 210.0, 190.0)]));
        assert_eq!(state.placement.selected(), Some(id));
        assert!(state.handle_input(&touch(TouchPhase::Move, &[(0, 250.0, 170.0)])));
        state.handle_input(&touch(TouchPhase::End, &[]));

        let t = state.placement.transform_of(id).expect("item");
        assert_eq!(t.position, Point::new(240.0, 180.0));
        assert!(!state.gesture_active());
    }

    #[test]
    fn test_touch_on_empty_space_does_nothing() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let id = state.add_item(MotifKind::Pot).expect("added");
        state.handle_input(&touch(TouchPhase::Start, &[(0, 5.0, 5.0)]));
        assert!(!state.gesture_active());
        assert!(!state.handle_input(&touch(TouchPhase::Move, &[(0, 50.0, 50.0)])));
        assert_eq!(
            state.placement.transform_of(id).map(|t| t.position),
            Some(Point::new(200.0, 200.0))
        );
    }

    #[test]
    fn test_pinch_via_second_finger() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let id = state.add_item(MotifKind::Sun).expect("added");

        state.handle_input(&touch(TouchPhase::Start, &[(0, 200.0, 200.0)]));
        state.handle_input(&touch(TouchPhase::Start, &[(0, 200.0, 200.0), (1, 240.0, 200.0)]));
        state.handle_input(&touch(TouchPhase::Move, &[(0, 200.0, 200.0), (1, 280.0, 200.0)]));

        let t = state.placement.transform_of(id).expect("item");
        assert!((t.scale - 2.0).abs() < 1e-5);
        assert_eq!(t.position, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_third_finger_does_not_reset_pinch() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let id = state.add_item(MotifKind::Sun).expect("added");

        state.handle_input(&touch(TouchPhase::Start, &[(0, 190.0, 200.0)]));
        state.handle_input(&touch(TouchPhase::Start, &[(0, 190.0, 200.0), (1, 210.0, 200.0)]));
        state.handle_input(&touch(TouchPhase::Move, &[(0, 150.0, 200.0), (1, 250.0, 200.0)]));
        let scale = state.placement.transform_of(id).map(|t| t.scale);
        assert_eq!(scale, Some(MAX_SCALE));

        state.handle_input(&touch(
            TouchPhase::Start,
            &[(0, 150.0, 200.0), (1, 250.0, 200.0), (2, 380.0, 380.0)],
        ));
        let anchor = state.gesture.anchor().expect("still pinching");
        assert_eq!(anchor.contact_count(), 2);

        state.handle_input(&touch(
            TouchPhase::Move,
            &[(0, 175.0, 200.0), (1, 225.0, 200.0), (2, 380.0, 380.0)],
        ));
        // measured against the pinch's original 20px spread
        let t = state.placement.transform_of(id).expect("item");
        assert!((t.scale - 2.5).abs() < 1e-5, "scale = {}", t.scale);
    }

    #[test]
    fn test_touch_on_other_item_starts_new_gesture() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let first = state.add_item(MotifKind::Pot).expect("first");
        let second = state.add_item(MotifKind::Flower).expect("second");
        state.handle_input(&touch(TouchPhase::Start, &[(0, 200.0, 200.0)]));
        assert_eq!(state.placement.selected(), Some(second));

        let start = TouchEvent::new(TouchPhase::Start, vec![TouchPoint::new(1, 200.0, 200.0)], 0)
            .with_target(first);
        state.handle_input(&InputEvent::Touch(start));
        assert_eq!(state.placement.selected(), Some(first));
        assert!(state.gesture_active());
    }

    #[test]
    fn test_events_after_removing_active_item_are_noops() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let keep = state.add_item(MotifKind::Flower).expect("keep");
        let gone = state.add_item(MotifKind::Pot).expect("gone");

        state.handle_input(&touch(TouchPhase::Start, &[(0, 200.0, 200.0)]));
        assert_eq!(state.placement.selected(), Some(gone));
        state.remove_item(gone);
        assert_eq!(state.placement.selected(), None);

        assert!(!state.handle_input(&touch(TouchPhase::Move, &[(0, 300.0, 300.0)])));
        assert_eq!(
            state.placement.transform_of(keep).map(|t| t.position),
            Some(Point::new(200.0, 200.0))
        );
        assert!(state.remove_item(gone).is_none());
    }

    #[test]
    fn test_pointer_selects_and_clears() {
        let mut state = StudioState::new(Viewport::new(400.0, 400.0));
        let id = state.add_item(MotifKind::Pot).expect("added");
        state.handle_input(&InputEvent::Pointer { x: 10.0, y: 10.0, pressed: true });
        assert_eq!(state.placement.selected(), None);
        state.handle_input(&InputEvent::Pointer { x: 200.0, y: 200.0, pressed: true });
        assert_eq!(state.placement.selected(), Some(id));
    }

    #[test]
    fn test_camera_denied_raises_notice() {
        let mut state = StudioState::default();
        let err = state
            .start_camera(&mut Source(Err(CameraError::PermissionDenied)))
            .expect_err("denied");
        assert_eq!(err, CameraError::PermissionDenied);
        assert!(state.camera_denied());
        assert!(!state.camera_active());
        assert_eq!(state.background(), &BackgroundSource::Empty);
    }

    #[test]
    fn test_upload_stops_camera() {
        let mut state = StudioState::default();
        state
            .start_camera(&mut Source(Ok(Some(Frame::solid(4, 4, [1; 4])))))
            .expect("camera");
        assert!(state.camera_active());
        assert!(state.background().frame().is_some());

        state.use_uploaded_image(Some(Frame::solid(2, 2, [2; 4])));
        assert!(!state.camera_active());
        assert!(matches!(state.background(), BackgroundSource::Upload(Some(_))));
    }

    #[test]
    fn test_restarting_camera_stops_old_stream() {
        struct Tracking(Vec<std::sync::Arc<std::sync::atomic::AtomicUsize>>);
        impl MediaSource for Tracking {
            fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
                let (stream, stops) = counting(None);
                self.0.push(stops);
                Ok(stream)
            }
        }

        let mut source = Tracking(Vec::new());
        let mut state = StudioState::default();
        state.start_camera(&mut source).expect("first");
        state.start_camera(&mut source).expect("second");
        assert_eq!(source.0[0].load(Ordering::SeqCst), 1);
        assert_eq!(source.0[1].load(Ordering::SeqCst), 0);
        drop(state);
        assert_eq!(source.0[1].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prepare_capture_deselects() {
        let mut state = StudioState::default();
        state.add_item(MotifKind::Pot);
        state.prepare_capture();
        assert_eq!(state.placement.selected(), None);
        let snapshot = state.snapshot(800, 600);
        assert_eq!(snapshot.items.len(), 1);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut state = StudioState::default();
        state.add_item(MotifKind::Pot);
        state.export.begin_capture(vec![1]);
        state.reset();
        assert!(state.placement.is_empty());
        assert_eq!(state.placement.selected(), None);
        assert_eq!(state.export.state(), &ExportState::Idle);
    }
}
