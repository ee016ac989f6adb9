//! Still-image camera for headless sessions.
//!
//! There is no capture device on the host, so a single decoded image stands
//! in for the camera feed. Without one, opening the camera fails the same way
//! a machine without a camera does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kolam_core::{CameraError, CameraStream, Frame, MediaSource};

/// Media source that serves one still frame.
#[derive(Debug, Clone, Default)]
pub struct StillFrameSource {
    frame: Option<Frame>,
    stopped: Arc<AtomicBool>,
}

impl StillFrameSource {
    /// Source serving `frame`, or an unavailable camera for `None`.
    #[must_use]
    pub fn new(frame: Option<Frame>) -> Self {
        Self {
            frame,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the last opened stream has been stopped.
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl MediaSource for StillFrameSource {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        let frame = self
            .frame
            .clone()
            .ok_or_else(|| CameraError::Unavailable("no camera device".to_string()))?;
        self.stopped = Arc::new(AtomicBool::new(false));
        Ok(Box::new(StillFrameStream {
            frame: Some(frame),
            stopped: Arc::clone(&self.stopped),
        }))
    }
}

/// Stream returned by [`StillFrameSource`].
#[derive(Debug)]
pub struct StillFrameStream {
    frame: Option<Frame>,
    stopped: Arc<AtomicBool>,
}

impl CameraStream for StillFrameStream {
    fn latest_frame(&mut self) -> Option<Frame> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::debug!("still camera stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolam_core::{BackgroundSource, StudioState};

    #[test]
    fn test_missing_frame_is_unavailable() {
        let mut state = StudioState::default();
        let err = state
            .start_camera(&mut StillFrameSource::new(None))
            .expect_err("no device");
        assert!(matches!(err, CameraError::Unavailable(_)));
        assert!(!state.camera_denied());
    }

    #[test]
    fn test_frame_becomes_background_and_upload_stops_it() {
        let mut source = StillFrameSource::new(Some(Frame::solid(2, 2, [10, 20, 30, 255])));
        let mut state = StudioState::default();
        state.start_camera(&mut source).expect("camera");
        assert!(matches!(state.background(), BackgroundSource::Camera(Some(_))));
        assert!(!source.stopped());

        state.use_uploaded_image(None);
        assert!(source.stopped());
    }
}
