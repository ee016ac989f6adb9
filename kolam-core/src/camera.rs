//! Camera stream ownership.
//!
//! The camera is a singleton hardware resource. [`CameraSlot`] owns at most
//! one open stream and stops it on replacement, release, and drop.

use thiserror::Error;

use crate::frame::Frame;

/// Errors raised when opening a camera.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user or platform refused camera access.
    #[error("Camera access denied")]
    PermissionDenied,

    /// No usable camera (missing device, busy, driver failure).
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
}

/// An open camera stream.
pub trait CameraStream: Send {
    /// Most recent frame, or `None` if the stream is not ready yet.
    fn latest_frame(&mut self) -> Option<Frame>;

    /// Release the device. Must be safe to call more than once.
    fn stop(&mut self);
}

/// Something that can open camera streams.
pub trait MediaSource {
    /// Acquire a new stream.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError`] if access is denied or no camera is usable.
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// Holder for the single active camera stream.
#[derive(Default)]
pub struct CameraSlot {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly acquired stream, stopping the previous one.
    pub fn replace(&mut self, stream: Box<dyn CameraStream>) {
        if let Some(mut previous) = self.stream.replace(stream) {
            tracing::debug!("stopping previous camera stream");
            previous.stop();
        }
    }

    /// Stop and drop the active stream, if any.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("camera stream released");
            stream.stop();
        }
    }

    /// Whether a stream is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Pull the latest frame from the active stream.
    pub fn latest_frame(&mut self) -> Option<Frame> {
        self.stream.as_mut().and_then(|s| s.latest_frame())
    }
}

impl Drop for CameraSlot {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSlot")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Stream that counts how often it was stopped.
    pub struct CountingStream {
        pub stops: Arc<AtomicUsize>,
        pub frame: Option<Frame>,
    }

    impl CameraStream for CountingStream {
        fn latest_frame(&mut self) -> Option<Frame> {
            self.frame.clone()
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn counting(frame: Option<Frame>) -> (Box<dyn CameraStream>, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        let stream = CountingStream {
            stops: Arc::clone(&stops),
            frame,
        };
        (Box::new(stream), stops)
    }
}
