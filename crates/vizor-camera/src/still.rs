use crate::{Camera, CameraError};
use std::path::Path;
use std::time::Duration;
use vizor_image::Frame;

/// A camera that keeps returning the same frame.
///
/// Stands in for a capture device when none is present, and gives
/// reproducible input when tuning a model.
#[derive(Debug, Clone)]
pub struct StillCamera {
    frame: Frame,
    interval: Option<Duration>,
}

impl StillCamera {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            interval: None,
        }
    }

    /// Load the frame from an encoded image file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let bytes = std::fs::read(path.as_ref())?;
        let frame = vizor_image::decode_frame(&bytes)?;
        log::info!(
            "Still camera: {} ({}x{})",
            path.as_ref().display(),
            frame.width(),
            frame.height()
        );
        Ok(Self::new(frame))
    }

    /// Pace `recv` to roughly `fps` frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.interval = (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64));
        self
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl Camera for StillCamera {
    async fn recv(&mut self) -> Result<Frame, CameraError> {
        if let Some(interval) = self.interval {
            tokio::time::sleep(interval).await;
        }
        Ok(self.frame.clone())
    }

    async fn try_recv(&mut self) -> Result<Option<Frame>, CameraError> {
        Ok(Some(self.frame.clone()))
    }
}
