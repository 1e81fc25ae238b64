use crate::CameraError;
use vizor_image::Frame;

/// Async camera trait for frame capture.
#[allow(async_fn_in_trait)]
pub trait Camera {
    /// Receive the next frame from the camera.
    async fn recv(&mut self) -> Result<Frame, CameraError>;

    /// Receive a frame only if one is already waiting.
    ///
    /// Render loops use this to keep drawing while the device is slower
    /// than the display. The default always waits for a frame.
    async fn try_recv(&mut self) -> Result<Option<Frame>, CameraError> {
        self.recv().await.map(Some)
    }
}
