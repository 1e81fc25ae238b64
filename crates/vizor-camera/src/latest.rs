use crate::CameraError;
use tokio::sync::watch;
use vizor_image::Frame;

pub type FrameResult = Result<Frame, CameraError>;

/// Latest-wins handoff from a capture thread to an async consumer.
///
/// Publishing replaces whatever the consumer has not read yet, so a slow
/// consumer always gets the newest frame instead of a backlog.
pub fn latest_frame() -> (FramePublisher, LatestFrame) {
    let (tx, rx) = watch::channel(None);
    (FramePublisher { tx }, LatestFrame { rx })
}

pub struct FramePublisher {
    tx: watch::Sender<Option<FrameResult>>,
}

impl FramePublisher {
    /// Replace the pending frame. Returns false once the consumer is gone.
    pub fn publish(&self, frame: FrameResult) -> bool {
        self.tx.send(Some(frame)).is_ok()
    }
}

pub struct LatestFrame {
    rx: watch::Receiver<Option<FrameResult>>,
}

fn closed() -> CameraError {
    CameraError::Channel("Channel closed".to_string())
}

impl LatestFrame {
    /// Wait for a frame newer than the last one returned.
    pub async fn recv(&mut self) -> FrameResult {
        loop {
            self.rx.changed().await.map_err(|_| closed())?;
            if let Some(frame) = self.rx.borrow_and_update().clone() {
                return frame;
            }
        }
    }

    /// The newest unread frame, if any.
    pub fn try_recv(&mut self) -> Result<Option<Frame>, CameraError> {
        if !self.rx.has_changed().map_err(|_| closed())? {
            return Ok(None);
        }
        match self.rx.borrow_and_update().clone() {
            Some(frame) => frame.map(Some),
            None => Ok(None),
        }
    }
}
