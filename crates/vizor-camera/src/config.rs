use crate::CameraError;

/// Capture request for a V4L2 device.
///
/// The driver may grant a different size; `V4l2Camera::size` reports what
/// frames will actually be.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Driver-side mmap buffers.
    pub buffers: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 30,
            buffers: 4,
        }
    }
}

impl CameraConfig {
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_buffers(mut self, buffers: u32) -> Self {
        self.buffers = buffers.max(1);
        self
    }

    /// Apply `VIZOR_CAMERA` (device path), `VIZOR_CAMERA_SIZE` (`WxH`) and
    /// `VIZOR_FPS` on top of `self`.
    pub fn with_env(self) -> Result<Self, CameraError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Like `with_env`, reading settings through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CameraError> {
        if let Some(device) = lookup("VIZOR_CAMERA") {
            self = self.with_device(device);
        }
        if let Some(size) = lookup("VIZOR_CAMERA_SIZE") {
            let (width, height) = parse_size(&size)?;
            self = self.with_size(width, height);
        }
        if let Some(fps) = lookup("VIZOR_FPS") {
            let fps = fps
                .trim()
                .parse()
                .map_err(|_| CameraError::Config(format!("invalid VIZOR_FPS '{}'", fps)))?;
            self = self.with_fps(fps);
        }
        Ok(self)
    }
}

/// Parse `640x480`.
fn parse_size(value: &str) -> Result<(u32, u32), CameraError> {
    let invalid = || CameraError::Config(format!("invalid size '{}', expected WxH", value));
    let (w, h) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = w.parse().map_err(|_| invalid())?;
    let height: u32 = h.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}
