use crate::{latest_frame, Camera, CameraConfig, CameraError, FramePublisher, LatestFrame};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};
use vizor_image::Frame;

/// Wire format negotiated with the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PixelFormat {
    Mjpeg,
    Yuyv,
}

impl PixelFormat {
    fn fourcc(self) -> FourCC {
        match self {
            PixelFormat::Mjpeg => FourCC::new(b"MJPG"),
            PixelFormat::Yuyv => FourCC::new(b"YUYV"),
        }
    }
}

/// A capture device found by [`list_devices`].
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub path: PathBuf,
    pub name: String,
}

/// Enumerate V4L2 capture nodes.
pub fn list_devices() -> Vec<DeviceInfo> {
    v4l::context::enum_devices()
        .into_iter()
        .map(|node| DeviceInfo {
            index: node.index(),
            path: node.path().to_path_buf(),
            name: node.name().unwrap_or_else(|| "unknown".to_string()),
        })
        .collect()
}

/// Log every capture device. Diagnostic only; the device is picked by
/// `CameraConfig::device`.
pub fn print_devices() {
    let devices = list_devices();
    if devices.is_empty() {
        log::warn!("No capture devices found");
    }
    for device in devices {
        log::info!("Device: {} ({})", device.name, device.path.display());
    }
}

/// V4L2 camera producing RGB frames.
///
/// Prefers MJPEG and falls back to YUYV when the device does not offer it.
/// Capture runs on a dedicated thread. Frames the consumer was too slow to
/// read are replaced, never queued.
pub struct V4l2Camera {
    config: CameraConfig,
    format: PixelFormat,
    width: u32,
    height: u32,
    device: Option<Device>,
    receiver: Option<LatestFrame>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("size", &(self.width, self.height))
            .field("receiver", &self.receiver.is_some())
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<Frame, CameraError> {
        self.receiver()?.recv().await
    }

    async fn try_recv(&mut self) -> Result<Option<Frame>, CameraError> {
        self.receiver()?.try_recv()
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // dropping the receiver makes the capture thread's next publish fail
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    /// Open the device at `config.device` and negotiate a format.
    ///
    /// The driver may round the requested resolution; the frames carry the
    /// size it actually granted.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::Device` if the device cannot be opened or
    /// supports neither MJPEG nor YUYV.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(&config.device)?;

        let (format, granted) = [PixelFormat::Mjpeg, PixelFormat::Yuyv]
            .into_iter()
            .find_map(|pixel_format| {
                let requested =
                    Format::new(config.width, config.height, pixel_format.fourcc());
                match Capture::set_format(&device, &requested) {
                    Ok(granted) if granted.fourcc == pixel_format.fourcc() => {
                        Some((pixel_format, granted))
                    }
                    _ => None,
                }
            })
            .ok_or_else(|| {
                CameraError::Device("device supports neither MJPEG nor YUYV".to_string())
            })?;

        let params = v4l::video::capture::Parameters::with_fps(config.fps);
        Capture::set_params(&device, &params)?;

        if granted.width != config.width || granted.height != config.height {
            log::warn!(
                "Requested {}x{}, device granted {}x{}",
                config.width,
                config.height,
                granted.width,
                granted.height
            );
        }
        log::info!(
            "Opened {} as {:?} {}x{} @ {} fps",
            &config.device,
            format,
            granted.width,
            granted.height,
            config.fps
        );

        Ok(Self {
            config,
            format,
            width: granted.width,
            height: granted.height,
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    /// Start the capture thread on first use.
    fn receiver(&mut self) -> Result<&mut LatestFrame, CameraError> {
        if self.receiver.is_none() {
            self.start()?;
        }
        self.receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("Receiver not initialized".to_string()))
    }

    fn start(&mut self) -> Result<(), CameraError> {
        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("Device already consumed".to_string()))?;

        let buffers = self.config.buffers;
        let (publisher, receiver) = latest_frame();
        let (format, width, height) = (self.format, self.width, self.height);

        let handle = thread::spawn(move || {
            if let Err(e) = Self::capture_loop(device, publisher, buffers, format, width, height) {
                log::error!("Capture thread error: {}", e);
            }
        });

        self.receiver = Some(receiver);
        self.thread_handle = Some(handle);

        Ok(())
    }

    fn capture_loop(
        device: Device,
        publisher: FramePublisher,
        buffers: u32,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffers)?;

        loop {
            // the buffer is only valid until the next call
            let (frame_data, _metadata) = CaptureStream::next(&mut stream)?;

            let frame = match format {
                PixelFormat::Mjpeg => vizor_image::decode_frame(frame_data).map_err(CameraError::from),
                PixelFormat::Yuyv => crate::convert::yuyv_to_frame(frame_data, width, height),
            };

            if !publisher.publish(frame) {
                // receiver dropped
                break;
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Resolution granted by the driver.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
