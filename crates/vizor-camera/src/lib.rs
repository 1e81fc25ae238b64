//! Camera capture for the vizor pipeline.
//!
//! A `Camera` yields `Frame`s asynchronously. `V4l2Camera` (feature `v4l2`)
//! wraps a Linux capture device; `StillCamera` repeats a fixed frame.
//! Capture threads hand frames over through `latest_frame`, which keeps only
//! the newest one.

pub mod config;
pub mod convert;
pub mod error;
pub mod latest;
pub mod still;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use latest::{latest_frame, FramePublisher, FrameResult, LatestFrame};
pub use still::StillCamera;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::{list_devices, print_devices, DeviceInfo, V4l2Camera};
