use std::fmt;

#[derive(Debug, Clone)]
pub enum CameraError {
    Device(String),
    Stream(String),
    Decode(vizor_image::ImageError),
    Channel(String),
    /// Invalid capture setting.
    Config(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "stream error: {msg}"),
            CameraError::Decode(err) => write!(f, "decode error: {err}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
            CameraError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Device(err.to_string())
    }
}

impl From<vizor_image::ImageError> for CameraError {
    fn from(err: vizor_image::ImageError) -> Self {
        CameraError::Decode(err)
    }
}
