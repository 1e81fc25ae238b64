use crate::Device;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum InferError {
    /// The model file does not exist.
    ModelNotFound(PathBuf),
    /// The engine rejected the model while building a session.
    ModelLoad(String),
    /// No model with this name in the catalog.
    UnknownModel(String),
    UnsupportedDevice(Device),
    UnsupportedDtype(String),
    ShapeMismatch { expected: String, got: String },
    /// Softmax over an empty score vector.
    EmptyScores,
    /// A single inference call failed. The next frame may succeed.
    Run(String),
    Catalog(String),
    Io(String),
    Tensor(vizor_base::TensorError),
    Image(vizor_image::ImageError),
}

impl InferError {
    /// True for per-frame failures where the caller should drop the frame
    /// and try again on the next tick. Everything else is configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InferError::Run(_))
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ModelNotFound(path) => write!(f, "model file not found: {}", path.display()),
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::UnknownModel(name) => write!(f, "unknown model: {name}"),
            InferError::UnsupportedDevice(device) => write!(f, "unsupported device: {device}"),
            InferError::UnsupportedDtype(msg) => write!(f, "unsupported dtype: {msg}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::EmptyScores => write!(f, "softmax of an empty score vector"),
            InferError::Run(msg) => write!(f, "inference failed: {msg}"),
            InferError::Catalog(msg) => write!(f, "catalog error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Tensor(err) => write!(f, "tensor error: {err}"),
            InferError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InferError {
    fn from(err: serde_json::Error) -> Self {
        InferError::Catalog(err.to_string())
    }
}

impl From<vizor_base::TensorError> for InferError {
    fn from(err: vizor_base::TensorError) -> Self {
        InferError::Tensor(err)
    }
}

impl From<vizor_image::ImageError> for InferError {
    fn from(err: vizor_image::ImageError) -> Self {
        InferError::Image(err)
    }
}
