use std::fmt;

#[derive(Debug, Clone)]
pub enum ImageError {
    Decode(String),
    Tensor(vizor_base::TensorError),
    Shape(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Decode(msg) => write!(f, "decode error: {msg}"),
            ImageError::Tensor(err) => write!(f, "tensor error: {err}"),
            ImageError::Shape(msg) => write!(f, "shape error: {msg}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}

impl From<vizor_base::TensorError> for ImageError {
    fn from(err: vizor_base::TensorError) -> Self {
        ImageError::Tensor(err)
    }
}
