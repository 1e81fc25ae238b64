//! Frame type and image operations for the vizor pipeline.
//!
//! Frames are 8-bit, 3-channel, interleaved (`[height, width, 3]`) and
//! carry their channel order. Resampling and decoding are delegated to the
//! `image` crate.

pub mod error;
pub mod frame;
pub mod resize;

pub use error::ImageError;
pub use frame::{ChannelOrder, Frame};
pub use resize::{resize, Interpolation};

/// Decodes an encoded image (JPEG, PNG, BMP) into an RGB frame.
///
/// Grayscale, alpha and 16-bit sources are converted to 8-bit RGB.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub fn decode_frame(data: &[u8]) -> Result<Frame, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.into_rgb8();
    let (width, height) = rgb.dimensions();
    Frame::from_raw(
        width as usize,
        height as usize,
        ChannelOrder::Rgb,
        rgb.into_raw(),
    )
}
