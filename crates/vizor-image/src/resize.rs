use crate::{Frame, ImageError};
use crates_image::imageops::{self, FilterType};
use crates_image::{ImageBuffer, Rgb};
use fast_image_resize as fr;
use serde::{Deserialize, Serialize};

/// Resampling policy used when a frame changes resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
    Cubic,
    /// Pixel-area averaging. Best for shrinking; if either axis grows the
    /// whole resize uses `Linear`.
    Area,
}

impl Interpolation {
    fn filter(self) -> FilterType {
        match self {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Linear | Interpolation::Area => FilterType::Triangle,
            Interpolation::Cubic => FilterType::CatmullRom,
        }
    }
}

/// Resize `frame` to `width` x `height`.
///
/// Returns a clone when the size already matches.
pub fn resize(
    frame: &Frame,
    width: usize,
    height: usize,
    interpolation: Interpolation,
) -> Result<Frame, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Shape(format!(
            "cannot resize to {}x{}",
            width, height
        )));
    }
    if frame.width() == width && frame.height() == height {
        return Ok(frame.clone());
    }

    let shrinking = width <= frame.width() && height <= frame.height();
    let data = if interpolation == Interpolation::Area && shrinking {
        area_resize(frame, width, height)?
    } else {
        let source: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(
            frame.width() as u32,
            frame.height() as u32,
            frame.data().to_vec(),
        )
        .ok_or_else(|| ImageError::Shape("pixel buffer smaller than frame".to_string()))?;
        imageops::resize(&source, width as u32, height as u32, interpolation.filter()).into_raw()
    };

    Frame::from_raw(width, height, frame.order(), data)
}

/// Box-filter convolution, which averages the covered source area.
fn area_resize(frame: &Frame, width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
    let src = fr::images::ImageRef::new(
        frame.width() as u32,
        frame.height() as u32,
        frame.data(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ImageError::Shape(format!("invalid source frame: {}", e)))?;
    let mut dst = fr::images::Image::new(width as u32, height as u32, fr::PixelType::U8x3);

    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Box));
    fr::Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .map_err(|e| ImageError::Shape(format!("area resize failed: {}", e)))?;

    Ok(dst.into_vec())
}
