use crate::ImageError;
use serde::{Deserialize, Serialize};
use vizor_base::Tensor;

/// Byte order of the three interleaved channels of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// A captured 8-bit 3-channel image.
///
/// Pixels are interleaved (`[height, width, 3]`), origin top-left. The
/// channel order travels with the pixels so consumers never have to guess
/// whether a buffer is RGB or BGR.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: Tensor<u8>,
    order: ChannelOrder,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// Wrap an existing `[H, W, 3]` tensor.
    pub fn new(pixels: Tensor<u8>, order: ChannelOrder) -> Result<Self, ImageError> {
        if pixels.shape.len() != 3 || pixels.shape[2] != Self::CHANNELS {
            return Err(ImageError::Shape(format!(
                "expected [H, W, 3], got {:?}",
                pixels.shape
            )));
        }
        Ok(Self { pixels, order })
    }

    pub fn from_raw(
        width: usize,
        height: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let pixels = Tensor::new(vec![height, width, Self::CHANNELS], data)?;
        Ok(Self { pixels, order })
    }

    /// A frame where every pixel is `color` (given in `order`).
    pub fn filled(width: usize, height: usize, order: ChannelOrder, color: [u8; 3]) -> Self {
        let data = color
            .iter()
            .copied()
            .cycle()
            .take(width * height * Self::CHANNELS)
            .collect();
        Self {
            pixels: Tensor {
                shape: vec![height, width, Self::CHANNELS],
                data,
            },
            order,
        }
    }

    pub fn width(&self) -> usize {
        self.pixels.shape[1]
    }

    pub fn height(&self) -> usize {
        self.pixels.shape[0]
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &self.pixels.data
    }

    /// Channels of the pixel at (`x`, `y`) in this frame's order.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width() + x) * Self::CHANNELS;
        let data = &self.pixels.data;
        [data[idx], data[idx + 1], data[idx + 2]]
    }

    /// Return the frame in `order`, swapping the first and third channel if needed.
    pub fn to_order(&self, order: ChannelOrder) -> Frame {
        if order == self.order {
            return self.clone();
        }
        let mut pixels = self.pixels.clone();
        for px in pixels.data.chunks_exact_mut(Self::CHANNELS) {
            px.swap(0, 2);
        }
        Frame { pixels, order }
    }

    /// Mirror around the vertical axis.
    pub fn flip_horizontal(&self) -> Frame {
        let width = self.width();
        let row_len = width * Self::CHANNELS;
        let mut data = Vec::with_capacity(self.pixels.data.len());
        for row in self.pixels.data.chunks_exact(row_len) {
            for px in row.chunks_exact(Self::CHANNELS).rev() {
                data.extend_from_slice(px);
            }
        }
        Frame {
            pixels: Tensor {
                shape: self.pixels.shape.clone(),
                data,
            },
            order: self.order,
        }
    }

    /// BT.601 luma per pixel, row-major.
    pub fn to_luma(&self) -> Vec<u8> {
        let (r, b) = match self.order {
            ChannelOrder::Rgb => (0, 2),
            ChannelOrder::Bgr => (2, 0),
        };
        self.pixels
            .data
            .chunks_exact(Self::CHANNELS)
            .map(|px| {
                let y = 0.299 * px[r] as f32 + 0.587 * px[1] as f32 + 0.114 * px[b] as f32;
                y.round().clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}
