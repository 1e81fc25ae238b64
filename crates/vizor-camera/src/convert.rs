use crate::CameraError;
use vizor_image::{ChannelOrder, Frame};

/// BT.601 conversion of one luma sample with shared chroma.
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    let r = y + 1.402 * (v - 128.0);
    let g = y - 0.344 * (u - 128.0) - 0.714 * (v - 128.0);
    let b = y + 1.772 * (u - 128.0);
    [
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        b.clamp(0.0, 255.0) as u8,
    ]
}

/// Converts packed YUYV (YUV 4:2:2, `[Y0, U, Y1, V, ...]`) to an RGB frame.
///
/// Trailing bytes beyond `width * height * 2` are ignored (drivers pad buffers).
///
/// # Errors
///
/// Returns `CameraError::Stream` if `data` is shorter than `width * height * 2`.
pub fn yuyv_to_frame(data: &[u8], width: u32, height: u32) -> Result<Frame, CameraError> {
    let pixel_count = (width as usize) * (height as usize);
    let expected_len = pixel_count * 2;
    if data.len() < expected_len {
        return Err(CameraError::Stream(format!(
            "YUYV buffer too short: expected {} bytes, got {}",
            expected_len,
            data.len()
        )));
    }

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in data[..expected_len].chunks_exact(4) {
        let u = chunk[1] as f32;
        let v = chunk[3] as f32;
        rgb.extend_from_slice(&yuv_to_rgb(chunk[0] as f32, u, v));
        rgb.extend_from_slice(&yuv_to_rgb(chunk[2] as f32, u, v));
    }

    Ok(Frame::from_raw(
        width as usize,
        height as usize,
        ChannelOrder::Rgb,
        rgb,
    )?)
}
