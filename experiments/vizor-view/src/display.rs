use vizor_image::{ChannelOrder, Frame};
use vizor_infer::Classification;

pub const BAR_HEIGHT: usize = 10;
pub const BAR_GAP: usize = 4;
pub const BAR_MARGIN: usize = 8;

const BAR_COLOR: u32 = 0x0040_80ff;
const TOP_BAR_COLOR: u32 = 0x00ff_c040;
const TRACK_COLOR: u32 = 0x0020_2020;

/// Pack a frame into minifb's 0x00RRGGBB pixels, honoring its channel order.
pub fn frame_to_argb(frame: &Frame) -> Vec<u32> {
    let (r, b) = match frame.order() {
        ChannelOrder::Rgb => (0, 2),
        ChannelOrder::Bgr => (2, 0),
    };
    frame
        .data()
        .chunks_exact(Frame::CHANNELS)
        .map(|px| ((px[r] as u32) << 16) | ((px[1] as u32) << 8) | px[b] as u32)
        .collect()
}

/// Fill the rectangle, clipped to the buffer.
pub fn fill_rect(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    color: u32,
) {
    let x_end = (x + w).min(width);
    let y_end = (y + h).min(height);
    for row in y.min(height)..y_end {
        let start = row * width;
        buf[start + x.min(x_end)..start + x_end].fill(color);
    }
}

/// One horizontal bar per class, in label order, top-left of the frame.
/// The most likely class is highlighted.
pub fn draw_probability_bars(
    buf: &mut [u32],
    width: usize,
    height: usize,
    classification: &Classification,
) {
    let track = (width / 3).max(1);
    let (top_label, _) = classification.top();

    for (i, (label, &p)) in classification
        .labels()
        .iter()
        .zip(classification.probabilities())
        .enumerate()
    {
        let y = BAR_MARGIN + i * (BAR_HEIGHT + BAR_GAP);
        let len = (p.clamp(0.0, 1.0) * track as f32).round() as usize;
        let color = if label == top_label {
            TOP_BAR_COLOR
        } else {
            BAR_COLOR
        };
        fill_rect(buf, width, height, BAR_MARGIN, y, track, BAR_HEIGHT, TRACK_COLOR);
        fill_rect(buf, width, height, BAR_MARGIN, y, len, BAR_HEIGHT, color);
    }
}

/// Window title for the current selection.
pub fn window_title(model: &str, classification: Option<&Classification>) -> String {
    match classification {
        Some(c) => {
            let (label, p) = c.top();
            format!("vizor - {} - {} ({:.0}%)", model, label, p * 100.0)
        }
        None => format!("vizor - {}", model),
    }
}
