use crate::catalog::InputSpec;
use crate::InferError;
use vizor_image::{resize, Frame};

/// Re-layout interleaved HWC samples into planar CHW floats.
///
/// Sample (row `r`, column `c`, channel `ch`) lands at `ch*H*W + r*W + c`.
pub fn interleaved_to_planar(src: &[u8], height: usize, width: usize, out: &mut [f32]) {
    write_planar(src, height, width, [0, 1, 2], out, |v, _| v);
}

/// Shared HWC to CHW loop. `channel_map[dst]` names the source channel
/// that feeds planar channel `dst`.
fn write_planar(
    src: &[u8],
    height: usize,
    width: usize,
    channel_map: [usize; 3],
    out: &mut [f32],
    scale: impl Fn(f32, usize) -> f32,
) {
    let plane = height * width;
    debug_assert_eq!(src.len(), plane * 3, "source must be [H, W, 3]");
    debug_assert_eq!(out.len(), plane * 3, "destination must hold 3*H*W floats");

    for (dst_ch, &src_ch) in channel_map.iter().enumerate() {
        let dst = &mut out[dst_ch * plane..(dst_ch + 1) * plane];
        for (i, value) in dst.iter_mut().enumerate() {
            *value = scale(src[i * 3 + src_ch] as f32, dst_ch);
        }
    }
}

/// Turn a captured frame into the model's planar input.
///
/// Resizes with the model's interpolation, matches channel order (or
/// converts to luma for single-channel models), normalizes, and writes
/// `C*H*W` floats into `out`.
///
/// `out` must be exactly `spec.len()` long.
pub fn preprocess(frame: &Frame, spec: &InputSpec, out: &mut [f32]) -> Result<(), InferError> {
    debug_assert_eq!(out.len(), spec.len(), "input buffer does not match the model");

    let resized = resize(frame, spec.width, spec.height, spec.interpolation)?;
    let norm = &spec.normalization;

    if spec.channels == 1 {
        for (dst, luma) in out.iter_mut().zip(resized.to_luma()) {
            *dst = norm.apply(luma as f32, 0);
        }
        return Ok(());
    }

    let channel_map = if resized.order() == spec.channel_order {
        [0, 1, 2]
    } else {
        [2, 1, 0]
    };
    write_planar(resized.data(), spec.height, spec.width, channel_map, out, |v, c| {
        norm.apply(v, c)
    });
    Ok(())
}
