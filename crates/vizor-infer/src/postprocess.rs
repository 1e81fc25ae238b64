use crate::catalog::{ClampPolicy, InputSpec, Normalization};
use crate::InferError;
use vizor_image::{resize, Frame, Interpolation};

/// Re-layout planar CHW floats into interleaved HWC bytes.
///
/// Planar sample `c*(h*w) + i` becomes byte `i*3 + c` after `clamp`.
pub fn planar_to_interleaved(
    input: &[f32],
    height: usize,
    width: usize,
    clamp: ClampPolicy,
    out: &mut [u8],
) {
    let stride = height * width;
    debug_assert!(input.len() >= stride * 3, "planar input must hold 3*H*W floats");
    debug_assert_eq!(out.len(), stride * 3);

    for c in 0..3 {
        let plane = &input[c * stride..(c + 1) * stride];
        for (i, &value) in plane.iter().enumerate() {
            out[i * 3 + c] = clamp.apply(value);
        }
    }
}

/// Turn a planar image output back into a displayable frame.
///
/// The output is read at the model's input resolution and channel order,
/// optionally de-normalized, clamped, then resized to `display_size`.
pub fn postprocess_image(
    output: &[f32],
    spec: &InputSpec,
    clamp: ClampPolicy,
    denormalize: Option<&Normalization>,
    display_size: (usize, usize),
    interpolation: Interpolation,
) -> Result<Frame, InferError> {
    let (height, width) = (spec.height, spec.width);
    if output.len() != 3 * height * width {
        return Err(InferError::ShapeMismatch {
            expected: format!("[1, 3, {}, {}]", height, width),
            got: format!("{} values", output.len()),
        });
    }

    let mut pixels = vec![0u8; 3 * height * width];
    match denormalize {
        Some(norm) => {
            let stride = height * width;
            let restored: Vec<f32> = output
                .iter()
                .enumerate()
                .map(|(i, &v)| norm.invert(v, i / stride))
                .collect();
            planar_to_interleaved(&restored, height, width, clamp, &mut pixels);
        }
        None => planar_to_interleaved(output, height, width, clamp, &mut pixels),
    }

    let frame = Frame::from_raw(width, height, spec.channel_order, pixels)?;
    let (display_width, display_height) = display_size;
    Ok(resize(&frame, display_width, display_height, interpolation)?)
}

/// Numerically stable in-place softmax.
///
/// Uses the log-sum-exp offset `max + ln(sum(exp(s - max)))`, computed in
/// `f64`, so large scores neither overflow nor lose precision. The result is non-negative and sums to 1.
pub fn softmax(scores: &mut [f32]) -> Result<(), InferError> {
    if scores.is_empty() {
        return Err(InferError::EmptyScores);
    }

    // f64 so the offset keeps enough precision next to large scores
    let max = scores.iter().map(|&s| s as f64).fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = scores.iter().map(|&s| (s as f64 - max).exp()).sum();
    let offset = max + sum.ln();

    for s in scores.iter_mut() {
        *s = ((*s as f64) - offset).exp() as f32;
    }
    Ok(())
}

/// Class probabilities paired with their labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    labels: Vec<String>,
    probabilities: Vec<f32>,
}

impl Classification {
    /// Apply softmax to `scores` and pair them with `labels`.
    pub fn from_scores(labels: Vec<String>, mut scores: Vec<f32>) -> Result<Self, InferError> {
        if labels.len() != scores.len() {
            return Err(InferError::ShapeMismatch {
                expected: format!("{} scores", labels.len()),
                got: format!("{} scores", scores.len()),
            });
        }
        softmax(&mut scores)?;
        Ok(Self {
            labels,
            probabilities: scores,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    /// Most likely label and its probability. Ties go to the lower index.
    pub fn top(&self) -> (&str, f32) {
        let (index, &p) = self
            .probabilities
            .iter()
            .enumerate()
            .fold((0, &f32::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best });
        (self.labels[index].as_str(), p)
    }

    /// Labels sorted by descending probability.
    pub fn ranked(&self) -> Vec<(&str, f32)> {
        let mut ranked: Vec<(&str, f32)> = self
            .labels
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}
