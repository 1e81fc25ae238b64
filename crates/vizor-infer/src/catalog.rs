use crate::{ExecutionHints, InferError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use vizor_image::{ChannelOrder, Interpolation};

/// Pixel value scaling applied after resizing.
///
/// `rescale` divides 0..255 samples by 255; `mean`/`std` then standardize
/// each channel. Single-channel inputs use index 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Normalization {
    #[serde(default)]
    pub rescale: bool,
    #[serde(default)]
    pub mean: Option<[f32; 3]>,
    #[serde(default)]
    pub std: Option<[f32; 3]>,
}

impl Normalization {
    /// Raw 0..255 samples.
    pub fn none() -> Self {
        Self::default()
    }

    /// 0..1 samples.
    pub fn unit() -> Self {
        Self {
            rescale: true,
            ..Self::default()
        }
    }

    /// ImageNet mean/std on 0..1 samples (RGB order).
    pub fn imagenet() -> Self {
        Self {
            rescale: true,
            mean: Some([0.485, 0.456, 0.406]),
            std: Some([0.229, 0.224, 0.225]),
        }
    }

    pub fn is_identity(&self) -> bool {
        !self.rescale && self.mean.is_none() && self.std.is_none()
    }

    #[inline]
    pub fn apply(&self, value: f32, channel: usize) -> f32 {
        let mut v = if self.rescale { value / 255.0 } else { value };
        if let Some(mean) = self.mean {
            v -= mean[channel];
        }
        if let Some(std) = self.std {
            v /= std[channel];
        }
        v
    }

    /// Map a normalized value back to the 0..255 range.
    #[inline]
    pub fn invert(&self, value: f32, channel: usize) -> f32 {
        let mut v = value;
        if let Some(std) = self.std {
            v *= std[channel];
        }
        if let Some(mean) = self.mean {
            v += mean[channel];
        }
        if self.rescale { v * 255.0 } else { v }
    }
}

/// How float samples outside 0..255 become bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Clamp to [0, 255] on both ends.
    #[default]
    Saturate,
    /// Any sample outside [0, 255] becomes 0. Some style-transfer exports
    /// were tuned against this; new models should use `Saturate`.
    ZeroOutOfRange,
}

impl ClampPolicy {
    /// Convert one sample, truncating toward zero.
    #[inline]
    pub fn apply(self, value: f32) -> u8 {
        match self {
            // NaN casts to 0
            ClampPolicy::Saturate => value.clamp(0.0, 255.0) as u8,
            ClampPolicy::ZeroOutOfRange => {
                if (0.0..=255.0).contains(&value) {
                    value as u8
                } else {
                    0
                }
            }
        }
    }
}

/// Shape and preprocessing a model expects for its single input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    #[serde(default)]
    pub channel_order: ChannelOrder,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub normalization: Normalization,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            channels: 3,
            height: 224,
            width: 224,
            channel_order: ChannelOrder::Rgb,
            interpolation: Interpolation::Linear,
            normalization: Normalization::none(),
        }
    }
}

impl InputSpec {
    /// `[1, C, H, W]`
    pub fn shape(&self) -> Vec<usize> {
        vec![1, self.channels, self.height, self.width]
    }

    pub fn len(&self) -> usize {
        self.channels * self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the model's output tensor means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputKind {
    /// No model: frames are shown as captured.
    Passthrough,
    /// A planar image with the same shape as the input.
    Image {
        #[serde(default)]
        clamp: ClampPolicy,
        #[serde(default)]
        denormalize: Option<Normalization>,
    },
    /// One score per label.
    Classes { labels: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    /// Explicit model file. Defaults to `<base_dir>/<name>.<extension>`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub input: InputSpec,
    pub output: OutputKind,
}

impl ModelSpec {
    pub fn passthrough(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            input: InputSpec::default(),
            output: OutputKind::Passthrough,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.output, OutputKind::Passthrough)
    }

    /// Declared output shape: `[1, C, H, W]` for images, `[1, N]` for classes.
    pub fn output_shape(&self) -> Vec<usize> {
        match &self.output {
            OutputKind::Passthrough => vec![0],
            OutputKind::Image { .. } => self.input.shape(),
            OutputKind::Classes { labels } => vec![1, labels.len()],
        }
    }

    pub fn input_shape(&self) -> Vec<usize> {
        if self.is_passthrough() {
            vec![0]
        } else {
            self.input.shape()
        }
    }

    fn validate(&self) -> Result<(), InferError> {
        if self.is_passthrough() {
            return Ok(());
        }
        let input = &self.input;
        if input.channels != 1 && input.channels != 3 {
            return Err(InferError::Catalog(format!(
                "{}: input must have 1 or 3 channels, got {}",
                self.name, input.channels
            )));
        }
        if input.height == 0 || input.width == 0 {
            return Err(InferError::Catalog(format!(
                "{}: input size {}x{} is empty",
                self.name, input.width, input.height
            )));
        }
        match &self.output {
            OutputKind::Image { .. } if input.channels != 3 => Err(InferError::Catalog(format!(
                "{}: image output needs a 3-channel input",
                self.name
            ))),
            OutputKind::Classes { labels } if labels.is_empty() => Err(InferError::Catalog(
                format!("{}: classification output needs labels", self.name),
            )),
            _ => Ok(()),
        }
    }
}

fn default_extension() -> String {
    "onnx".to_string()
}

/// The fixed set of models the selector chooses among.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub base_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub hints: ExecutionHints,
    pub models: Vec<ModelSpec>,
}

/// FER+ emotion classes, in output order.
pub const FERPLUS_LABELS: [&str; 8] = [
    "neutral",
    "happiness",
    "surprise",
    "sadness",
    "anger",
    "disgust",
    "fear",
    "contempt",
];

impl ModelCatalog {
    pub fn new(base_dir: impl Into<PathBuf>, models: Vec<ModelSpec>) -> Result<Self, InferError> {
        let catalog = Self {
            base_dir: base_dir.into(),
            extension: default_extension(),
            hints: ExecutionHints::default(),
            models,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Camera pass-through, four fast-neural-style models and FER+ emotion.
    pub fn builtin(base_dir: impl Into<PathBuf>) -> Self {
        let style = |name: &str, size: usize, channel_order: ChannelOrder| ModelSpec {
            name: name.to_string(),
            path: None,
            input: InputSpec {
                channels: 3,
                height: size,
                width: size,
                channel_order,
                interpolation: Interpolation::Linear,
                normalization: Normalization::none(),
            },
            output: OutputKind::Image {
                clamp: ClampPolicy::Saturate,
                denormalize: None,
            },
        };

        Self {
            base_dir: base_dir.into(),
            extension: default_extension(),
            hints: ExecutionHints::high_performance(),
            models: vec![
                ModelSpec::passthrough("camera"),
                // candy was exported from BGR captures, so no channel swap
                style("candy", 720, ChannelOrder::Bgr),
                style("mosaic", 224, ChannelOrder::Rgb),
                style("udnie", 224, ChannelOrder::Rgb),
                style("rain-princess", 224, ChannelOrder::Rgb),
                ModelSpec {
                    name: "emotion-ferplus-8".to_string(),
                    path: None,
                    input: InputSpec {
                        channels: 1,
                        height: 64,
                        width: 64,
                        channel_order: ChannelOrder::Rgb,
                        interpolation: Interpolation::Area,
                        normalization: Normalization::none(),
                    },
                    output: OutputKind::Classes {
                        labels: FERPLUS_LABELS.iter().map(|l| l.to_string()).collect(),
                    },
                },
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, InferError> {
        let catalog: ModelCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a JSON catalog. A relative `base_dir` is taken relative to the
    /// catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| InferError::Io(format!("{}: {}", path.display(), e)))?;
        let mut catalog = Self::from_json(&json)?;
        if catalog.base_dir.is_relative() {
            if let Some(parent) = path.parent() {
                catalog.base_dir = parent.join(&catalog.base_dir);
            }
        }
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), InferError> {
        if self.models.is_empty() {
            return Err(InferError::Catalog("catalog has no models".to_string()));
        }
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.name.as_str()) {
                return Err(InferError::Catalog(format!(
                    "duplicate model name: {}",
                    model.name
                )));
            }
            model.validate()?;
        }
        Ok(())
    }

    /// File the model is loaded from.
    pub fn model_path(&self, spec: &ModelSpec) -> PathBuf {
        match &spec.path {
            Some(path) => path.clone(),
            None => self
                .base_dir
                .join(format!("{}.{}", spec.name, self.extension)),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ModelSpec> {
        self.models.get(index)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.models.iter().position(|m| m.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
