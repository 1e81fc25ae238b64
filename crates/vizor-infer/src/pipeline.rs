use crate::catalog::OutputKind;
use crate::postprocess::{postprocess_image, Classification};
use crate::{InferError, ModelSelector};
use std::borrow::Cow;
use std::time::Instant;
use vizor_image::{resize, Frame, Interpolation};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Mirror frames before inference (selfie view).
    pub mirror: bool,
    pub display_width: usize,
    pub display_height: usize,
    pub display_interpolation: Interpolation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mirror: true,
            display_width: 640,
            display_height: 480,
            display_interpolation: Interpolation::Linear,
        }
    }
}

impl PipelineConfig {
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_display_size(mut self, width: usize, height: usize) -> Self {
        self.display_width = width;
        self.display_height = height;
        self
    }

    pub fn with_display_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.display_interpolation = interpolation;
        self
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// Styled (or passed-through) frame at display size.
    Image(Frame),
    /// The input frame at display size plus the class probabilities.
    Classes {
        frame: Frame,
        classification: Classification,
    },
}

impl PipelineOutput {
    pub fn frame(&self) -> &Frame {
        match self {
            PipelineOutput::Image(frame) => frame,
            PipelineOutput::Classes { frame, .. } => frame,
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match self {
            PipelineOutput::Image(_) => None,
            PipelineOutput::Classes { classification, .. } => Some(classification),
        }
    }
}

/// Capture frame in, display frame out, through the selected model.
pub struct FramePipeline {
    selector: ModelSelector,
    config: PipelineConfig,
}

impl FramePipeline {
    pub fn new(selector: ModelSelector, config: PipelineConfig) -> Self {
        Self { selector, config }
    }

    /// Run one tick.
    ///
    /// An `InferError::Run` means only this frame is lost; see
    /// `InferError::is_retryable`.
    pub fn process(&mut self, frame: &Frame) -> Result<PipelineOutput, InferError> {
        let started = Instant::now();
        let frame = if self.config.mirror {
            Cow::Owned(frame.flip_horizontal())
        } else {
            Cow::Borrowed(frame)
        };

        let config = &self.config;
        let active = self.selector.active_mut();
        active.infer(&frame)?;

        let output = match &active.spec().output {
            OutputKind::Passthrough => PipelineOutput::Image(to_display(config, &frame)?),
            OutputKind::Image { clamp, denormalize } => PipelineOutput::Image(postprocess_image(
                &active.output().data,
                &active.spec().input,
                *clamp,
                denormalize.as_ref(),
                (config.display_width, config.display_height),
                config.display_interpolation,
            )?),
            OutputKind::Classes { labels } => {
                let classification =
                    Classification::from_scores(labels.clone(), active.output().data.clone())?;
                PipelineOutput::Classes {
                    frame: to_display(config, &frame)?,
                    classification,
                }
            }
        };

        log::debug!(
            "tick [{}] took {} ms",
            self.selector.active().spec().name,
            started.elapsed().as_millis()
        );
        Ok(output)
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut ModelSelector {
        &mut self.selector
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PipelineConfig {
        &mut self.config
    }
}

fn to_display(config: &PipelineConfig, frame: &Frame) -> Result<Frame, InferError> {
    Ok(resize(
        frame,
        config.display_width,
        config.display_height,
        config.display_interpolation,
    )?)
}
