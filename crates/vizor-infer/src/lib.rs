//! Model pipeline for live camera frames.
//!
//! A `ModelSelector` owns the active model (session plus input and output
//! buffers) chosen from a `ModelCatalog`. `FramePipeline` runs one frame
//! through it: preprocess, run, postprocess.

pub mod backend;
pub mod backends;
pub mod catalog;
pub mod device;
pub mod error;
pub mod hints;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod selector;
pub mod session;

pub use backend::Backend;
pub use catalog::{
    ClampPolicy, InputSpec, ModelCatalog, ModelSpec, Normalization, OutputKind, FERPLUS_LABELS,
};
pub use device::Device;
pub use error::InferError;
pub use hints::ExecutionHints;
pub use pipeline::{FramePipeline, PipelineConfig, PipelineOutput};
pub use postprocess::{planar_to_interleaved, postprocess_image, softmax, Classification};
pub use preprocess::{interleaved_to_planar, preprocess};
pub use selector::{ActiveModel, ModelSelector};
pub use session::Session;

#[cfg(feature = "onnx")]
pub use backends::{OnnxBackend, OnnxSession};
