use crate::{Backend, Device, ExecutionHints, InferError, Session};
use ndarray::{ArrayViewD, IxDyn};
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session as OrtSession},
    value::TensorRef,
};
use std::path::Path;
use std::sync::OnceLock;
use vizor_base::Tensor;

static ORT_INIT: OnceLock<()> = OnceLock::new();

fn ensure_ort_init() {
    ORT_INIT.get_or_init(|| {
        let _ = ort::init().with_name("vizor").commit();
    });
}

/// ONNX Runtime backend.
pub struct OnnxBackend {
    device: Device,
    hints: ExecutionHints,
}

impl OnnxBackend {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            hints: ExecutionHints::default(),
        }
    }

    /// Hints are applied to every session this backend creates, as ONNX
    /// Runtime session config entries. They are not passed to the execution
    /// provider's own options, so keys only a provider understands (such as
    /// the DirectML performance preference) are accepted and ignored.
    pub fn with_hints(mut self, hints: ExecutionHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn hints(&self) -> &ExecutionHints {
        &self.hints
    }
}

impl Backend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(&self, path: &Path) -> Result<Box<dyn Session>, InferError> {
        ensure_ort_init();
        let device = &self.device;
        let mut builder = OrtSession::builder().map_err(|e| {
            InferError::ModelLoad(format!("failed to create session builder: {}", e))
        })?;
        builder = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferError::ModelLoad(format!("failed to set optimization level: {}", e)))?;

        for (key, value) in self.hints.iter() {
            builder = builder.with_config_entry(key, value).map_err(|e| {
                InferError::ModelLoad(format!("rejected execution hint {}={}: {}", key, value, e))
            })?;
        }

        builder = match device {
            Device::Cpu => {
                log::info!("[onnx] Using CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::CUDAExecutionProvider;
                log::info!("[onnx] Using CUDA execution provider (device_id={})", device_id);
                let ep = CUDAExecutionProvider::default().with_device_id(*device_id);
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|_| InferError::UnsupportedDevice(device.clone()))?
            }
            #[cfg(feature = "tensorrt")]
            Device::TensorRt { device_id, fp16 } => {
                use ort::execution_providers::TensorRTExecutionProvider;
                log::info!(
                    "[onnx] Using TensorRT execution provider (device_id={}, fp16={})",
                    device_id,
                    fp16
                );
                let ep = TensorRTExecutionProvider::default()
                    .with_device_id(*device_id)
                    .with_fp16(*fp16);
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|_| InferError::UnsupportedDevice(device.clone()))?
            }
            #[cfg(feature = "directml")]
            Device::DirectMl { device_id } => {
                use ort::execution_providers::DirectMLExecutionProvider;
                log::info!("[onnx] Using DirectML execution provider (device_id={})", device_id);
                let ep = DirectMLExecutionProvider::default().with_device_id(*device_id);
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|_| InferError::UnsupportedDevice(device.clone()))?
            }
            #[allow(unreachable_patterns)]
            _ => return Err(InferError::UnsupportedDevice(device.clone())),
        };

        let session = builder.commit_from_file(path).map_err(|e| {
            InferError::ModelLoad(format!("failed to load {}: {}", path.display(), e))
        })?;

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

        if input_names.is_empty() || output_names.is_empty() {
            return Err(InferError::ModelLoad(
                "model must have at least one input and one output".to_string(),
            ));
        }
        log::debug!("[onnx] inputs={:?} outputs={:?}", input_names, output_names);

        Ok(Box::new(OnnxSession {
            session,
            input_names,
            output_names,
        }))
    }
}

/// Session over the model's first input and first output.
pub struct OnnxSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl Session for OnnxSession {
    fn run(&mut self, input: &Tensor<f32>, output: &mut Tensor<f32>) -> Result<(), InferError> {
        let view = ArrayViewD::from_shape(IxDyn(&input.shape), &input.data).map_err(|e| {
            InferError::ShapeMismatch {
                expected: format!("{:?}", input.shape),
                got: e.to_string(),
            }
        })?;
        let tensor_ref = TensorRef::from_array_view(view)
            .map_err(|e| InferError::Run(format!("failed to create tensor ref: {}", e)))?;

        let outputs = self
            .session
            .run(inputs![self.input_names[0].as_str() => tensor_ref])
            .map_err(|e| InferError::Run(e.to_string()))?;

        let output_name = self.output_names[0].as_str();
        let array = outputs[output_name].try_extract_array::<f32>().map_err(|e| {
            InferError::UnsupportedDtype(format!("output '{}' is not f32: {}", output_name, e))
        })?;

        if array.len() != output.len() {
            return Err(InferError::ShapeMismatch {
                expected: format!("{:?}", output.shape),
                got: format!("{:?}", array.shape()),
            });
        }
        for (dst, src) in output.data.iter_mut().zip(array.iter()) {
            *dst = *src;
        }

        Ok(())
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}
