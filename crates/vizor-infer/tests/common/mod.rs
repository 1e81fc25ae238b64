#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vizor_base::Tensor;
use vizor_infer::{Backend, InferError, Session};

/// Session whose behavior is chosen by the model file's contents:
/// `identity`, `scores:<comma separated>`, `fail-run`. A file containing
/// `fail-load` makes the backend reject it.
pub struct MockSession {
    behavior: String,
    input_names: Vec<String>,
    output_names: Vec<String>,
    pub runs: Arc<AtomicUsize>,
}

impl Session for MockSession {
    fn run(&mut self, input: &Tensor<f32>, output: &mut Tensor<f32>) -> Result<(), InferError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match self.behavior.as_str() {
            "identity" => {
                if input.len() != output.len() {
                    return Err(InferError::ShapeMismatch {
                        expected: format!("{:?}", output.shape),
                        got: format!("{:?}", input.shape),
                    });
                }
                output.data.copy_from_slice(&input.data);
                Ok(())
            }
            "fail-run" => Err(InferError::Run("device lost".to_string())),
            other => {
                let scores: Vec<f32> = other
                    .trim_start_matches("scores:")
                    .split(',')
                    .map(|s| s.trim().parse().unwrap())
                    .collect();
                output.data.copy_from_slice(&scores);
                Ok(())
            }
        }
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

#[derive(Default)]
pub struct MockBackend {
    pub loads: Arc<AtomicUsize>,
    pub runs: Arc<AtomicUsize>,
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn load_model(&self, path: &Path) -> Result<Box<dyn Session>, InferError> {
        let behavior = std::fs::read_to_string(path)?.trim().to_string();
        if behavior == "fail-load" {
            return Err(InferError::ModelLoad("corrupt graph".to_string()));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            behavior,
            input_names: vec!["input".to_string()],
            output_names: vec!["output".to_string()],
            runs: self.runs.clone(),
        }))
    }
}

/// Temporary model directory, removed on drop.
pub struct ModelDir {
    pub path: PathBuf,
}

impl ModelDir {
    pub fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "vizor-models-{}-{}",
            tag,
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    /// Write `<name>.onnx` with `behavior` as its contents.
    pub fn add(&self, name: &str, behavior: &str) -> &Self {
        std::fs::write(self.path.join(format!("{}.onnx", name)), behavior).unwrap();
        self
    }
}

impl Drop for ModelDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
