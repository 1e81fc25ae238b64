use crate::InferError;
use vizor_base::Tensor;

/// A loaded model bound to one input and one output.
pub trait Session {
    /// Run the model on `input`, writing the result into `output`.
    ///
    /// `output` is pre-allocated with the model's declared shape; a result
    /// of a different size is a `ShapeMismatch`. Engine failures are
    /// reported as `InferError::Run`.
    fn run(&mut self, input: &Tensor<f32>, output: &mut Tensor<f32>) -> Result<(), InferError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}
