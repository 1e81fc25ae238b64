use crate::{InferError, Session};
use std::path::Path;

pub trait Backend {
    fn name(&self) -> &str;
    fn load_model(&self, path: &Path) -> Result<Box<dyn Session>, InferError>;
}
