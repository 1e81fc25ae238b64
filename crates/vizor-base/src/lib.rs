pub mod logging;
pub mod tensor;

pub use logging::{init_file_logger, init_stdout_logger, FileLogger, StdoutLogger};
pub use tensor::{Tensor, TensorError};

// Re-export log crate so downstream crates can use vizor_base::log::*
pub use log;
