use std::fmt;

/// Execution target for a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Cpu,
    Cuda { device_id: i32 },
    TensorRt { device_id: i32, fp16: bool },
    DirectMl { device_id: i32 },
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "CPU"),
            Device::Cuda { device_id } => write!(f, "CUDA(device_id={device_id})"),
            Device::TensorRt { device_id, fp16 } => {
                write!(f, "TensorRT(device_id={device_id}, fp16={fp16})")
            }
            Device::DirectMl { device_id } => write!(f, "DirectML(device_id={device_id})"),
        }
    }
}

impl std::str::FromStr for Device {
    type Err = String;

    /// Parses `cpu`, `cuda`, `cuda:1`, `tensorrt`, `tensorrt:0:fp16`, `directml`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let kind = parts.next().unwrap_or_default().to_ascii_lowercase();
        let device_id = match parts.next() {
            Some(id) => id
                .parse::<i32>()
                .map_err(|_| format!("invalid device id in '{s}'"))?,
            None => 0,
        };
        match kind.as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda { device_id }),
            "tensorrt" | "trt" => Ok(Device::TensorRt {
                device_id,
                fp16: parts.next() == Some("fp16"),
            }),
            "directml" | "dml" => Ok(Device::DirectMl { device_id }),
            _ => Err(format!("unknown device '{s}'")),
        }
    }
}
