use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value performance preferences handed to the engine when a session
/// is created. They are passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionHints {
    entries: BTreeMap<String, String>,
}

impl ExecutionHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// High-performance GPU preference with metacommands on and graph capture off.
    pub fn high_performance() -> Self {
        Self::new()
            .with("performance_preference", "high_performance")
            .with("device_filter", "gpu")
            .with("disable_metacommands", "false")
            .with("enable_graph_capture", "false")
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
