//! Provider-specific configuration handed to session builders.

use std::path::PathBuf;

use ronn_core::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the TensorRT execution provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensorRtProviderOptions {
    /// CUDA device ordinal.
    pub device_id: u32,
    /// Maximum partitioning iterations before giving up on a subgraph.
    pub max_partition_iterations: u32,
    /// Smallest subgraph worth handing to TensorRT.
    pub min_subgraph_size: u32,
    /// Builder workspace limit in bytes.
    pub max_workspace_size: usize,
    /// Allow FP16 kernels.
    pub fp16_enable: bool,
    /// Allow INT8 kernels.
    pub int8_enable: bool,
    /// Persist built engines between runs.
    pub engine_cache_enable: bool,
    /// Engine cache directory; the working directory when unset.
    pub engine_cache_path: Option<PathBuf>,
    /// Dump partitioned subgraphs for debugging.
    pub dump_subgraphs: bool,
}

impl Default for TensorRtProviderOptions {
    fn default() -> Self {
        Self {
            device_id: 0,
            max_partition_iterations: 1000,
            min_subgraph_size: 1,
            max_workspace_size: 1 << 30,
            fp16_enable: false,
            int8_enable: false,
            engine_cache_enable: false,
            engine_cache_path: None,
            dump_subgraphs: false,
        }
    }
}

impl TensorRtProviderOptions {
    /// Create options with TensorRT's defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::invalid_argument(format!("invalid TensorRT options: {e}")))
    }

    /// Select the CUDA device.
    pub fn with_device_id(mut self, device_id: u32) -> Self {
        self.device_id = device_id;
        self
    }

    /// Allow FP16 kernels.
    pub fn with_fp16(mut self, enable: bool) -> Self {
        self.fp16_enable = enable;
        self
    }

    /// Allow INT8 kernels.
    pub fn with_int8(mut self, enable: bool) -> Self {
        self.int8_enable = enable;
        self
    }

    /// Set the builder workspace limit.
    pub fn with_max_workspace_size(mut self, bytes: usize) -> Self {
        self.max_workspace_size = bytes;
        self
    }

    /// Enable the engine cache under `path`.
    pub fn with_engine_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.engine_cache_enable = true;
        self.engine_cache_path = Some(path.into());
        self
    }
}

/// Configuration for the CPU execution provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuProviderOptions {
    /// Intra-op worker threads; the backend default when unset.
    pub intra_op_num_threads: Option<u32>,
}

impl CpuProviderOptions {
    /// Create options with backend defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the intra-op thread count.
    pub fn with_intra_op_num_threads(mut self, num_threads: u32) -> Self {
        self.intra_op_num_threads = Some(num_threads);
        self
    }

    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::invalid_argument(format!("invalid CPU options: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensorrt_defaults() {
        let options = TensorRtProviderOptions::default();
        assert_eq!(options.device_id, 0);
        assert_eq!(options.max_workspace_size, 1 << 30);
        assert!(!options.fp16_enable);
        assert!(options.engine_cache_path.is_none());
    }

    #[test]
    fn test_tensorrt_from_partial_json() {
        let options =
            TensorRtProviderOptions::from_json(r#"{ "device_id": 1, "fp16_enable": true }"#)
                .unwrap();
        assert_eq!(options.device_id, 1);
        assert!(options.fp16_enable);
        assert_eq!(options.max_partition_iterations, 1000);
    }

    #[test]
    fn test_tensorrt_from_bad_json() {
        let err = TensorRtProviderOptions::from_json(r#"{ "device_id": "gpu0" }"#).unwrap_err();
        assert_eq!(err.code(), ronn_core::StatusCode::InvalidArgument);
    }

    #[test]
    fn test_tensorrt_builder() {
        let options = TensorRtProviderOptions::new()
            .with_device_id(2)
            .with_int8(true)
            .with_engine_cache("/tmp/trt");
        assert_eq!(options.device_id, 2);
        assert!(options.int8_enable);
        assert!(options.engine_cache_enable);
    }

    #[test]
    fn test_cpu_options() {
        assert_eq!(CpuProviderOptions::default().intra_op_num_threads, None);
        let options = CpuProviderOptions::from_json(r#"{ "intra_op_num_threads": 4 }"#).unwrap();
        assert_eq!(options, CpuProviderOptions::new().with_intra_op_num_threads(4));
    }
}
