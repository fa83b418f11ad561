//! Fundamental types shared across the RONN kernel runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known execution provider type names.
pub mod provider_types {
    /// Built-in CPU execution provider.
    pub const CPU: &str = "CPUExecutionProvider";
    /// CUDA execution provider.
    pub const CUDA: &str = "CUDAExecutionProvider";
    /// TensorRT execution provider.
    pub const TENSORRT: &str = "TensorrtExecutionProvider";
    /// DirectML execution provider.
    pub const DIRECTML: &str = "DmlExecutionProvider";
}

/// Default ONNX operator domain.
pub const ONNX_DOMAIN: &str = "";

/// Microsoft contrib operator domain.
pub const MS_DOMAIN: &str = "com.microsoft";

/// Element types a kernel type constraint can admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 32-bit float.
    F32,
    /// 16-bit float.
    F16,
    /// bfloat16.
    BF16,
    /// 64-bit float.
    F64,
    /// Signed 8-bit integer.
    I8,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Boolean.
    Bool,
}

impl DataType {
    /// Stable name used in kernel definition fingerprints.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::F32 => "float",
            Self::F16 => "float16",
            Self::BF16 => "bfloat16",
            Self::F64 => "double",
            Self::I8 => "int8",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graph optimization level requested from a backend session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum GraphOptimizationLevel {
    /// No graph rewrites.
    DisableAll,
    /// Semantics-preserving rewrites such as constant folding.
    Basic,
    /// Basic plus complex node fusions.
    Extended,
    /// Every available optimization, including layout changes.
    #[default]
    All,
}

/// Whether the CPU fallback provider should use an arena allocator.
///
/// Arenas are disabled on 32-bit targets where address space is scarce.
pub const fn default_cpu_arena_enabled() -> bool {
    cfg!(target_pointer_width = "64")
}
