//! RONN Core
//!
//! Foundational pieces shared by the kernel framework and the execution
//! provider crates:
//! - **Error**: the unified [`CoreError`] every layer reports
//! - **Types**: provider type names, element types, optimization levels
//! - **Graph**: the [`Node`] view kernel resolution consumes
//! - **Logging**: `tracing` subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use ronn_core::{Node, provider_types};
//!
//! let node = Node::new("Conv", 11)
//!     .with_name("conv_1")
//!     .with_execution_provider(provider_types::CPU);
//! assert_eq!(node.describe().to_string(), "Conv(11) (node conv_1)");
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod logging;
pub mod types;

pub use error::{CoreError, NodeDescription, Result, StatusCode};
pub use graph::{Node, NodeIndex};
pub use logging::{LogLevel, LoggingConfig, init_logging, try_init_logging};
pub use types::{
    DataType, GraphOptimizationLevel, MS_DOMAIN, ONNX_DOMAIN, default_cpu_arena_enabled,
    provider_types,
};
