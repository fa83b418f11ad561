//! RONN Execution Provider Session Builders
//!
//! This crate bootstraps native inference sessions for execution providers:
//! - **Native surface**: the backend API, its handles and status translation
//! - **Engine factory**: the lazily created, process-wide environment
//! - **Session builders**: TensorRT with CPU fallback, and CPU alone
//! - **Bootstrap**: the options → session → initialize sequence
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ronn_providers::{
//!     EngineFactory, NativeApi, TensorRtProviderOptions, TensorRtSessionBuilder, bootstrap,
//! };
//!
//! fn start(api: Arc<dyn NativeApi>) -> ronn_core::Result<()> {
//!     let factory = Arc::new(EngineFactory::new(api));
//!     let options = TensorRtProviderOptions::new().with_fp16(true);
//!     let builder = TensorRtSessionBuilder::with_options(factory, options);
//!
//!     let session = bootstrap(&builder)?;
//!     assert!(session.is_usable());
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod cpu;
pub mod engine;
pub mod native;
pub mod options;
pub mod session;
pub mod session_builder;
pub mod tensorrt;

pub use cpu::CpuSessionBuilder;
pub use engine::{EngineConfig, EngineFactory, Environment};
pub use native::{
    BootstrapPhase, NativeApi, NativeErrorCode, NativeHandle, NativeLoggingLevel, NativeResult,
    NativeStatus, translate_status,
};
pub use options::{CpuProviderOptions, TensorRtProviderOptions};
pub use session::{BackendSession, SessionOptions, SessionState};
pub use session_builder::{ExecutionProviderSessionBuilder, bootstrap};
pub use tensorrt::TensorRtSessionBuilder;
