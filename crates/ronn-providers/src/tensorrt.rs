//! TensorRT session builder.

use std::sync::Arc;

use ronn_core::{Result, default_cpu_arena_enabled, provider_types};

use crate::engine::EngineFactory;
use crate::native::{BootstrapPhase, translate_status};
use crate::options::TensorRtProviderOptions;
use crate::session::SessionOptions;
use crate::session_builder::{ExecutionProviderSessionBuilder, optimized_session_options};

/// Builds sessions that run on TensorRT with the CPU provider as fallback.
#[derive(Debug)]
pub struct TensorRtSessionBuilder {
    factory: Arc<EngineFactory>,
    options: TensorRtProviderOptions,
}

impl TensorRtSessionBuilder {
    /// Create a builder with default TensorRT options.
    pub fn new(factory: Arc<EngineFactory>) -> Self {
        Self::with_options(factory, TensorRtProviderOptions::default())
    }

    /// Create a builder with the given TensorRT options.
    pub fn with_options(factory: Arc<EngineFactory>, options: TensorRtProviderOptions) -> Self {
        Self { factory, options }
    }

    /// TensorRT options appended to every session.
    pub fn options(&self) -> &TensorRtProviderOptions {
        &self.options
    }
}

impl ExecutionProviderSessionBuilder for TensorRtSessionBuilder {
    fn provider_type(&self) -> &str {
        provider_types::TENSORRT
    }

    fn engine_factory(&self) -> &EngineFactory {
        &self.factory
    }

    fn create_session_options(&self) -> Result<SessionOptions> {
        let (options, handle) = optimized_session_options(&self.factory)?;
        let api = self.factory.api();
        let native = |status| translate_status(BootstrapPhase::CreateSessionOptions, status);

        api.append_execution_provider_tensorrt(handle, &self.options)
            .map_err(native)?;
        api.append_execution_provider_cpu(handle, default_cpu_arena_enabled())
            .map_err(native)?;

        Ok(options)
    }
}
