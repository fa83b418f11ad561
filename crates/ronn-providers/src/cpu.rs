//! CPU-only session builder.

use std::sync::Arc;

use ronn_core::{Result, default_cpu_arena_enabled, provider_types};

use crate::engine::EngineFactory;
use crate::native::{BootstrapPhase, translate_status};
use crate::options::CpuProviderOptions;
use crate::session::SessionOptions;
use crate::session_builder::{ExecutionProviderSessionBuilder, optimized_session_options};

/// Builds sessions that run on the CPU provider alone.
#[derive(Debug)]
pub struct CpuSessionBuilder {
    factory: Arc<EngineFactory>,
    options: CpuProviderOptions,
}

impl CpuSessionBuilder {
    /// Create a builder with default CPU options.
    pub fn new(factory: Arc<EngineFactory>) -> Self {
        Self::with_options(factory, CpuProviderOptions::default())
    }

    /// Create a builder with the given CPU options.
    pub fn with_options(factory: Arc<EngineFactory>, options: CpuProviderOptions) -> Self {
        Self { factory, options }
    }
}

impl ExecutionProviderSessionBuilder for CpuSessionBuilder {
    fn provider_type(&self) -> &str {
        provider_types::CPU
    }

    fn engine_factory(&self) -> &EngineFactory {
        &self.factory
    }

    fn create_session_options(&self) -> Result<SessionOptions> {
        let (options, handle) = optimized_session_options(&self.factory)?;
        let api = self.factory.api();
        let native = |status| translate_status(BootstrapPhase::CreateSessionOptions, status);

        if let Some(threads) = self.options.intra_op_num_threads {
            api.set_intra_op_num_threads(handle, threads).map_err(native)?;
        }
        api.append_execution_provider_cpu(handle, default_cpu_arena_enabled())
            .map_err(native)?;

        Ok(options)
    }
}
