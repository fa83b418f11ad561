//! The three-phase protocol every execution provider uses to build a session.
//!
//! A session is bootstrapped in order:
//!
//! 1. [`create_session_options`](ExecutionProviderSessionBuilder::create_session_options)
//!    configures options for the provider.
//! 2. [`create_session`](ExecutionProviderSessionBuilder::create_session)
//!    constructs a session in the shared environment.
//! 3. [`initialize`](ExecutionProviderSessionBuilder::initialize)
//!    finalizes it for use.
//!
//! Only the first phase differs between providers. Each phase translates
//! native failures through [`translate_status`] and releases whatever it
//! created before failing.

use ronn_core::{CoreError, GraphOptimizationLevel, Result};
use tracing::{debug, info, info_span};

use crate::engine::EngineFactory;
use crate::native::{BootstrapPhase, NativeHandle, translate_status};
use crate::session::{BackendSession, SessionOptions};

/// Builds native sessions for one execution provider.
pub trait ExecutionProviderSessionBuilder: Send + Sync {
    /// Provider type this builder configures.
    fn provider_type(&self) -> &str;

    /// The factory sessions are created through.
    fn engine_factory(&self) -> &EngineFactory;

    /// Configure session options for this provider.
    fn create_session_options(&self) -> Result<SessionOptions>;

    /// Construct a session from configured options.
    fn create_session(&self, options: &SessionOptions) -> Result<BackendSession> {
        let options_handle = options
            .handle()
            .ok_or_else(|| CoreError::invalid_argument("session options are empty"))?;

        let factory = self.engine_factory();
        let environment = factory.environment()?;
        let api = factory.api();
        let handle = api
            .create_session_without_model(environment.handle(), options_handle)
            .map_err(|status| translate_status(BootstrapPhase::CreateSession, status))?;

        debug!(provider = self.provider_type(), "Created session {:?}", handle);
        Ok(BackendSession::from_handle(api.clone(), environment, handle))
    }

    /// Finalize a constructed session.
    fn initialize(&self, session: &mut BackendSession) -> Result<()> {
        let handle = session
            .handle()
            .ok_or_else(|| CoreError::invalid_argument("session is empty"))?;

        self.engine_factory()
            .api()
            .session_initialize(handle)
            .map_err(|status| translate_status(BootstrapPhase::Initialize, status))?;

        session.mark_initialized();
        Ok(())
    }
}

/// Create options with full graph optimization, the common first step of
/// every builder's options phase. Returns the options with their handle.
pub(crate) fn optimized_session_options(
    factory: &EngineFactory,
) -> Result<(SessionOptions, NativeHandle)> {
    let api = factory.api();
    let handle = api
        .create_session_options()
        .map_err(|status| translate_status(BootstrapPhase::CreateSessionOptions, status))?;
    let options = SessionOptions::from_handle(api.clone(), handle);

    api.set_session_graph_optimization_level(handle, GraphOptimizationLevel::All)
        .map_err(|status| translate_status(BootstrapPhase::CreateSessionOptions, status))?;
    Ok((options, handle))
}

/// Run all three phases and return a usable session.
pub fn bootstrap(builder: &dyn ExecutionProviderSessionBuilder) -> Result<BackendSession> {
    let provider = builder.provider_type();

    let options = {
        let _span = info_span!("create_session_options", provider).entered();
        builder.create_session_options()?
    };

    let mut session = {
        let _span = info_span!("create_session", provider).entered();
        builder.create_session(&options)?
    };
    // The session holds its own copy of the configuration.
    drop(options);

    {
        let _span = info_span!("initialize", provider).entered();
        builder.initialize(&mut session)?;
    }

    info!(provider, "Session ready");
    Ok(session)
}
