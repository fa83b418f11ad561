//! The native backend surface session builders drive.
//!
//! A backend library is reached through [`NativeApi`], which speaks in
//! opaque handles and [`NativeStatus`] values. Nothing above the session
//! builders sees either: handles are wrapped in owning types and statuses
//! are translated by [`translate_status`] at the end of every phase.

use std::fmt;

use ronn_core::{CoreError, GraphOptimizationLevel, LogLevel, StatusCode};

use crate::options::TensorRtProviderOptions;

/// Opaque handle to a native object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Error codes a native backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeErrorCode {
    /// Unspecified failure.
    Fail,
    /// Bad argument.
    InvalidArgument,
    /// A referenced file does not exist.
    NoSuchFile,
    /// No model is loaded.
    NoModel,
    /// Internal engine error.
    EngineError,
    /// Unexpected runtime exception.
    RuntimeException,
    /// Model bytes could not be parsed.
    InvalidProtobuf,
    /// A model is already loaded.
    ModelLoaded,
    /// Feature not available in this build.
    NotImplemented,
    /// Graph failed validation.
    InvalidGraph,
    /// The execution provider failed.
    EpFail,
}

/// Status returned by a failing native call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeStatus {
    /// Native error code.
    pub code: NativeErrorCode,
    /// Native error message.
    pub message: String,
}

impl NativeStatus {
    /// Build a status.
    pub fn new(code: NativeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Result of a native call.
pub type NativeResult<T> = std::result::Result<T, NativeStatus>;

/// Severity threshold of the native environment logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeLoggingLevel {
    /// Verbose.
    Verbose,
    /// Informational.
    Info,
    /// Warnings.
    Warning,
    /// Errors.
    Error,
    /// Fatal only.
    Fatal,
}

impl From<LogLevel> for NativeLoggingLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace | LogLevel::Debug => Self::Verbose,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warning,
            LogLevel::Error => Self::Error,
        }
    }
}

/// Step of the session bootstrap a native call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// Creating the shared environment.
    CreateEnvironment,
    /// Configuring session options.
    CreateSessionOptions,
    /// Constructing the backend session.
    CreateSession,
    /// Finalizing the backend session.
    Initialize,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateEnvironment => "CreateEnvironment",
            Self::CreateSessionOptions => "CreateSessionOptions",
            Self::CreateSession => "CreateSession",
            Self::Initialize => "Initialize",
        };
        f.write_str(name)
    }
}

/// Map a native status onto the unified error.
pub fn translate_status(phase: BootstrapPhase, status: NativeStatus) -> CoreError {
    let code = match status.code {
        NativeErrorCode::InvalidArgument => StatusCode::InvalidArgument,
        NativeErrorCode::NotImplemented => StatusCode::NotImplemented,
        NativeErrorCode::EpFail => StatusCode::EpFail,
        _ => StatusCode::Fail,
    };
    CoreError::Native {
        phase: phase.to_string(),
        code,
        message: status.message,
    }
}

/// Entry points of a native inference backend.
///
/// Every `create_*` call that succeeds hands out a handle the caller must
/// pass to the matching `release_*` exactly once.
pub trait NativeApi: Send + Sync {
    /// Create a process environment.
    fn create_env(&self, logging_level: NativeLoggingLevel, log_id: &str) -> NativeResult<NativeHandle>;

    /// Release a process environment.
    fn release_env(&self, env: NativeHandle);

    /// Create an empty session options object.
    fn create_session_options(&self) -> NativeResult<NativeHandle>;

    /// Set the graph optimization level.
    fn set_session_graph_optimization_level(
        &self,
        options: NativeHandle,
        level: GraphOptimizationLevel,
    ) -> NativeResult<()>;

    /// Set the intra-op thread pool size.
    fn set_intra_op_num_threads(&self, options: NativeHandle, num_threads: u32) -> NativeResult<()>;

    /// Append the TensorRT execution provider.
    fn append_execution_provider_tensorrt(
        &self,
        options: NativeHandle,
        provider_options: &TensorRtProviderOptions,
    ) -> NativeResult<()>;

    /// Append the CPU execution provider.
    fn append_execution_provider_cpu(&self, options: NativeHandle, use_arena: bool) -> NativeResult<()>;

    /// Release a session options object.
    fn release_session_options(&self, options: NativeHandle);

    /// Create a session bound to `env` without loading a model.
    fn create_session_without_model(&self, env: NativeHandle, options: NativeHandle) -> NativeResult<NativeHandle>;

    /// Finalize a session so a model can be loaded into it.
    fn session_initialize(&self, session: NativeHandle) -> NativeResult<()>;

    /// Release a session.
    fn release_session(&self, session: NativeHandle);
}
