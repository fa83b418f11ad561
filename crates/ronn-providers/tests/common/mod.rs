//! Shared fixtures for session builder tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use ronn_core::GraphOptimizationLevel;
use ronn_providers::{
    EngineFactory, NativeApi, NativeErrorCode, NativeHandle, NativeLoggingLevel, NativeResult,
    NativeStatus, TensorRtProviderOptions,
};

/// A native call as observed by [`MockNativeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateEnv(NativeLoggingLevel, String),
    ReleaseEnv(NativeHandle),
    CreateSessionOptions(NativeHandle),
    SetOptimizationLevel(NativeHandle, GraphOptimizationLevel),
    SetIntraOpThreads(NativeHandle, u32),
    AppendTensorRt(NativeHandle, TensorRtProviderOptions),
    AppendCpu(NativeHandle, bool),
    ReleaseSessionOptions(NativeHandle),
    CreateSession(NativeHandle, NativeHandle),
    Initialize(NativeHandle),
    ReleaseSession(NativeHandle),
}

impl Call {
    /// Name used to select a call for failure injection.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateEnv(..) => "create_env",
            Self::ReleaseEnv(..) => "release_env",
            Self::CreateSessionOptions(..) => "create_session_options",
            Self::SetOptimizationLevel(..) => "set_session_graph_optimization_level",
            Self::SetIntraOpThreads(..) => "set_intra_op_num_threads",
            Self::AppendTensorRt(..) => "append_execution_provider_tensorrt",
            Self::AppendCpu(..) => "append_execution_provider_cpu",
            Self::ReleaseSessionOptions(..) => "release_session_options",
            Self::CreateSession(..) => "create_session_without_model",
            Self::Initialize(..) => "session_initialize",
            Self::ReleaseSession(..) => "release_session",
        }
    }
}

/// In-memory backend that records every call and tracks live handles.
#[derive(Default)]
pub struct MockNativeApi {
    next_handle: AtomicU64,
    calls: Mutex<Vec<Call>>,
    live: Mutex<HashSet<NativeHandle>>,
    failure: Mutex<Option<(&'static str, NativeErrorCode, String)>>,
}

impl MockNativeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call named `name` fail with `code`.
    pub fn fail_on(&self, name: &'static str, code: NativeErrorCode, message: &str) {
        *self.failure.lock().unwrap() = Some((name, code, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| call.name() == name).count()
    }

    /// Handles created and not yet released.
    pub fn live_handles(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    fn record(&self, call: Call) -> NativeResult<()> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        match &*self.failure.lock().unwrap() {
            Some((failing, code, message)) if *failing == name => {
                Err(NativeStatus::new(*code, message.clone()))
            }
            _ => Ok(()),
        }
    }

    fn free(&self, handle: NativeHandle) {
        assert!(
            self.live.lock().unwrap().remove(&handle),
            "handle {handle:?} released twice or never created"
        );
    }

    fn create(&self, call: impl FnOnce(NativeHandle) -> Call) -> NativeResult<NativeHandle> {
        let handle = NativeHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
        self.record(call(handle))?;
        self.live.lock().unwrap().insert(handle);
        Ok(handle)
    }
}

impl NativeApi for MockNativeApi {
    fn create_env(&self, logging_level: NativeLoggingLevel, log_id: &str) -> NativeResult<NativeHandle> {
        self.create(|_| Call::CreateEnv(logging_level, log_id.to_string()))
    }

    fn release_env(&self, env: NativeHandle) {
        let _ = self.record(Call::ReleaseEnv(env));
        self.free(env);
    }

    fn create_session_options(&self) -> NativeResult<NativeHandle> {
        self.create(Call::CreateSessionOptions)
    }

    fn set_session_graph_optimization_level(
        &self,
        options: NativeHandle,
        level: GraphOptimizationLevel,
    ) -> NativeResult<()> {
        self.record(Call::SetOptimizationLevel(options, level))
    }

    fn set_intra_op_num_threads(&self, options: NativeHandle, num_threads: u32) -> NativeResult<()> {
        self.record(Call::SetIntraOpThreads(options, num_threads))
    }

    fn append_execution_provider_tensorrt(
        &self,
        options: NativeHandle,
        provider_options: &TensorRtProviderOptions,
    ) -> NativeResult<()> {
        self.record(Call::AppendTensorRt(options, provider_options.clone()))
    }

    fn append_execution_provider_cpu(&self, options: NativeHandle, use_arena: bool) -> NativeResult<()> {
        self.record(Call::AppendCpu(options, use_arena))
    }

    fn release_session_options(&self, options: NativeHandle) {
        let _ = self.record(Call::ReleaseSessionOptions(options));
        self.free(options);
    }

    fn create_session_without_model(&self, env: NativeHandle, options: NativeHandle) -> NativeResult<NativeHandle> {
        self.create(|_| Call::CreateSession(env, options))
    }

    fn session_initialize(&self, session: NativeHandle) -> NativeResult<()> {
        self.record(Call::Initialize(session))
    }

    fn release_session(&self, session: NativeHandle) {
        let _ = self.record(Call::ReleaseSession(session));
        self.free(session);
    }
}

/// A factory over a fresh mock backend.
pub fn factory() -> (Arc<MockNativeApi>, Arc<EngineFactory>) {
    let api = MockNativeApi::new();
    let factory = Arc::new(EngineFactory::new(api.clone()));
    (api, factory)
}
