//! Owning wrappers around native session objects.

use std::fmt;
use std::sync::Arc;

use crate::engine::Environment;
use crate::native::{NativeApi, NativeHandle};

/// Native session options, released on drop.
pub struct SessionOptions {
    handle: Option<NativeHandle>,
    api: Arc<dyn NativeApi>,
}

impl SessionOptions {
    /// Take ownership of a native options handle.
    pub fn from_handle(api: Arc<dyn NativeApi>, handle: NativeHandle) -> Self {
        Self {
            handle: Some(handle),
            api,
        }
    }

    /// Options that own no native object.
    pub fn empty(api: Arc<dyn NativeApi>) -> Self {
        Self { handle: None, api }
    }

    /// The native handle, if any.
    pub fn handle(&self) -> Option<NativeHandle> {
        self.handle
    }

    /// Whether these options own no native object.
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the native object now. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.api.release_session_options(handle);
        }
    }
}

impl Drop for SessionOptions {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Lifecycle state of a [`BackendSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet initialized.
    Constructed,
    /// Initialized and ready for a model.
    Initialized,
}

/// A native session, released on drop.
///
/// Holds the environment it was created in so the environment outlives it.
pub struct BackendSession {
    handle: Option<NativeHandle>,
    state: SessionState,
    environment: Option<Arc<Environment>>,
    api: Arc<dyn NativeApi>,
}

impl BackendSession {
    /// Take ownership of a native session handle created in `environment`.
    pub fn from_handle(
        api: Arc<dyn NativeApi>,
        environment: Arc<Environment>,
        handle: NativeHandle,
    ) -> Self {
        Self {
            handle: Some(handle),
            state: SessionState::Constructed,
            environment: Some(environment),
            api,
        }
    }

    /// A session that owns no native object.
    pub fn empty(api: Arc<dyn NativeApi>) -> Self {
        Self {
            handle: None,
            state: SessionState::Constructed,
            environment: None,
            api,
        }
    }

    /// The native handle, if any.
    pub fn handle(&self) -> Option<NativeHandle> {
        self.handle
    }

    /// Whether this session owns no native object.
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session is initialized and still owns its native object.
    pub fn is_usable(&self) -> bool {
        self.handle.is_some() && self.state == SessionState::Initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.state = SessionState::Initialized;
    }

    /// Release the native object now. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.api.release_session(handle);
        }
        self.environment = None;
    }
}

impl Drop for BackendSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for BackendSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSession")
            .field("handle", &self.handle)
            .field("state", &self.state)
            .finish()
    }
}
