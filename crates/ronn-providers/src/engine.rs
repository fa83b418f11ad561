//! Process-wide engine state shared by all session builders.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use ronn_core::{LogLevel, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::native::{BootstrapPhase, NativeApi, NativeHandle, NativeLoggingLevel, translate_status};

/// Configuration for the shared native environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identifier the native logger tags messages with.
    pub log_id: String,
    /// Native logger severity threshold.
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_id: "ronn".to_string(),
            log_level: LogLevel::Warn,
        }
    }
}

impl EngineConfig {
    /// Set the logger identifier.
    pub fn with_log_id(mut self, log_id: impl Into<String>) -> Self {
        self.log_id = log_id.into();
        self
    }

    /// Set the native logger threshold.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

/// A native environment, released when the last owner drops it.
pub struct Environment {
    handle: NativeHandle,
    api: Arc<dyn NativeApi>,
}

impl Environment {
    /// Native handle of this environment.
    pub fn handle(&self) -> NativeHandle {
        self.handle
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("handle", &self.handle)
            .finish()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        debug!("Releasing native environment {:?}", self.handle);
        self.api.release_env(self.handle);
    }
}

/// Entry point to a native backend.
///
/// Owns the backend API and lazily creates the environment every session
/// built through this factory is bound to. The environment is created at
/// most once, even under concurrent first use.
pub struct EngineFactory {
    api: Arc<dyn NativeApi>,
    config: EngineConfig,
    environment: OnceCell<Arc<Environment>>,
}

impl EngineFactory {
    /// Create a factory with default configuration.
    pub fn new(api: Arc<dyn NativeApi>) -> Self {
        Self::with_config(api, EngineConfig::default())
    }

    /// Create a factory with the given configuration.
    pub fn with_config(api: Arc<dyn NativeApi>, config: EngineConfig) -> Self {
        Self {
            api,
            config,
            environment: OnceCell::new(),
        }
    }

    /// The backend API.
    pub fn api(&self) -> &Arc<dyn NativeApi> {
        &self.api
    }

    /// The factory configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the shared environment, creating it on first use.
    pub fn environment(&self) -> Result<Arc<Environment>> {
        let environment = self.environment.get_or_try_init(|| {
            let handle = self
                .api
                .create_env(
                    NativeLoggingLevel::from(self.config.log_level),
                    &self.config.log_id,
                )
                .map_err(|status| translate_status(BootstrapPhase::CreateEnvironment, status))?;
            info!(log_id = %self.config.log_id, "Created native environment");
            Ok::<_, ronn_core::CoreError>(Arc::new(Environment {
                handle,
                api: Arc::clone(&self.api),
            }))
        })?;
        Ok(Arc::clone(environment))
    }

    /// Whether the shared environment has been created.
    pub fn has_environment(&self) -> bool {
        self.environment.get().is_some()
    }
}

impl std::fmt::Debug for EngineFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineFactory")
            .field("config", &self.config)
            .field("environment", &self.environment.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.log_id, "ronn");
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::default()
            .with_log_id("bench")
            .with_log_level(LogLevel::Debug);
        assert_eq!(config.log_id, "bench");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_engine_config_from_json() {
        let config: EngineConfig = serde_json::from_str(r#"{ "log_level": "info" }"#).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_id, "ronn");
    }
}
