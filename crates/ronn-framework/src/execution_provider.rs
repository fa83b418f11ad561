//! Execution provider abstraction as seen by kernel resolution.

use std::fmt;
use std::sync::Arc;

use ronn_core::{CoreError, Result};
use tracing::debug;

use crate::data_transfer::Device;
use crate::kernel_registry::KernelRegistry;

/// A hardware or software backend able to execute a subset of nodes.
pub trait ExecutionProvider: Send + Sync {
    /// Provider type name, e.g. `CPUExecutionProvider`.
    fn provider_type(&self) -> &str;

    /// Kernels this provider ships, if it has any.
    fn kernel_registry(&self) -> Option<Arc<KernelRegistry>>;

    /// Device the provider allocates on.
    fn device(&self) -> Device {
        Device::CPU
    }
}

impl fmt::Debug for dyn ExecutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionProvider")
            .field("type", &self.provider_type())
            .field("device", &self.device())
            .finish()
    }
}

/// Execution providers of a session, in priority order.
#[derive(Default, Clone)]
pub struct ExecutionProviders {
    providers: Vec<Arc<dyn ExecutionProvider>>,
}

impl fmt::Debug for ExecutionProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.providers.iter().map(|p| p.provider_type())).finish()
    }
}

impl ExecutionProviders {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; its type must not already be present.
    pub fn add(&mut self, provider: Arc<dyn ExecutionProvider>) -> Result<()> {
        if self.get(provider.provider_type()).is_some() {
            return Err(CoreError::DuplicateExecutionProvider {
                provider_type: provider.provider_type().to_string(),
            });
        }
        debug!("Added execution provider {}", provider.provider_type());
        self.providers.push(provider);
        Ok(())
    }

    /// Provider with the given type.
    pub fn get(&self, provider_type: &str) -> Option<&Arc<dyn ExecutionProvider>> {
        self.providers.iter().find(|p| p.provider_type() == provider_type)
    }

    /// Provider types in priority order.
    pub fn provider_types(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_type()).collect()
    }

    /// Iterate in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn ExecutionProvider>> {
        self.providers.iter()
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExecutionProviders {
    type Item = &'a Arc<dyn ExecutionProvider>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn ExecutionProvider>>;

    fn into_iter(self) -> Self::IntoIter {
        self.providers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare(&'static str);

    impl ExecutionProvider for Bare {
        fn provider_type(&self) -> &str {
            self.0
        }

        fn kernel_registry(&self) -> Option<Arc<KernelRegistry>> {
            None
        }
    }

    #[test]
    fn test_add_preserves_order() {
        let mut providers = ExecutionProviders::new();
        providers.add(Arc::new(Bare("TRT"))).unwrap();
        providers.add(Arc::new(Bare("CPU"))).unwrap();
        assert_eq!(providers.provider_types(), vec!["TRT", "CPU"]);
        assert_eq!(providers.get("CPU").unwrap().device(), Device::CPU);
    }

    #[test]
    fn test_add_rejects_duplicate_type() {
        let mut providers = ExecutionProviders::new();
        providers.add(Arc::new(Bare("CPU"))).unwrap();
        let err = providers.add(Arc::new(Bare("CPU"))).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateExecutionProvider { .. }));
        assert_eq!(
            err.to_string(),
            "execution provider CPU is already in the provider list"
        );
        assert_eq!(providers.len(), 1);
    }
}
