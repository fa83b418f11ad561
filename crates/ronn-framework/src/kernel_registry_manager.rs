//! Three-tier kernel resolution.
//!
//! The manager keeps three kinds of registries and always searches them in
//! the same order:
//! - **custom**: registered programmatically, most recent first
//! - **special**: one per provider type, overriding the provider's own kernels
//! - **stock**: one per provider type, taken from the session's providers
//!
//! Registration needs `&mut self` and happens while the session is set up.
//! Resolution needs only `&self`, so a populated manager can be shared across
//! execution threads without locking.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use rayon::prelude::*;
use ronn_core::{CoreError, Node, Result};
use tracing::{debug, info, trace};

use crate::execution_provider::ExecutionProvider;
use crate::kernel_registry::KernelRegistry;
use crate::op_kernel::{KernelCreateInfo, OpKernel, OpKernelInfo};
use crate::session_state::SessionState;

/// Owns references to every kernel registry a session can resolve against.
#[derive(Debug, Default)]
pub struct KernelRegistryManager {
    custom_kernel_registries: VecDeque<Arc<KernelRegistry>>,
    special_provider_registries: BTreeMap<String, Arc<KernelRegistry>>,
    stock_provider_registries: BTreeMap<String, Arc<KernelRegistry>>,
}

impl KernelRegistryManager {
    /// Create a manager with no registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the stock registry of every provider, in list order.
    ///
    /// Providers without a registry are skipped. A provider type that is
    /// already present fails the call; registries inserted before the
    /// failure stay in place.
    pub fn register_kernels<'a, I>(&mut self, providers: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Arc<dyn ExecutionProvider>>,
    {
        for provider in providers {
            let provider_type = provider.provider_type();
            if self.stock_provider_registries.contains_key(provider_type) {
                return Err(CoreError::DuplicateProvider {
                    provider_type: provider_type.to_string(),
                });
            }

            let Some(registry) = provider.kernel_registry() else {
                debug!("Provider {provider_type} ships no kernel registry");
                continue;
            };

            info!(
                "Registered stock kernel registry for {provider_type} with {} kernels",
                registry.len()
            );
            self.stock_provider_registries
                .insert(provider_type.to_string(), registry);
        }
        Ok(())
    }

    /// Install a registry that overrides the stock kernels of `provider_type`.
    pub fn register_special_kernel_registry(
        &mut self,
        provider_type: &str,
        registry: Arc<KernelRegistry>,
    ) -> Result<()> {
        if registry.is_empty() {
            return Err(CoreError::EmptyKernelRegistry {
                provider_type: provider_type.to_string(),
            });
        }
        if self.special_provider_registries.contains_key(provider_type) {
            return Err(CoreError::DuplicateSpecialRegistry {
                provider_type: provider_type.to_string(),
            });
        }

        info!(
            "Registered special kernel registry for {provider_type} with {} kernels",
            registry.len()
        );
        self.special_provider_registries
            .insert(provider_type.to_string(), registry);
        Ok(())
    }

    /// Add a custom registry ahead of all previously added ones.
    ///
    /// Empty registries are ignored. The same registry may be added twice.
    pub fn register_kernel_registry(&mut self, registry: Arc<KernelRegistry>) {
        if registry.is_empty() {
            return;
        }
        info!("Registered custom kernel registry with {} kernels", registry.len());
        self.custom_kernel_registries.push_front(registry);
    }

    /// Resolve the kernel for `node` on its assigned provider.
    pub fn search_kernel_registry(&self, node: &Node) -> Result<&KernelCreateInfo> {
        let provider_type = node.execution_provider_type();
        if provider_type.is_empty() {
            return Err(CoreError::UnassignedProvider {
                node: node.describe(),
            });
        }

        let mut last_error = None;
        let tiers = self
            .custom_kernel_registries
            .iter()
            .chain(self.special_provider_registries.get(provider_type))
            .chain(self.stock_provider_registries.get(provider_type));

        for registry in tiers {
            match registry.try_find_kernel(node, provider_type) {
                Ok(create_info) => {
                    trace!("Resolved {} to {}", node.describe(), create_info.kernel_def());
                    return Ok(create_info);
                }
                Err(e) => last_error = Some(e),
            }
        }

        let detail = match last_error {
            Some(CoreError::KernelNotFound { detail, .. }) => detail,
            Some(other) => other.to_string(),
            None => format!("no kernel registry is available for {provider_type}"),
        };
        debug!("No kernel for {} on {provider_type}: {detail}", node.describe());
        Err(CoreError::KernelNotFound {
            node: node.describe(),
            detail,
        })
    }

    /// Resolve every node, in parallel.
    ///
    /// Results keep the order of `nodes`; the first failing node in that
    /// order determines the error.
    pub fn search_kernel_registries<'a>(&'a self, nodes: &[Node]) -> Result<Vec<&'a KernelCreateInfo>> {
        nodes
            .par_iter()
            .map(|node| self.search_kernel_registry(node))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Resolve a kernel by definition fingerprint.
    ///
    /// Used where nodes cannot be inspected; a miss is expected and reported
    /// as `None`. Special and stock registries are searched in provider-name
    /// order.
    pub fn search_kernel_registries_by_hash(&self, kernel_def_hash: u64) -> Option<&KernelCreateInfo> {
        self.custom_kernel_registries
            .iter()
            .chain(self.special_provider_registries.values())
            .chain(self.stock_provider_registries.values())
            .find_map(|registry| registry.try_find_kernel_by_hash(kernel_def_hash))
    }

    /// Registries that could serve `provider_type`, in search order.
    pub fn kernel_registries_by_provider_type(&self, provider_type: &str) -> Vec<&KernelRegistry> {
        self.custom_kernel_registries
            .iter()
            .chain(self.special_provider_registries.get(provider_type))
            .chain(self.stock_provider_registries.get(provider_type))
            .map(Arc::as_ref)
            .collect()
    }

    /// Whether any registry can serve `node` on `provider_type`.
    ///
    /// Partitioning uses this before a provider has been assigned.
    pub fn has_implementation_of(&self, node: &Node, provider_type: &str) -> bool {
        self.kernel_registries_by_provider_type(provider_type)
            .into_iter()
            .any(|registry| registry.has_implementation_of(node, provider_type))
    }

    /// Instantiate the kernel `create_info` for `node`.
    ///
    /// Factory errors are returned unchanged. The kernel is owned by the
    /// caller.
    pub fn create_kernel(
        &self,
        node: &Node,
        execution_provider: &dyn ExecutionProvider,
        session_state: &dyn SessionState,
        create_info: &KernelCreateInfo,
    ) -> Result<Box<dyn OpKernel>> {
        let info = OpKernelInfo::new(
            node,
            create_info.shared_kernel_def(),
            execution_provider,
            session_state,
        );
        create_info.create(&info)
    }

    /// Number of custom registries.
    pub fn custom_registry_count(&self) -> usize {
        self.custom_kernel_registries.len()
    }

    /// Whether a special registry exists for `provider_type`.
    pub fn has_special_registry(&self, provider_type: &str) -> bool {
        self.special_provider_registries.contains_key(provider_type)
    }

    /// Whether a stock registry exists for `provider_type`.
    pub fn has_stock_registry(&self, provider_type: &str) -> bool {
        self.stock_provider_registries.contains_key(provider_type)
    }
}
