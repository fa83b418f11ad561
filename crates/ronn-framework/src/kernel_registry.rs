//! A catalog of kernels for one or more execution providers.
//!
//! Entries are keyed by operator, domain and provider, and additionally
//! indexed by definition fingerprint for builds that cannot inspect nodes.
//! A registry is mutable while it is being filled and shared read-only
//! behind an `Arc` afterwards.

use std::collections::HashMap;

use ronn_core::{CoreError, Node, Result};
use tracing::trace;

use crate::kernel_def::{KernelDef, OPEN_VERSION};
use crate::op_kernel::KernelCreateInfo;

/// Collection of [`KernelCreateInfo`] entries.
#[derive(Debug, Default)]
pub struct KernelRegistry {
    entries: Vec<KernelCreateInfo>,
    by_key: HashMap<String, Vec<usize>>,
    by_hash: HashMap<u64, usize>,
}

fn registry_key(op_type: &str, domain: &str, provider_type: &str) -> String {
    format!("{op_type} {domain} {provider_type}")
}

impl KernelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of kernels, stopping at the first rejection.
    pub fn with_kernels(kernels: impl IntoIterator<Item = KernelCreateInfo>) -> Result<Self> {
        let mut registry = Self::new();
        for create_info in kernels {
            registry.register(create_info)?;
        }
        Ok(registry)
    }

    /// Add a kernel.
    ///
    /// Fails when the definition could match a node that an existing entry
    /// also matches, or when its fingerprint is already indexed.
    pub fn register(&mut self, create_info: KernelCreateInfo) -> Result<()> {
        let def = create_info.kernel_def();
        let key = registry_key(def.op_type(), def.domain(), def.provider_type());

        if let Some(indices) = self.by_key.get(&key) {
            if let Some(existing) = indices
                .iter()
                .map(|&i| self.entries[i].kernel_def())
                .find(|existing| existing.is_conflict_with(def))
            {
                return Err(CoreError::KernelConflict(format!("{def} overlaps {existing}")));
            }
        }

        if let Some(&index) = self.by_hash.get(&def.hash()) {
            return Err(CoreError::DuplicateKernelHash {
                hash: def.hash(),
                op_type: self.entries[index].kernel_def().op_type().to_string(),
            });
        }

        trace!("Registered kernel {def}");
        let index = self.entries.len();
        self.by_hash.insert(def.hash(), index);
        self.by_key.entry(key).or_default().push(index);
        self.entries.push(create_info);
        Ok(())
    }

    /// Find the kernel serving `node` on `provider_type`.
    ///
    /// The error explains why nothing matched: either no kernel exists for
    /// the operator on that provider, or every candidate's version range
    /// excludes the node.
    pub fn try_find_kernel(&self, node: &Node, provider_type: &str) -> Result<&KernelCreateInfo> {
        let key = registry_key(node.op_type(), node.domain(), provider_type);
        let Some(indices) = self.by_key.get(&key) else {
            return Err(CoreError::KernelNotFound {
                node: node.describe(),
                detail: format!(
                    "no kernel registered for op {} in domain '{}' on {provider_type}",
                    node.op_type(),
                    node.domain()
                ),
            });
        };

        let mut mismatches = Vec::with_capacity(indices.len());
        for &index in indices {
            let create_info = &self.entries[index];
            let def = create_info.kernel_def();
            if def.supports_version(node.since_version()) {
                return Ok(create_info);
            }
            mismatches.push(version_mismatch(def, node.since_version()));
        }

        Err(CoreError::KernelNotFound {
            node: node.describe(),
            detail: mismatches.join("; "),
        })
    }

    /// Find a kernel by definition fingerprint.
    pub fn try_find_kernel_by_hash(&self, kernel_def_hash: u64) -> Option<&KernelCreateInfo> {
        self.by_hash
            .get(&kernel_def_hash)
            .map(|&index| &self.entries[index])
    }

    /// Whether some kernel can serve `node` on `provider_type`.
    pub fn has_implementation_of(&self, node: &Node, provider_type: &str) -> bool {
        self.try_find_kernel(node, provider_type).is_ok()
    }

    /// Iterate over all entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &KernelCreateInfo> {
        self.entries.iter()
    }

    /// Number of kernels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no kernels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn version_mismatch(def: &KernelDef, node_version: i32) -> String {
    let (start, end) = def.since_version();
    if end == OPEN_VERSION {
        format!("version mismatch: node version {node_version}, kernel start version {start}")
    } else {
        format!(
            "version mismatch: node version {node_version}, kernel versions [{start}, {end}]"
        )
    }
}
