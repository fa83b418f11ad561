//! Shared fixtures for kernel framework integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use ronn_core::{CoreError, Node, Result};
use ronn_framework::{
    ExecutionProvider, KernelCreateInfo, KernelDef, KernelMetadata, KernelRegistry, OpKernel,
    OpKernelContext,
};

/// Execution provider with a fixed type and optional stock registry.
pub struct TestProvider {
    pub provider_type: String,
    pub registry: Option<Arc<KernelRegistry>>,
}

impl ExecutionProvider for TestProvider {
    fn provider_type(&self) -> &str {
        &self.provider_type
    }

    fn kernel_registry(&self) -> Option<Arc<KernelRegistry>> {
        self.registry.clone()
    }
}

pub fn provider(provider_type: &str, registry: Option<Arc<KernelRegistry>>) -> Arc<dyn ExecutionProvider> {
    Arc::new(TestProvider {
        provider_type: provider_type.to_string(),
        registry,
    })
}

/// Kernel that writes its origin tag to output 0.
pub struct TaggedKernel {
    pub metadata: KernelMetadata,
    pub origin: String,
}

impl OpKernel for TaggedKernel {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn compute(&self, context: &mut OpKernelContext) -> Result<()> {
        context.set_output(0, self.origin.clone())
    }
}

/// A kernel definition for `op_type` on `provider_type`, open from version 1.
pub fn tagged_kernel(op_type: &str, provider_type: &str, origin: &str) -> KernelCreateInfo {
    let def = KernelDef::builder(op_type)
        .since_version(1)
        .provider(provider_type)
        .build();
    let origin = origin.to_string();
    KernelCreateInfo::new(def, move |info| {
        Ok(Box::new(TaggedKernel {
            metadata: info.metadata(),
            origin: origin.clone(),
        }))
    })
}

/// Registry holding one tagged kernel per listed op type.
pub fn tagged_registry(op_types: &[&str], provider_type: &str, origin: &str) -> Arc<KernelRegistry> {
    let kernels = op_types
        .iter()
        .map(|op_type| tagged_kernel(op_type, provider_type, origin));
    Arc::new(KernelRegistry::with_kernels(kernels).expect("fixture registry is consistent"))
}

/// Registry whose kernel factory always fails.
pub fn failing_registry(op_type: &str, provider_type: &str) -> Arc<KernelRegistry> {
    let def = KernelDef::builder(op_type)
        .since_version(1)
        .provider(provider_type)
        .build();
    let create_info = KernelCreateInfo::new(def, |info| {
        Err(CoreError::KernelCreation {
            node: info.node().describe(),
            message: "attribute 'group' must be positive".to_string(),
        })
    });
    Arc::new(KernelRegistry::with_kernels([create_info]).expect("fixture registry is consistent"))
}

pub fn assigned(op_type: &str, version: i32, provider_type: &str) -> Node {
    Node::new(op_type, version)
        .with_name(format!("{}_node", op_type.to_lowercase()))
        .with_execution_provider(provider_type)
}
