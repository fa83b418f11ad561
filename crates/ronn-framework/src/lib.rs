//! RONN Kernel Framework
//!
//! Kernel resolution and instantiation for nodes that partitioning has
//! already placed on an execution provider:
//! - **Kernel definitions**: what a kernel can serve, with a stable fingerprint
//! - **Kernel registries**: catalogs of definitions and factories
//! - **Kernel registry manager**: the custom > special > stock override chain
//! - **Op kernels**: the factory contract and the construction context
//! - **Session services**: constants, value names, fused functions, data transfer
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ronn_core::Node;
//! use ronn_framework::{
//!     KernelCreateInfo, KernelDef, KernelMetadata, KernelRegistry, KernelRegistryManager,
//!     OpKernel, OpKernelContext,
//! };
//!
//! struct Relu(KernelMetadata);
//!
//! impl OpKernel for Relu {
//!     fn metadata(&self) -> &KernelMetadata {
//!         &self.0
//!     }
//!
//!     fn compute(&self, _context: &mut OpKernelContext) -> ronn_core::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let def = KernelDef::builder("Relu").since_version(14).provider("MyEP").build();
//! let registry = KernelRegistry::with_kernels([KernelCreateInfo::new(def, |info| {
//!     Ok(Box::new(Relu(info.metadata())))
//! })])?;
//!
//! let mut manager = KernelRegistryManager::new();
//! manager.register_kernel_registry(Arc::new(registry));
//!
//! let node = Node::new("Relu", 14).with_execution_provider("MyEP");
//! let create_info = manager.search_kernel_registry(&node)?;
//! assert_eq!(create_info.kernel_def().op_type(), "Relu");
//! # Ok::<(), ronn_core::CoreError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod data_transfer;
pub mod execution_provider;
pub mod kernel_def;
pub mod kernel_registry;
pub mod kernel_registry_manager;
pub mod op_kernel;
pub mod session_state;

pub use data_transfer::{CpuDataTransfer, DataTransfer, DataTransferManager, Device, DeviceType};
pub use execution_provider::{ExecutionProvider, ExecutionProviders};
pub use kernel_def::{KernelDef, KernelDefBuilder, OPEN_VERSION};
pub use kernel_registry::KernelRegistry;
pub use kernel_registry_manager::KernelRegistryManager;
pub use op_kernel::{
    KernelCreateFn, KernelCreateInfo, KernelMetadata, KernelValue, OpKernel, OpKernelContext,
    OpKernelInfo,
};
pub use session_state::{
    ConstantInitializers, ConstantValue, FunctionManager, FusedFunction, SessionServices,
    SessionState, ValueIndex, ValueNameIndexMap,
};
