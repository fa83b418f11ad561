//! The kernel instantiation contract.
//!
//! A registry stores a [`KernelCreateInfo`] per kernel: the definition it was
//! registered under plus a factory. Instantiation hands the factory an
//! [`OpKernelInfo`] that borrows the node, the definition, the owning
//! execution provider and the session services for the duration of the call.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ronn_core::{Node, Result};

use crate::data_transfer::DataTransferManager;
use crate::execution_provider::ExecutionProvider;
use crate::kernel_def::KernelDef;
use crate::session_state::{ConstantInitializers, FunctionManager, SessionState, ValueNameIndexMap};

/// Type-erased value flowing through a kernel.
pub type KernelValue = Arc<dyn Any + Send + Sync>;

/// Factory producing a kernel from its construction context.
pub type KernelCreateFn = Arc<dyn Fn(&OpKernelInfo<'_>) -> Result<Box<dyn OpKernel>> + Send + Sync>;

/// An executable implementation of one operator for one node.
pub trait OpKernel: Send + Sync {
    /// Identity captured at construction.
    fn metadata(&self) -> &KernelMetadata;

    /// Execute the kernel.
    fn compute(&self, context: &mut OpKernelContext) -> Result<()>;
}

/// What a kernel remembers about the node it was built for.
#[derive(Debug, Clone)]
pub struct KernelMetadata {
    /// Node name.
    pub node_name: String,
    /// Operator type.
    pub op_type: String,
    /// Node opset version.
    pub since_version: i32,
    /// Provider the kernel runs on.
    pub provider_type: String,
    /// Definition the kernel was resolved through.
    pub kernel_def: Arc<KernelDef>,
}

/// Registered kernel: definition plus factory.
#[derive(Clone)]
pub struct KernelCreateInfo {
    kernel_def: Arc<KernelDef>,
    create_fn: KernelCreateFn,
}

impl fmt::Debug for KernelCreateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelCreateInfo")
            .field("kernel_def", &self.kernel_def)
            .finish_non_exhaustive()
    }
}

impl KernelCreateInfo {
    /// Pair a definition with its factory.
    pub fn new<F>(kernel_def: KernelDef, create_fn: F) -> Self
    where
        F: Fn(&OpKernelInfo<'_>) -> Result<Box<dyn OpKernel>> + Send + Sync + 'static,
    {
        Self {
            kernel_def: Arc::new(kernel_def),
            create_fn: Arc::new(create_fn),
        }
    }

    /// The definition.
    pub fn kernel_def(&self) -> &KernelDef {
        &self.kernel_def
    }

    /// Shared handle to the definition.
    pub fn shared_kernel_def(&self) -> &Arc<KernelDef> {
        &self.kernel_def
    }

    /// Invoke the factory.
    pub fn create(&self, info: &OpKernelInfo<'_>) -> Result<Box<dyn OpKernel>> {
        (self.create_fn)(info)
    }
}

/// Construction context passed to a kernel factory.
pub struct OpKernelInfo<'a> {
    node: &'a Node,
    kernel_def: &'a Arc<KernelDef>,
    execution_provider: &'a dyn ExecutionProvider,
    constants: &'a ConstantInitializers,
    value_names: &'a ValueNameIndexMap,
    functions: &'a FunctionManager,
    data_transfers: &'a DataTransferManager,
}

impl<'a> OpKernelInfo<'a> {
    /// Borrow everything a factory may need from the session.
    pub fn new(
        node: &'a Node,
        kernel_def: &'a Arc<KernelDef>,
        execution_provider: &'a dyn ExecutionProvider,
        session_state: &'a dyn SessionState,
    ) -> Self {
        Self {
            node,
            kernel_def,
            execution_provider,
            constants: session_state.constant_initialized_tensors(),
            value_names: session_state.value_name_idx_map(),
            functions: session_state.function_manager(),
            data_transfers: session_state.data_transfer_manager(),
        }
    }

    /// The node being instantiated.
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// The resolved definition.
    pub fn kernel_def(&self) -> &'a KernelDef {
        self.kernel_def
    }

    /// The owning execution provider.
    pub fn execution_provider(&self) -> &'a dyn ExecutionProvider {
        self.execution_provider
    }

    /// Constant initializers.
    pub fn constant_initialized_tensors(&self) -> &'a ConstantInitializers {
        self.constants
    }

    /// Value-name-to-index map.
    pub fn value_name_idx_map(&self) -> &'a ValueNameIndexMap {
        self.value_names
    }

    /// Fused function manager.
    pub fn function_manager(&self) -> &'a FunctionManager {
        self.functions
    }

    /// Cross-device copy registry.
    pub fn data_transfer_manager(&self) -> &'a DataTransferManager {
        self.data_transfers
    }

    /// The constant bound to input `input_index`, if that input is an initializer of type `T`.
    pub fn try_get_constant_input<T: Any>(&self, input_index: usize) -> Option<&'a T> {
        let name = self.node.inputs().get(input_index)?;
        let index = self.value_names.get_idx(name).ok()?;
        self.constants.get::<T>(index)
    }

    /// Identity to store in the kernel.
    pub fn metadata(&self) -> KernelMetadata {
        KernelMetadata {
            node_name: self.node.name().to_string(),
            op_type: self.node.op_type().to_string(),
            since_version: self.node.since_version(),
            provider_type: self.execution_provider.provider_type().to_string(),
            kernel_def: Arc::clone(self.kernel_def),
        }
    }
}

/// Inputs and outputs of a single kernel invocation.
#[derive(Default)]
pub struct OpKernelContext {
    inputs: Vec<KernelValue>,
    outputs: Vec<Option<KernelValue>>,
}

impl OpKernelContext {
    /// Context with `inputs` and room for `output_count` outputs.
    pub fn new(inputs: Vec<KernelValue>, output_count: usize) -> Self {
        Self {
            inputs,
            outputs: vec![None; output_count],
        }
    }

    /// Number of inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Borrow input `index` as `T`.
    pub fn input<T: Any>(&self, index: usize) -> Option<&T> {
        self.inputs.get(index)?.downcast_ref::<T>()
    }

    /// Set output `index`.
    pub fn set_output<T: Any + Send + Sync>(&mut self, index: usize, value: T) -> Result<()> {
        let count = self.outputs.len();
        let slot = self.outputs.get_mut(index).ok_or_else(|| {
            ronn_core::CoreError::invalid_argument(format!(
                "output index {index} out of range for {count} outputs"
            ))
        })?;
        *slot = Some(Arc::new(value));
        Ok(())
    }

    /// Borrow output `index` as `T`, if it has been set.
    pub fn output<T: Any>(&self, index: usize) -> Option<&T> {
        self.outputs.get(index)?.as_ref()?.downcast_ref::<T>()
    }

    /// Take ownership of all outputs.
    pub fn into_outputs(self) -> Vec<Option<KernelValue>> {
        self.outputs
    }
}
