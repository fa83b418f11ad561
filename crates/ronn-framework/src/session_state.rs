//! Session-scoped services that kernels receive at construction.
//!
//! All four services are populated while a session is built and read-only
//! afterwards, so kernels may be created for different nodes concurrently.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ronn_core::{CoreError, Result};

use crate::data_transfer::DataTransferManager;
use crate::op_kernel::OpKernelContext;

/// Index of a value (input, output, initializer or intermediate) in a session.
pub type ValueIndex = usize;

/// Type-erased constant tensor held by the session.
pub type ConstantValue = Arc<dyn Any + Send + Sync>;

/// Constant initializers keyed by value index.
#[derive(Default, Clone)]
pub struct ConstantInitializers {
    values: HashMap<ValueIndex, ConstantValue>,
}

impl fmt::Debug for ConstantInitializers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl ConstantInitializers {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a constant under `index`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, index: ValueIndex, value: T) {
        self.values.insert(index, Arc::new(value));
    }

    /// Borrow the constant at `index` as `T`.
    pub fn get<T: Any>(&self, index: ValueIndex) -> Option<&T> {
        self.values.get(&index)?.downcast_ref::<T>()
    }

    /// Whether a constant exists at `index`.
    pub fn contains(&self, index: ValueIndex) -> bool {
        self.values.contains_key(&index)
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bidirectional map between value names and dense indices.
#[derive(Debug, Default, Clone)]
pub struct ValueNameIndexMap {
    indices: HashMap<String, ValueIndex>,
    names: Vec<String>,
}

impl ValueNameIndexMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `name`, assigning the next one if unseen.
    pub fn add(&mut self, name: impl Into<String>) -> ValueIndex {
        let name = name.into();
        if let Some(&index) = self.indices.get(&name) {
            return index;
        }
        let index = self.names.len();
        self.indices.insert(name.clone(), index);
        self.names.push(name);
        index
    }

    /// Index of `name`.
    pub fn get_idx(&self, name: &str) -> Result<ValueIndex> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::invalid_argument(format!("unknown value name '{name}'")))
    }

    /// Name at `index`.
    pub fn get_name(&self, index: ValueIndex) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A subgraph compiled by an execution provider into a single callable.
pub trait FusedFunction: Send + Sync {
    /// Name of the fused node this function implements.
    fn name(&self) -> &str;

    /// Run the fused subgraph.
    fn compute(&self, context: &mut OpKernelContext) -> Result<()>;
}

/// Fused functions produced by provider compilation, keyed by node name.
#[derive(Default, Clone)]
pub struct FunctionManager {
    functions: HashMap<String, Arc<dyn FusedFunction>>,
}

impl fmt::Debug for FunctionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

impl FunctionManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fused function; names must be unique.
    pub fn add_fused_function(&mut self, function: Arc<dyn FusedFunction>) -> Result<()> {
        let name = function.name().to_string();
        if self.functions.contains_key(&name) {
            return Err(CoreError::invalid_argument(format!(
                "fused function '{name}' is already registered"
            )));
        }
        self.functions.insert(name, function);
        Ok(())
    }

    /// Fused function for the node called `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn FusedFunction>> {
        self.functions.get(name).cloned()
    }

    /// Number of fused functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no function is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Read access to the services of one session.
pub trait SessionState: Send + Sync {
    /// Constant initializers.
    fn constant_initialized_tensors(&self) -> &ConstantInitializers;

    /// Value-name-to-index map.
    fn value_name_idx_map(&self) -> &ValueNameIndexMap;

    /// Fused function manager.
    fn function_manager(&self) -> &FunctionManager;

    /// Cross-device copy registry.
    fn data_transfer_manager(&self) -> &DataTransferManager;
}

/// Owned bundle of the four session services.
#[derive(Debug, Default, Clone)]
pub struct SessionServices {
    constants: ConstantInitializers,
    value_names: ValueNameIndexMap,
    functions: FunctionManager,
    data_transfers: DataTransferManager,
}

impl SessionServices {
    /// Create empty services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constant by value name.
    pub fn add_constant<T: Any + Send + Sync>(&mut self, name: &str, value: T) -> ValueIndex {
        let index = self.value_names.add(name);
        self.constants.insert(index, value);
        index
    }

    /// Mutable access to the value-name map.
    pub fn value_names_mut(&mut self) -> &mut ValueNameIndexMap {
        &mut self.value_names
    }

    /// Mutable access to the function manager.
    pub fn functions_mut(&mut self) -> &mut FunctionManager {
        &mut self.functions
    }

    /// Mutable access to the data transfer manager.
    pub fn data_transfers_mut(&mut self) -> &mut DataTransferManager {
        &mut self.data_transfers
    }
}

impl SessionState for SessionServices {
    fn constant_initialized_tensors(&self) -> &ConstantInitializers {
        &self.constants
    }

    fn value_name_idx_map(&self) -> &ValueNameIndexMap {
        &self.value_names
    }

    fn function_manager(&self) -> &FunctionManager {
        &self.functions
    }

    fn data_transfer_manager(&self) -> &DataTransferManager {
        &self.data_transfers
    }
}
