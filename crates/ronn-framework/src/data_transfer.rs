//! Cross-device copy registry handed to kernels at construction.

use std::fmt;
use std::sync::Arc;

use ronn_core::{CoreError, Result};
use tracing::debug;

/// Kind of device a buffer lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Host memory.
    Cpu,
    /// Discrete or integrated GPU memory.
    Gpu,
    /// Vendor accelerator memory.
    Npu,
}

/// A concrete device: kind plus ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    /// Device kind.
    pub device_type: DeviceType,
    /// Ordinal among devices of the same kind.
    pub id: u32,
}

impl Device {
    /// Host memory.
    pub const CPU: Self = Self {
        device_type: DeviceType::Cpu,
        id: 0,
    };

    /// GPU with the given ordinal.
    pub const fn gpu(id: u32) -> Self {
        Self {
            device_type: DeviceType::Gpu,
            id,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.device_type, self.id)
    }
}

/// Copies buffers between a pair of device kinds.
pub trait DataTransfer: Send + Sync {
    /// Name used in logs and duplicate detection.
    fn name(&self) -> &str;

    /// Whether this transfer handles `src` to `dst`.
    fn can_copy(&self, src: Device, dst: Device) -> bool;

    /// Copy `src` into `dst`; both slices have equal length.
    fn copy(&self, src: &[u8], src_device: Device, dst: &mut [u8], dst_device: Device) -> Result<()>;
}

/// Ordered set of [`DataTransfer`] implementations.
#[derive(Default, Clone)]
pub struct DataTransferManager {
    transfers: Vec<Arc<dyn DataTransfer>>,
}

impl fmt::Debug for DataTransferManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.transfers.iter().map(|t| t.name()))
            .finish()
    }
}

impl DataTransferManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transfer; names must be unique.
    pub fn register_data_transfer(&mut self, transfer: Arc<dyn DataTransfer>) -> Result<()> {
        if self.transfers.iter().any(|t| t.name() == transfer.name()) {
            return Err(CoreError::invalid_argument(format!(
                "data transfer {} is already registered",
                transfer.name()
            )));
        }
        debug!("Registered data transfer {}", transfer.name());
        self.transfers.push(transfer);
        Ok(())
    }

    /// First registered transfer able to copy `src` to `dst`.
    pub fn get_data_transfer(&self, src: Device, dst: Device) -> Option<&dyn DataTransfer> {
        self.transfers
            .iter()
            .find(|t| t.can_copy(src, dst))
            .map(|t| t.as_ref())
    }

    /// Copy between devices using the first capable transfer.
    pub fn copy(&self, src: &[u8], src_device: Device, dst: &mut [u8], dst_device: Device) -> Result<()> {
        if src.len() != dst.len() {
            return Err(CoreError::invalid_argument(format!(
                "copy size mismatch: {} != {}",
                src.len(),
                dst.len()
            )));
        }
        let transfer = self.get_data_transfer(src_device, dst_device).ok_or_else(|| {
            CoreError::invalid_argument(format!(
                "no data transfer registered for {src_device} -> {dst_device}"
            ))
        })?;
        transfer.copy(src, src_device, dst, dst_device)
    }

    /// Number of registered transfers.
    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    /// Whether no transfer is registered.
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// Host-to-host copy.
#[derive(Debug, Default)]
pub struct CpuDataTransfer;

impl DataTransfer for CpuDataTransfer {
    fn name(&self) -> &str {
        "cpu"
    }

    fn can_copy(&self, src: Device, dst: Device) -> bool {
        src.device_type == DeviceType::Cpu && dst.device_type == DeviceType::Cpu
    }

    fn copy(&self, src: &[u8], _src_device: Device, dst: &mut [u8], _dst_device: Device) -> Result<()> {
        dst.copy_from_slice(src);
        Ok(())
    }
}
