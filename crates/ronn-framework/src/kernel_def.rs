//! Kernel definitions and their fingerprints.
//!
//! A [`KernelDef`] states which nodes a kernel can serve: operator type,
//! domain, an inclusive opset version range, the execution provider it runs
//! on, and the element types each named type parameter may bind to.

use std::collections::BTreeMap;
use std::fmt;

use ronn_core::{DataType, ONNX_DOMAIN};
use sha2::{Digest, Sha256};

/// Upper version bound used for open-ended ranges.
pub const OPEN_VERSION: i32 = i32::MAX;

/// Immutable description of a kernel implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelDef {
    op_type: String,
    domain: String,
    since_version_start: i32,
    since_version_end: i32,
    provider_type: String,
    type_constraints: BTreeMap<String, Vec<DataType>>,
    hash: u64,
}

impl KernelDef {
    /// Start building a definition for `op_type`.
    pub fn builder(op_type: impl Into<String>) -> KernelDefBuilder {
        KernelDefBuilder::new(op_type)
    }

    /// Operator type.
    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    /// Operator domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Inclusive version range `(start, end)`.
    pub fn since_version(&self) -> (i32, i32) {
        (self.since_version_start, self.since_version_end)
    }

    /// Execution provider this kernel runs on.
    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    /// Named type parameters and the element types they admit.
    pub fn type_constraints(&self) -> &BTreeMap<String, Vec<DataType>> {
        &self.type_constraints
    }

    /// 64-bit fingerprint of this definition.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Whether a node with `version` falls inside the range.
    pub fn supports_version(&self, version: i32) -> bool {
        self.since_version_start <= version && version <= self.since_version_end
    }

    /// Whether both definitions could match the same node.
    ///
    /// Nodes are matched on operator, domain, provider and version only, so
    /// overlapping version ranges conflict whatever the type constraints.
    pub fn is_conflict_with(&self, other: &Self) -> bool {
        if self.op_type != other.op_type
            || self.domain != other.domain
            || self.provider_type != other.provider_type
        {
            return false;
        }

        let (start, end) = other.since_version();
        start <= self.since_version_end && end >= self.since_version_start
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.op_type.as_bytes());
        hasher.update([0]);
        hasher.update(self.domain.as_bytes());
        hasher.update([0]);
        hasher.update(self.since_version_start.to_le_bytes());
        hasher.update(self.since_version_end.to_le_bytes());
        hasher.update(self.provider_type.as_bytes());
        hasher.update([0]);
        for (name, types) in &self.type_constraints {
            hasher.update(name.as_bytes());
            hasher.update([b'=']);
            for data_type in types {
                hasher.update(data_type.as_str().as_bytes());
                hasher.update([b',']);
            }
            hasher.update([0]);
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl fmt::Display for KernelDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domain = if self.domain.is_empty() {
            "ai.onnx"
        } else {
            &self.domain
        };
        write!(f, "{}:{}(", domain, self.op_type)?;
        if self.since_version_end == OPEN_VERSION {
            write!(f, "{}+", self.since_version_start)?;
        } else {
            write!(f, "{}-{}", self.since_version_start, self.since_version_end)?;
        }
        write!(f, ") on {}", self.provider_type)
    }
}

/// Builder for [`KernelDef`].
#[derive(Debug, Clone)]
pub struct KernelDefBuilder {
    op_type: String,
    domain: String,
    since_version_start: i32,
    since_version_end: i32,
    provider_type: String,
    type_constraints: BTreeMap<String, Vec<DataType>>,
}

impl KernelDefBuilder {
    fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            domain: ONNX_DOMAIN.to_string(),
            since_version_start: 1,
            since_version_end: OPEN_VERSION,
            provider_type: String::new(),
            type_constraints: BTreeMap::new(),
        }
    }

    /// Operator domain; defaults to the ONNX domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Open-ended version range starting at `start`.
    pub fn since_version(mut self, start: i32) -> Self {
        self.since_version_start = start;
        self.since_version_end = OPEN_VERSION;
        self
    }

    /// Closed version range `[start, end]`.
    pub fn version_range(mut self, start: i32, end: i32) -> Self {
        self.since_version_start = start;
        self.since_version_end = end;
        self
    }

    /// Execution provider the kernel runs on.
    pub fn provider(mut self, provider_type: impl Into<String>) -> Self {
        self.provider_type = provider_type.into();
        self
    }

    /// Constrain a type parameter to `types`.
    pub fn type_constraint(
        mut self,
        name: impl Into<String>,
        types: impl IntoIterator<Item = DataType>,
    ) -> Self {
        let mut types: Vec<DataType> = types.into_iter().collect();
        types.sort_unstable();
        types.dedup();
        self.type_constraints.insert(name.into(), types);
        self
    }

    /// Finish the definition and compute its fingerprint.
    pub fn build(self) -> KernelDef {
        let mut def = KernelDef {
            op_type: self.op_type,
            domain: self.domain,
            since_version_start: self.since_version_start,
            since_version_end: self.since_version_end,
            provider_type: self.provider_type,
            type_constraints: self.type_constraints,
            hash: 0,
        };
        def.hash = def.fingerprint();
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronn_core::provider_types;

    fn conv(start: i32, end: i32) -> KernelDef {
        KernelDef::builder("Conv")
            .version_range(start, end)
            .provider(provider_types::CPU)
            .type_constraint("T", [DataType::F32])
            .build()
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(conv(1, 10).hash(), conv(1, 10).hash());
        assert_ne!(conv(1, 10).hash(), conv(11, OPEN_VERSION).hash());
    }

    #[test]
    fn test_fingerprint_ignores_constraint_order() {
        let a = KernelDef::builder("Add")
            .provider(provider_types::CPU)
            .type_constraint("T", [DataType::F32, DataType::I64])
            .build();
        let b = KernelDef::builder("Add")
            .provider(provider_types::CPU)
            .type_constraint("T", [DataType::I64, DataType::F32, DataType::F32])
            .build();
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_supports_version() {
        let def = conv(1, 10);
        assert!(def.supports_version(1));
        assert!(def.supports_version(10));
        assert!(!def.supports_version(11));
        assert!(KernelDef::builder("Relu").since_version(14).build().supports_version(21));
    }

    #[test]
    fn test_conflict_detection() {
        assert!(conv(1, 10).is_conflict_with(&conv(10, 12)));
        assert!(!conv(1, 10).is_conflict_with(&conv(11, 12)));

        let half = KernelDef::builder("Conv")
            .version_range(1, 10)
            .provider(provider_types::CPU)
            .type_constraint("T", [DataType::F16])
            .build();
        assert!(conv(1, 10).is_conflict_with(&half));

        let other_provider = KernelDef::builder("Conv")
            .version_range(1, 10)
            .provider(provider_types::TENSORRT)
            .type_constraint("T", [DataType::F32])
            .build();
        assert!(!conv(1, 10).is_conflict_with(&other_provider));
    }

    #[test]
    fn test_display() {
        assert_eq!(conv(1, 10).to_string(), "ai.onnx:Conv(1-10) on CPUExecutionProvider");
        let open = KernelDef::builder("FusedConv")
            .domain("com.microsoft")
            .provider(provider_types::CPU)
            .build();
        assert_eq!(open.to_string(), "com.microsoft:FusedConv(1+) on CPUExecutionProvider");
    }
}
