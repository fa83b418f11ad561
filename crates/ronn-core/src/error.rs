//! Unified error type for the RONN kernel runtime.
//!
//! Every fallible operation in the workspace reports a [`CoreError`]. Native
//! backend statuses are translated into it at the provider boundary, so no
//! backend-specific error type escapes a session builder.

use std::fmt;

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Coarse status category of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Generic failure.
    Fail,
    /// A caller supplied an empty or otherwise unusable argument.
    InvalidArgument,
    /// No implementation is available for the request.
    NotImplemented,
    /// An execution provider failed internally.
    EpFail,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fail => "FAIL",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::EpFail => "EP_FAIL",
        };
        f.write_str(name)
    }
}

/// Identifies a node in diagnostics: `Conv(11) (node conv_1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescription {
    /// Operator type.
    pub op_type: String,
    /// Opset version the node was introduced with.
    pub since_version: i32,
    /// Node name, if the model gave it one.
    pub name: Option<String>,
}

impl fmt::Display for NodeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op_type, self.since_version)?;
        if let Some(name) = &self.name {
            write!(f, " (node {name})")?;
        }
        Ok(())
    }
}

/// Errors that can occur while resolving kernels or bootstrapping sessions.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bulk stock registration saw a provider type twice.
    #[error("found duplicated provider {provider_type} in KernelRegistryManager")]
    DuplicateProvider {
        /// The repeated provider type.
        provider_type: String,
    },

    /// A provider collection already holds this provider type.
    #[error("execution provider {provider_type} is already in the provider list")]
    DuplicateExecutionProvider {
        /// The repeated provider type.
        provider_type: String,
    },

    /// A kernel registry with no entries was supplied where one is required.
    #[error("kernel registry for {provider_type} cannot be empty")]
    EmptyKernelRegistry {
        /// Provider type the registry was offered for.
        provider_type: String,
    },

    /// A special registry already exists for this provider type.
    #[error("found duplicated provider {provider_type} in special provider registry")]
    DuplicateSpecialRegistry {
        /// The repeated provider type.
        provider_type: String,
    },

    /// The node has not been placed on any execution provider.
    #[error("the node is not placed on any execution provider: {node}")]
    UnassignedProvider {
        /// The offending node.
        node: NodeDescription,
    },

    /// No registry tier yielded a kernel for the node.
    #[error("failed to find kernel for {node}. {detail}")]
    KernelNotFound {
        /// The offending node.
        node: NodeDescription,
        /// Detail from the last attempted lookup.
        detail: String,
    },

    /// Two kernel definitions in one registry could match the same node.
    #[error("kernel definition conflicts with an existing registration: {0}")]
    KernelConflict(String),

    /// A fingerprint is already indexed in the registry.
    #[error("kernel definition hash {hash:#018x} is already registered for {op_type}")]
    DuplicateKernelHash {
        /// The colliding fingerprint.
        hash: u64,
        /// Operator of the existing entry.
        op_type: String,
    },

    /// A kernel factory refused to build a kernel.
    #[error("failed to create kernel for {node}: {message}")]
    KernelCreation {
        /// The node the kernel was requested for.
        node: NodeDescription,
        /// Factory-provided reason.
        message: String,
    },

    /// An argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A native backend call failed.
    #[error("{phase} failed with {code}: {message}")]
    Native {
        /// Bootstrap phase in which the call failed.
        phase: String,
        /// Mapped status category.
        code: StatusCode,
        /// The backend's original message.
        message: String,
    },
}

impl CoreError {
    /// Status category of this error.
    pub fn code(&self) -> StatusCode {
        match self {
            Self::KernelNotFound { .. } => StatusCode::NotImplemented,
            Self::InvalidArgument(_) => StatusCode::InvalidArgument,
            Self::Native { code, .. } => *code,
            _ => StatusCode::Fail,
        }
    }

    /// Builds an [`CoreError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
