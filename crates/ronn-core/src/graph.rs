//! Graph node view consumed by kernel resolution.
//!
//! Partitioning decides which execution provider owns each node; this module
//! only carries the result of that decision alongside the operator identity.

use crate::error::NodeDescription;
use crate::types::ONNX_DOMAIN;

/// Index of a node within its graph.
pub type NodeIndex = usize;

/// A single operator invocation in a model graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    index: NodeIndex,
    name: String,
    op_type: String,
    domain: String,
    since_version: i32,
    inputs: Vec<String>,
    outputs: Vec<String>,
    execution_provider_type: String,
}

impl Node {
    /// Create a node in the default ONNX domain.
    pub fn new(op_type: impl Into<String>, since_version: i32) -> Self {
        Self {
            index: 0,
            name: String::new(),
            op_type: op_type.into(),
            domain: ONNX_DOMAIN.to_string(),
            since_version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            execution_provider_type: String::new(),
        }
    }

    /// Set the node index.
    pub fn with_index(mut self, index: NodeIndex) -> Self {
        self.index = index;
        self
    }

    /// Set the node name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the operator domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the input value names.
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the output value names.
    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Assign the node to an execution provider.
    pub fn with_execution_provider(mut self, provider_type: impl Into<String>) -> Self {
        self.execution_provider_type = provider_type.into();
        self
    }

    /// Reassign the node to an execution provider in place.
    pub fn set_execution_provider_type(&mut self, provider_type: impl Into<String>) {
        self.execution_provider_type = provider_type.into();
    }

    /// Node index.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Node name; empty when the model did not name it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operator type.
    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    /// Operator domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Opset version the operator was introduced with.
    pub fn since_version(&self) -> i32 {
        self.since_version
    }

    /// Input value names.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Output value names.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Assigned execution provider type; empty until partitioning runs.
    pub fn execution_provider_type(&self) -> &str {
        &self.execution_provider_type
    }

    /// Diagnostic identity used in error messages.
    pub fn describe(&self) -> NodeDescription {
        NodeDescription {
            op_type: self.op_type.clone(),
            since_version: self.since_version,
            name: (!self.name.is_empty()).then(|| self.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::provider_types;

    #[test]
    fn test_node_defaults() {
        let node = Node::new("Conv", 11);
        assert_eq!(node.op_type(), "Conv");
        assert_eq!(node.since_version(), 11);
        assert_eq!(node.domain(), ONNX_DOMAIN);
        assert!(node.execution_provider_type().is_empty());
        assert!(node.name().is_empty());
    }

    #[test]
    fn test_node_assignment() {
        let mut node = Node::new("Relu", 14)
            .with_name("relu_0")
            .with_inputs(["x"])
            .with_outputs(["y"]);
        node.set_execution_provider_type(provider_types::CPU);

        assert_eq!(node.execution_provider_type(), provider_types::CPU);
        assert_eq!(node.inputs(), ["x".to_string()]);
        assert_eq!(node.outputs(), ["y".to_string()]);
    }

    #[test]
    fn test_describe_skips_empty_name() {
        assert_eq!(Node::new("Add", 7).describe().name, None);
        assert_eq!(
            Node::new("Add", 7).with_name("add").describe().to_string(),
            "Add(7) (node add)"
        );
    }
}
