//! Node factory system with self-registration and schema metadata

use log::debug;
use std::collections::{BTreeMap, HashMap};

use super::node::{Node, NodeId, NodeKind};
use super::socket::{DataType, Socket, SocketDirection, SocketValue};
use crate::nodes::graph::NodeGraph;

/// Declarative description of one socket in a node's schema
#[derive(Debug, Clone, PartialEq)]
pub struct SocketDefinition {
    pub name: String,
    pub data_type: DataType,
    pub default: Option<SocketValue>,
}

impl SocketDefinition {
    /// Create a socket definition with no default value
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            default: None,
        }
    }

    /// Attach a default value created alongside the socket
    pub fn with_default(mut self, value: SocketValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Build a concrete socket from this definition
    pub fn build(&self, direction: SocketDirection) -> Socket {
        match &self.default {
            Some(value) => Socket::with_value(&self.name, direction, value.clone()),
            None => Socket::new(&self.name, direction, self.data_type),
        }
    }
}

/// The full socket layout prescribed by a node kind and variant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SocketSchema {
    pub inputs: Vec<SocketDefinition>,
    pub outputs: Vec<SocketDefinition>,
}

/// Hierarchical category system for organizing nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeCategory {
    path: Vec<String>,
}

impl NodeCategory {
    /// Create a new category from path components
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Get the full path as a slice
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Get the category name (last component)
    pub fn name(&self) -> &str {
        self.path.last().map(|s| s.as_str()).unwrap_or("")
    }

    /// Get display string for UI
    pub fn display_string(&self) -> String {
        self.path.join(" > ")
    }

    /// Standard category for file-backed nodes
    pub fn file_io() -> Self {
        Self::new(&["File IO"])
    }

    /// Standard category for value-manipulation nodes
    pub fn types() -> Self {
        Self::new(&["Types"])
    }
}

/// Metadata describing a node kind for host UIs
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub category: NodeCategory,
    pub tags: Vec<&'static str>,
    /// Variant names for kinds with a mode selector, empty otherwise
    pub variants: Vec<&'static str>,
    /// Socket layout of the default variant
    pub inputs: Vec<SocketDefinition>,
    pub outputs: Vec<SocketDefinition>,
}

impl NodeMetadata {
    /// Create node metadata with sensible defaults
    pub fn new(
        node_type: &'static str,
        display_name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        Self {
            node_type,
            display_name,
            description,
            version: "1.0",
            category,
            tags: vec![],
            variants: vec![],
            inputs: vec![],
            outputs: vec![],
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<SocketDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<SocketDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_tags(mut self, tags: Vec<&'static str>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_variants(mut self, variants: Vec<&'static str>) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }
}

/// Factory trait implemented by every node kind
pub trait NodeFactory {
    /// Get node metadata for enumeration and UI
    fn metadata() -> NodeMetadata
    where
        Self: Sized;

    /// The kind tag a created node carries
    fn kind() -> NodeKind
    where
        Self: Sized;

    /// Create a detached node instance
    fn create() -> Node
    where
        Self: Sized,
    {
        Node::new(0, Self::kind())
    }

    /// Add this node to a graph
    fn add_to_graph(graph: &mut NodeGraph) -> NodeId
    where
        Self: Sized,
    {
        graph.add_node(Self::kind())
    }
}

type NodeCreator = fn() -> Node;
type MetadataProvider = fn() -> NodeMetadata;

/// Registry for managing node factories
pub struct NodeRegistry {
    creators: BTreeMap<String, NodeCreator>,
    metadata_providers: BTreeMap<String, MetadataProvider>,
    categories: HashMap<NodeCategory, Vec<String>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            creators: BTreeMap::new(),
            metadata_providers: BTreeMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Register a node factory
    pub fn register<T: NodeFactory + 'static>(&mut self) {
        let metadata = T::metadata();
        let node_type = metadata.node_type.to_string();
        self.creators.insert(node_type.clone(), T::create);
        self.metadata_providers.insert(node_type.clone(), T::metadata);
        self.categories
            .entry(metadata.category.clone())
            .or_default()
            .push(node_type);
    }

    /// Create a detached node by type name
    pub fn create_node(&self, node_type: &str) -> Option<Node> {
        debug!("creating node of type: {}", node_type);
        self.creators.get(node_type).map(|creator| creator())
    }

    /// Get the metadata for a type name
    pub fn metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.metadata_providers.get(node_type).map(|meta| meta())
    }

    /// All registered type names, sorted
    pub fn node_types(&self) -> Vec<&str> {
        self.creators.keys().map(|s| s.as_str()).collect()
    }

    /// Type names registered under a category
    pub fn node_types_in_category(&self, category: &NodeCategory) -> &[String] {
        self.categories
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        // Value-manipulation nodes
        registry.register::<crate::nodes::string::StringNodeFactory>();

        // File IO nodes
        registry.register::<crate::nodes::file::input::TextFileInputNodeFactory>();
        registry.register::<crate::nodes::file::output::TextFileOutputNodeFactory>();

        registry
    }
}
