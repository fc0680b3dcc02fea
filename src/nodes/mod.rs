//! Node system - core data structures and node implementations

// Core node system modules
pub mod factory;
pub mod graph;
pub mod node;
pub mod propagation;
pub mod socket;

// Node implementations
pub mod file;
pub mod string;

// Re-export core types
pub use graph::{Link, NodeGraph};
pub use node::{Node, NodeId, NodeKind};
pub use socket::{DataType, Socket, SocketDirection, SocketValue};

// Re-export factory types
pub use factory::{
    NodeCategory, NodeFactory, NodeMetadata, NodeRegistry, SocketDefinition, SocketSchema,
};

// Re-export propagation engine types
pub use propagation::{NodeInputs, PassStats, PropagationEngine};

// Re-export node variant types
pub use string::StringMode;
