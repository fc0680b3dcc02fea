//! Textgraph core library
//!
//! An incremental dataflow graph with typed sockets: nodes recompute their
//! outputs from their current inputs, and a push-based propagation engine
//! carries change notifications to dependent nodes, visiting each node at
//! most once per pass. Text-resource nodes reach their environment only
//! through an injected [`resources::TextStore`] adapter, so the whole graph
//! runs headless.

pub mod error;
pub mod nodes;
pub mod resources;
pub mod runtime;

// Re-export commonly used types
pub use error::GraphError;
pub use nodes::{
    DataType, Link, Node, NodeCategory, NodeFactory, NodeGraph, NodeId, NodeKind, NodeMetadata,
    NodeRegistry, PassStats, PropagationEngine, Socket, SocketDefinition, SocketDirection,
    SocketSchema, SocketValue, StringMode,
};
pub use resources::{MemoryTextStore, ResourceId, TextStore};
pub use runtime::GraphRuntime;
