//! Node types and core node functionality

use serde::{Deserialize, Serialize};

use super::factory::{SocketDefinition, SocketSchema};
use super::socket::{Socket, SocketDirection};
use super::string::StringMode;
use super::{file, string};
use crate::resources::ResourceId;

/// Unique identifier for a node
pub type NodeId = usize;

/// The closed set of node kinds, each fully determining its socket schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// String manipulation node with a variant selector
    String(StringMode),
    /// Source node reading a bound text resource
    TextFileInput,
    /// Sink node overwriting a bound text resource
    TextFileOutput,
}

impl NodeKind {
    /// Stable type identifier, independent of display names
    pub fn type_id(&self) -> &'static str {
        match self {
            NodeKind::String(_) => "String",
            NodeKind::TextFileInput => "TextFileInput",
            NodeKind::TextFileOutput => "TextFileOutput",
        }
    }

    /// The socket schema this kind (and variant) prescribes
    pub fn socket_schema(&self) -> SocketSchema {
        match self {
            NodeKind::String(mode) => string::socket_schema(*mode),
            NodeKind::TextFileInput => file::input::socket_schema(),
            NodeKind::TextFileOutput => file::output::socket_schema(),
        }
    }

    /// Whether this kind binds to an external text resource
    pub fn uses_resource(&self) -> bool {
        matches!(self, NodeKind::TextFileInput | NodeKind::TextFileOutput)
    }
}

/// A unit of computation in the graph: a kind plus its current sockets.
///
/// The socket set is always the one prescribed by `kind`; it is rebuilt
/// through [`Node::set_sockets`] whenever the kind's variant changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    /// External text resource binding, only used by the file node kinds
    pub resource: Option<ResourceId>,
}

impl Node {
    /// Creates a new node with the socket set prescribed by its kind
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        let mut node = Self {
            id,
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            resource: None,
        };
        node.set_sockets(&kind.socket_schema());
        node
    }

    /// Looks up an input socket by name
    pub fn input(&self, name: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.name == name)
    }

    /// Looks up an output socket by name
    pub fn output(&self, name: &str) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.name == name)
    }

    pub fn input_mut(&mut self, name: &str) -> Option<&mut Socket> {
        self.inputs.iter_mut().find(|s| s.name == name)
    }

    pub fn output_mut(&mut self, name: &str) -> Option<&mut Socket> {
        self.outputs.iter_mut().find(|s| s.name == name)
    }

    /// Looks up a socket by direction and name
    pub fn socket(&self, direction: SocketDirection, name: &str) -> Option<&Socket> {
        match direction {
            SocketDirection::Input => self.input(name),
            SocketDirection::Output => self.output(name),
        }
    }

    /// Replaces the socket set with the given schema.
    ///
    /// Sockets matching a schema entry by name and type are preserved with
    /// their current values; the rest are removed and reported back so the
    /// owning graph can destroy their links. Missing entries are created
    /// with their schema defaults. Calling this twice with the same schema
    /// is a no-op the second time.
    pub fn set_sockets(&mut self, schema: &SocketSchema) -> Vec<(SocketDirection, String)> {
        let mut dropped = Vec::new();
        sync_sockets(
            &mut self.inputs,
            &schema.inputs,
            SocketDirection::Input,
            &mut dropped,
        );
        sync_sockets(
            &mut self.outputs,
            &schema.outputs,
            SocketDirection::Output,
            &mut dropped,
        );
        dropped
    }
}

fn sync_sockets(
    current: &mut Vec<Socket>,
    target: &[SocketDefinition],
    direction: SocketDirection,
    dropped: &mut Vec<(SocketDirection, String)>,
) {
    current.retain(|sock| {
        let keep = target
            .iter()
            .any(|def| def.name == sock.name && def.data_type == sock.data_type);
        if !keep {
            dropped.push((direction, sock.name.clone()));
        }
        keep
    });
    for def in target {
        if !current.iter().any(|sock| sock.name == def.name) {
            current.push(def.build(direction));
        }
    }
}
