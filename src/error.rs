use thiserror::Error;

use crate::nodes::node::NodeId;
use crate::nodes::socket::{DataType, SocketDirection};

/// Failures of the structural mutation API.
///
/// Every mutation is accept-or-reject: when one of these is returned the
/// graph is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {node} has no {direction} socket named \"{name}\"")]
    UnknownSocket {
        node: NodeId,
        direction: SocketDirection,
        name: String,
    },
    #[error("cannot link a {from} output to a {to} input")]
    TypeMismatch { from: DataType, to: DataType },
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    #[error("link from node {from} to node {to} would close a cycle")]
    CycleDetected { from: NodeId, to: NodeId },
    #[error("no link between the given sockets")]
    LinkNotFound,
    #[error("operation not supported by node {0}")]
    WrongKind(NodeId),
}
