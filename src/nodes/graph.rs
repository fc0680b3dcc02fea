//! Node graph data structures and structural operations

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::node::{Node, NodeId, NodeKind};
use super::socket::{SocketDirection, SocketValue};
use super::string::StringMode;
use crate::error::GraphError;
use crate::resources::ResourceId;

/// A directed edge from an output socket to an input socket.
///
/// Endpoints are addressed by socket name because socket sets are rebuilt on
/// variant changes. A link that loses an endpoint is first marked invalid and
/// then pruned; resolution and propagation ignore invalid links in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from_node: NodeId,
    pub from_socket: String,
    pub to_node: NodeId,
    pub to_socket: String,
    pub valid: bool,
}

impl Link {
    /// Creates a new valid link
    pub fn new(
        from_node: NodeId,
        from_socket: impl Into<String>,
        to_node: NodeId,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node,
            from_socket: from_socket.into(),
            to_node,
            to_socket: to_socket.into(),
            valid: true,
        }
    }
}

/// A graph owning nodes and the links between their sockets.
///
/// All operations here are purely structural and atomic accept-or-reject;
/// recomputation is driven separately by the propagation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub links: Vec<Link>,
    next_node_id: NodeId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            links: Vec::new(),
            next_node_id: 0,
        }
    }

    /// Adds a node of the given kind and returns its ID
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_node_id;
        self.nodes.insert(id, Node::new(id, kind));
        self.next_node_id += 1;
        debug!("added {} node {}", kind.type_id(), id);
        id
    }

    /// Removes a node together with its sockets and incident links.
    ///
    /// Returns the IDs of nodes that were downstream of the removed node, so
    /// the caller can recompute them against their now-unlinked inputs.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.nodes.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        let mut orphaned = Vec::new();
        for link in &mut self.links {
            if link.from_node == id || link.to_node == id {
                link.valid = false;
                if link.from_node == id {
                    orphaned.push(link.to_node);
                }
            }
        }
        self.prune_invalid_links();
        orphaned.sort_unstable();
        orphaned.dedup();
        debug!("removed node {}, {} dependents unlinked", id, orphaned.len());
        Ok(orphaned)
    }

    /// Looks up a node, failing with `UnknownNode`
    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::UnknownNode(id))
    }

    /// Links an output socket to an input socket.
    ///
    /// Rejected when either endpoint is missing, the types differ, both
    /// endpoints sit on one node, or the link would close a cycle. An
    /// existing link into the same input is replaced.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_socket: &str,
        to: NodeId,
        to_socket: &str,
    ) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        let from_type = self
            .node(from)?
            .output(from_socket)
            .ok_or_else(|| GraphError::UnknownSocket {
                node: from,
                direction: SocketDirection::Output,
                name: from_socket.to_string(),
            })?
            .data_type;
        let to_type = self
            .node(to)?
            .input(to_socket)
            .ok_or_else(|| GraphError::UnknownSocket {
                node: to,
                direction: SocketDirection::Input,
                name: to_socket.to_string(),
            })?
            .data_type;
        if !from_type.can_connect_to(&to_type) {
            return Err(GraphError::TypeMismatch {
                from: from_type,
                to: to_type,
            });
        }
        if self.reaches(to, from) {
            return Err(GraphError::CycleDetected { from, to });
        }

        // An input holds at most one active link; a reconnect replaces it.
        let had_link = self.links.len();
        self.links
            .retain(|l| !(l.to_node == to && l.to_socket == to_socket));
        if self.links.len() < had_link {
            debug!("replacing link into node {} \"{}\"", to, to_socket);
        }
        self.links.push(Link::new(from, from_socket, to, to_socket));
        Ok(())
    }

    /// Removes the link between the given sockets
    pub fn disconnect(
        &mut self,
        from: NodeId,
        from_socket: &str,
        to: NodeId,
        to_socket: &str,
    ) -> Result<(), GraphError> {
        self.node(from)?;
        self.node(to)?;
        let index = self
            .links
            .iter()
            .position(|l| {
                l.from_node == from
                    && l.from_socket == from_socket
                    && l.to_node == to
                    && l.to_socket == to_socket
            })
            .ok_or(GraphError::LinkNotFound)?;
        self.links.remove(index);
        Ok(())
    }

    /// Switches a String node to another variant.
    ///
    /// The socket set is diffed against the new variant's schema: matching
    /// sockets keep their values and links, the rest are dropped together
    /// with their links. Returns the IDs of nodes left without an upstream
    /// link. Re-applying the current variant is a no-op.
    pub fn set_string_mode(
        &mut self,
        id: NodeId,
        mode: StringMode,
    ) -> Result<Vec<NodeId>, GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        let NodeKind::String(current) = node.kind else {
            return Err(GraphError::WrongKind(id));
        };
        if current == mode {
            return Ok(Vec::new());
        }

        let kind = NodeKind::String(mode);
        node.kind = kind;
        let dropped = node.set_sockets(&kind.socket_schema());
        debug!("node {} switched to {:?}, dropped {:?}", id, mode, dropped);

        let mut orphaned = Vec::new();
        for link in &mut self.links {
            let broken = dropped.iter().any(|(direction, name)| match direction {
                SocketDirection::Input => link.to_node == id && link.to_socket == *name,
                SocketDirection::Output => link.from_node == id && link.from_socket == *name,
            });
            if broken {
                link.valid = false;
                if link.from_node == id {
                    orphaned.push(link.to_node);
                }
            }
        }
        self.prune_invalid_links();
        orphaned.sort_unstable();
        orphaned.dedup();
        Ok(orphaned)
    }

    /// Binds a file node to a text resource, or unbinds it with `None`.
    ///
    /// Returns whether the binding actually changed.
    pub fn bind_resource(
        &mut self,
        id: NodeId,
        resource: Option<ResourceId>,
    ) -> Result<bool, GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        if !node.kind.uses_resource() {
            return Err(GraphError::WrongKind(id));
        }
        if node.resource == resource {
            return Ok(false);
        }
        node.resource = resource;
        Ok(true)
    }

    /// Writes a value into an input socket's default slot.
    ///
    /// Returns whether the stored value changed. While the input is linked
    /// the default is shadowed by the upstream value.
    pub fn write_input(
        &mut self,
        id: NodeId,
        socket: &str,
        value: SocketValue,
    ) -> Result<bool, GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        let sock = node
            .input_mut(socket)
            .ok_or_else(|| GraphError::UnknownSocket {
                node: id,
                direction: SocketDirection::Input,
                name: socket.to_string(),
            })?;
        if value.data_type() != sock.data_type {
            return Err(GraphError::TypeMismatch {
                from: value.data_type(),
                to: sock.data_type,
            });
        }
        Ok(sock.write(value, false))
    }

    /// Resolves the current value of an input socket.
    ///
    /// A valid incoming link reads the upstream output socket; otherwise the
    /// socket's own stored default is used. Unset values resolve to `None`.
    pub fn input_value(&self, id: NodeId, socket: &str) -> Option<SocketValue> {
        let node = self.nodes.get(&id)?;
        let sock = node.input(socket)?;
        match self
            .links
            .iter()
            .find(|l| l.valid && l.to_node == id && l.to_socket == socket)
        {
            Some(link) => self
                .nodes
                .get(&link.from_node)
                .and_then(|n| n.output(&link.from_socket))
                .and_then(|s| s.value().cloned()),
            None => sock.value().cloned(),
        }
    }

    /// All nodes fed by the given output socket over valid links
    pub fn dependents_of_output(&self, id: NodeId, socket: &str) -> Vec<NodeId> {
        self.links
            .iter()
            .filter(|l| l.valid && l.from_node == id && l.from_socket == socket)
            .map(|l| l.to_node)
            .collect()
    }

    /// Whether `target` is reachable from `start` over valid links
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            for link in &self.links {
                if link.valid && link.from_node == id {
                    stack.push(link.to_node);
                }
            }
        }
        false
    }

    fn prune_invalid_links(&mut self) {
        self.links.retain(|l| l.valid);
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}
