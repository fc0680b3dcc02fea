//! Host boundary for driving a graph
//!
//! [`GraphRuntime`] owns the graph, the propagation engine and the injected
//! text store. Every mutation is accept-or-reject and, on success, runs
//! exactly one propagation pass seeded with the affected nodes before
//! returning.

use crate::error::GraphError;
use crate::nodes::graph::NodeGraph;
use crate::nodes::node::{NodeId, NodeKind};
use crate::nodes::propagation::{PassStats, PropagationEngine};
use crate::nodes::socket::{SocketDirection, SocketValue};
use crate::nodes::string::StringMode;
use crate::resources::{ResourceId, TextStore};

/// A graph plus everything needed to keep it consistent
pub struct GraphRuntime {
    graph: NodeGraph,
    engine: PropagationEngine,
    store: Box<dyn TextStore>,
}

impl GraphRuntime {
    /// Creates an empty runtime around an injected text store
    pub fn new(store: Box<dyn TextStore>) -> Self {
        Self {
            graph: NodeGraph::new(),
            engine: PropagationEngine::new(),
            store,
        }
    }

    /// Read access to the underlying graph
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Read access to the text store
    pub fn store(&self) -> &dyn TextStore {
        self.store.as_ref()
    }

    /// Write access to the text store.
    ///
    /// Changing a resource this way does not notify the graph by itself;
    /// follow up with [`GraphRuntime::notify_resource_changed`].
    pub fn store_mut(&mut self) -> &mut dyn TextStore {
        self.store.as_mut()
    }

    /// Counters of the most recent propagation pass
    pub fn last_pass(&self) -> &PassStats {
        self.engine.last_pass()
    }

    /// Total number of propagation passes run so far
    pub fn passes(&self) -> u64 {
        self.engine.passes()
    }

    /// Adds a node and computes it once
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.graph.add_node(kind);
        self.run(&[id]);
        id
    }

    /// Removes a node; its former dependents recompute against their
    /// now-unlinked inputs
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        let orphaned = self.graph.remove_node(id)?;
        self.run(&orphaned);
        Ok(())
    }

    /// Links an output socket to an input socket and recomputes downstream
    pub fn connect(
        &mut self,
        from: NodeId,
        from_socket: &str,
        to: NodeId,
        to_socket: &str,
    ) -> Result<(), GraphError> {
        self.graph.connect(from, from_socket, to, to_socket)?;
        self.run(&[to]);
        Ok(())
    }

    /// Removes a link and recomputes the node that lost its upstream
    pub fn disconnect(
        &mut self,
        from: NodeId,
        from_socket: &str,
        to: NodeId,
        to_socket: &str,
    ) -> Result<(), GraphError> {
        self.graph.disconnect(from, from_socket, to, to_socket)?;
        self.run(&[to]);
        Ok(())
    }

    /// Switches a String node's variant.
    ///
    /// The node recomputes under its new schema, together with any nodes
    /// that lost an upstream link to a dropped socket. Re-applying the
    /// current variant changes nothing and runs no pass.
    pub fn set_string_mode(&mut self, id: NodeId, mode: StringMode) -> Result<(), GraphError> {
        let current = match self.graph.node(id)?.kind {
            NodeKind::String(current) => current,
            _ => return Err(GraphError::WrongKind(id)),
        };
        if current == mode {
            return Ok(());
        }
        let mut roots = self.graph.set_string_mode(id, mode)?;
        roots.insert(0, id);
        self.run(&roots);
        Ok(())
    }

    /// Edits an input socket's default value.
    ///
    /// Returns whether the stored value changed; writing the value the
    /// socket already holds triggers no recomputation at all.
    pub fn set_input_value(
        &mut self,
        id: NodeId,
        socket: &str,
        value: SocketValue,
    ) -> Result<bool, GraphError> {
        let changed = self.graph.write_input(id, socket, value)?;
        if changed {
            self.run(&[id]);
        }
        Ok(changed)
    }

    /// Binds a file node to a resource (or unbinds with `None`) and
    /// recomputes it. Re-binding the same resource is a no-op.
    pub fn bind_resource(
        &mut self,
        id: NodeId,
        resource: Option<ResourceId>,
    ) -> Result<(), GraphError> {
        if self.graph.bind_resource(id, resource)? {
            self.run(&[id]);
        }
        Ok(())
    }

    /// Tells the graph that an external resource changed.
    ///
    /// Every TextFileInput node bound to it recomputes in one shared pass.
    pub fn notify_resource_changed(&mut self, resource: &str) {
        let mut roots: Vec<NodeId> = self
            .graph
            .nodes
            .values()
            .filter(|n| {
                n.kind == NodeKind::TextFileInput && n.resource.as_deref() == Some(resource)
            })
            .map(|n| n.id)
            .collect();
        roots.sort_unstable();
        self.run(&roots);
    }

    /// The stored value of any socket, for display
    pub fn socket_value(
        &self,
        id: NodeId,
        direction: SocketDirection,
        socket: &str,
    ) -> Result<Option<SocketValue>, GraphError> {
        let node = self.graph.node(id)?;
        let sock = node
            .socket(direction, socket)
            .ok_or_else(|| GraphError::UnknownSocket {
                node: id,
                direction,
                name: socket.to_string(),
            })?;
        Ok(sock.value().cloned())
    }

    /// The resolved value an input currently reads, for display
    pub fn resolved_input(&self, id: NodeId, socket: &str) -> Result<Option<SocketValue>, GraphError> {
        let node = self.graph.node(id)?;
        node.input(socket).ok_or_else(|| GraphError::UnknownSocket {
            node: id,
            direction: SocketDirection::Input,
            name: socket.to_string(),
        })?;
        Ok(self.graph.input_value(id, socket))
    }

    fn run(&mut self, roots: &[NodeId]) {
        if roots.is_empty() {
            return;
        }
        self.engine
            .propagate(&mut self.graph, self.store.as_mut(), roots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::socket::DataType;
    use crate::resources::MemoryTextStore;

    fn runtime() -> GraphRuntime {
        GraphRuntime::new(Box::new(MemoryTextStore::new()))
    }

    fn runtime_with(resources: &[(&str, &str)]) -> GraphRuntime {
        let mut store = MemoryTextStore::new();
        for (id, text) in resources {
            store.insert(*id, *text);
        }
        GraphRuntime::new(Box::new(store))
    }

    fn output_of(rt: &GraphRuntime, id: NodeId, socket: &str) -> Option<SocketValue> {
        rt.socket_value(id, SocketDirection::Output, socket).unwrap()
    }

    #[test]
    fn test_edit_propagates_through_chain() {
        let mut rt = runtime();
        let a = rt.add_node(NodeKind::String(StringMode::New));
        let b = rt.add_node(NodeKind::String(StringMode::New));
        rt.connect(a, "String", b, "String").unwrap();

        rt.set_input_value(a, "String", SocketValue::from("hi")).unwrap();
        assert_eq!(output_of(&rt, b, "String"), Some(SocketValue::from("hi")));
    }

    #[test]
    fn test_noop_edit_short_circuits() {
        let mut rt = runtime();
        let a = rt.add_node(NodeKind::String(StringMode::New));
        let b = rt.add_node(NodeKind::String(StringMode::New));
        rt.connect(a, "String", b, "String").unwrap();
        rt.set_input_value(a, "String", SocketValue::from("hi")).unwrap();

        let passes = rt.passes();
        let changed = rt
            .set_input_value(a, "String", SocketValue::from("hi"))
            .unwrap();
        assert!(!changed);
        assert_eq!(rt.passes(), passes);
    }

    #[test]
    fn test_substring_guard_and_slicing() {
        let mut rt = runtime();
        let sub = rt.add_node(NodeKind::String(StringMode::Substring));

        // Zero step installed before the text arrives: output stays unset.
        rt.set_input_value(sub, "B:E:S", SocketValue::Int3([0, 5, 0]))
            .unwrap();
        rt.set_input_value(sub, "String", SocketValue::from("hello world"))
            .unwrap();
        assert_eq!(output_of(&rt, sub, "String"), None);

        rt.set_input_value(sub, "B:E:S", SocketValue::Int3([0, 5, 1]))
            .unwrap();
        assert_eq!(output_of(&rt, sub, "String"), Some(SocketValue::from("hello")));

        rt.set_input_value(sub, "B:E:S", SocketValue::Int3([6, 11, 1]))
            .unwrap();
        assert_eq!(output_of(&rt, sub, "String"), Some(SocketValue::from("world")));

        // Back to zero step: the last good output persists.
        rt.set_input_value(sub, "B:E:S", SocketValue::Int3([6, 11, 0]))
            .unwrap();
        assert_eq!(output_of(&rt, sub, "String"), Some(SocketValue::from("world")));
    }

    #[test]
    fn test_concatenate_absence_guard() {
        let mut rt = runtime();
        let cat = rt.add_node(NodeKind::String(StringMode::Concatenate));

        rt.set_input_value(cat, "String", SocketValue::from("foo")).unwrap();
        assert_eq!(output_of(&rt, cat, "String"), None);

        rt.set_input_value(cat, "String 2", SocketValue::from("bar")).unwrap();
        assert_eq!(output_of(&rt, cat, "String"), Some(SocketValue::from("foobar")));
        assert_eq!(rt.last_pass().times_computed(cat), 1);
        assert_eq!(rt.last_pass().writes, 1);
    }

    #[test]
    fn test_idempotent_mode_switch() {
        let mut rt = runtime();
        let node = rt.add_node(NodeKind::String(StringMode::New));
        rt.set_input_value(node, "String", SocketValue::from("keep")).unwrap();

        rt.set_string_mode(node, StringMode::Substring).unwrap();
        let first = rt.graph().nodes[&node].clone();
        let passes = rt.passes();

        rt.set_string_mode(node, StringMode::Substring).unwrap();
        assert_eq!(rt.graph().nodes[&node], first);
        assert_eq!(rt.passes(), passes);
        assert_eq!(
            rt.socket_value(node, SocketDirection::Input, "B:E:S").unwrap(),
            Some(SocketValue::Int3([0, 10, 1]))
        );
    }

    #[test]
    fn test_mode_switch_recomputes_under_new_schema() {
        let mut rt = runtime();
        let node = rt.add_node(NodeKind::String(StringMode::New));
        rt.set_input_value(node, "String", SocketValue::from("hello world"))
            .unwrap();
        assert_eq!(
            output_of(&rt, node, "String"),
            Some(SocketValue::from("hello world"))
        );

        // Substring keeps "String" (value included) and computes with the
        // default (0, 10, 1) triple right away.
        rt.set_string_mode(node, StringMode::Substring).unwrap();
        assert_eq!(
            output_of(&rt, node, "String"),
            Some(SocketValue::from("hello worl"))
        );
    }

    #[test]
    fn test_link_type_safety() {
        let mut rt = runtime();
        let src = rt.add_node(NodeKind::String(StringMode::New));
        let sub = rt.add_node(NodeKind::String(StringMode::Substring));

        let err = rt.connect(src, "String", sub, "B:E:S").unwrap_err();
        assert_eq!(
            err,
            GraphError::TypeMismatch {
                from: DataType::String,
                to: DataType::Int3,
            }
        );
        assert!(rt.graph().links.is_empty());
        assert_eq!(
            rt.socket_value(sub, SocketDirection::Input, "B:E:S").unwrap(),
            Some(SocketValue::Int3([0, 10, 1]))
        );
    }

    #[test]
    fn test_text_file_round_trip() {
        let mut rt = runtime_with(&[("in.txt", "xyz")]);
        let input = rt.add_node(NodeKind::TextFileInput);
        let output = rt.add_node(NodeKind::TextFileOutput);
        rt.connect(input, "Text", output, "Text").unwrap();

        rt.bind_resource(input, Some("in.txt".into())).unwrap();
        assert_eq!(output_of(&rt, input, "Text"), Some(SocketValue::from("xyz")));

        rt.bind_resource(output, Some("out.txt".into())).unwrap();
        assert_eq!(rt.store().read("out.txt"), Some("xyz".to_string()));
    }

    #[test]
    fn test_output_write_is_full_overwrite() {
        let mut rt = runtime_with(&[("out.txt", "previous longer text")]);
        let output = rt.add_node(NodeKind::TextFileOutput);
        rt.bind_resource(output, Some("out.txt".into())).unwrap();
        rt.set_input_value(output, "Text", SocketValue::from("abc")).unwrap();
        assert_eq!(rt.store().read("out.txt"), Some("abc".to_string()));
    }

    #[test]
    fn test_resource_change_notification() {
        let mut rt = runtime_with(&[("watched.txt", "v1")]);
        let input = rt.add_node(NodeKind::TextFileInput);
        let copy = rt.add_node(NodeKind::String(StringMode::New));
        rt.connect(input, "Text", copy, "String").unwrap();
        rt.bind_resource(input, Some("watched.txt".into())).unwrap();
        assert_eq!(output_of(&rt, copy, "String"), Some(SocketValue::from("v1")));

        rt.store_mut().write("watched.txt", "v2");
        rt.notify_resource_changed("watched.txt");
        assert_eq!(output_of(&rt, copy, "String"), Some(SocketValue::from("v2")));

        // Notifications about unrelated resources run no pass.
        let passes = rt.passes();
        rt.notify_resource_changed("other.txt");
        assert_eq!(rt.passes(), passes);
    }

    #[test]
    fn test_missing_resource_keeps_stale_output() {
        let mut rt = runtime_with(&[("in.txt", "data")]);
        let input = rt.add_node(NodeKind::TextFileInput);
        rt.bind_resource(input, Some("in.txt".into())).unwrap();
        assert_eq!(output_of(&rt, input, "Text"), Some(SocketValue::from("data")));

        // Rebinding to a resource that does not exist withholds computation,
        // so the last good output persists.
        rt.bind_resource(input, Some("missing.txt".into())).unwrap();
        assert_eq!(output_of(&rt, input, "Text"), Some(SocketValue::from("data")));
    }

    #[test]
    fn test_rebind_triggers_recompute() {
        let mut rt = runtime_with(&[("a.txt", "aaa"), ("b.txt", "bbb")]);
        let input = rt.add_node(NodeKind::TextFileInput);
        rt.bind_resource(input, Some("a.txt".into())).unwrap();
        assert_eq!(output_of(&rt, input, "Text"), Some(SocketValue::from("aaa")));

        rt.bind_resource(input, Some("b.txt".into())).unwrap();
        assert_eq!(output_of(&rt, input, "Text"), Some(SocketValue::from("bbb")));

        // Binding the same resource again runs no pass.
        let passes = rt.passes();
        rt.bind_resource(input, Some("b.txt".into())).unwrap();
        assert_eq!(rt.passes(), passes);
    }

    #[test]
    fn test_disconnect_falls_back_to_default() {
        let mut rt = runtime();
        let a = rt.add_node(NodeKind::String(StringMode::New));
        let b = rt.add_node(NodeKind::String(StringMode::New));
        rt.set_input_value(b, "String", SocketValue::from("default")).unwrap();
        rt.connect(a, "String", b, "String").unwrap();
        rt.set_input_value(a, "String", SocketValue::from("linked")).unwrap();
        assert_eq!(output_of(&rt, b, "String"), Some(SocketValue::from("linked")));

        rt.disconnect(a, "String", b, "String").unwrap();
        assert_eq!(output_of(&rt, b, "String"), Some(SocketValue::from("default")));
        assert_eq!(
            rt.disconnect(a, "String", b, "String").unwrap_err(),
            GraphError::LinkNotFound
        );
    }

    #[test]
    fn test_remove_node_recomputes_dependents() {
        let mut rt = runtime();
        let a = rt.add_node(NodeKind::String(StringMode::New));
        let b = rt.add_node(NodeKind::String(StringMode::New));
        rt.set_input_value(b, "String", SocketValue::from("own")).unwrap();
        rt.connect(a, "String", b, "String").unwrap();
        rt.set_input_value(a, "String", SocketValue::from("up")).unwrap();
        assert_eq!(output_of(&rt, b, "String"), Some(SocketValue::from("up")));

        rt.remove_node(a).unwrap();
        assert_eq!(output_of(&rt, b, "String"), Some(SocketValue::from("own")));
        assert_eq!(rt.remove_node(a).unwrap_err(), GraphError::UnknownNode(a));
    }

    #[test]
    fn test_resolved_input_follows_link_state() {
        let mut rt = runtime();
        let a = rt.add_node(NodeKind::String(StringMode::New));
        let b = rt.add_node(NodeKind::String(StringMode::New));
        rt.set_input_value(b, "String", SocketValue::from("fallback")).unwrap();
        assert_eq!(
            rt.resolved_input(b, "String").unwrap(),
            Some(SocketValue::from("fallback"))
        );

        rt.connect(a, "String", b, "String").unwrap();
        // Linked but upstream unset: resolves to absent, not the default.
        assert_eq!(rt.resolved_input(b, "String").unwrap(), None);

        assert!(matches!(
            rt.resolved_input(b, "Nope").unwrap_err(),
            GraphError::UnknownSocket { .. }
        ));
    }
}
