//! Push-based propagation engine
//!
//! After any triggering edit the engine recomputes the affected nodes and
//! pushes change notifications downstream: a node's compute runs, and every
//! output whose stored value actually changed recurses into its dependents
//! over valid links. A per-pass visited set guarantees each node computes at
//! most once per pass, even with fan-in, and unchanged outputs cut the
//! recursion off early.
//!
//! This is a single forward pass, not a topological batch evaluator; it is
//! correct because the graph rejects cycle-closing links at connect time.

use log::debug;
use std::collections::{HashMap, HashSet};

use super::graph::NodeGraph;
use super::node::{NodeId, NodeKind};
use super::socket::SocketValue;
use super::{file, string};
use crate::resources::TextStore;

/// Snapshot of a node's resolved input values, taken before its compute runs.
///
/// Only present (non-absent) values appear; compute routines treat a missing
/// entry as an absent input and withhold where they require it.
#[derive(Debug, Clone, Default)]
pub struct NodeInputs {
    values: HashMap<String, SocketValue>,
}

impl NodeInputs {
    /// Resolves every input socket of a node through the graph
    pub fn collect(graph: &NodeGraph, id: NodeId) -> Self {
        let mut values = HashMap::new();
        if let Some(node) = graph.nodes.get(&id) {
            for sock in &node.inputs {
                if let Some(value) = graph.input_value(id, &sock.name) {
                    values.insert(sock.name.clone(), value);
                }
            }
        }
        Self { values }
    }

    /// Builds a snapshot directly from name/value pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, SocketValue)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// The raw value of an input, if present
    pub fn get(&self, name: &str) -> Option<&SocketValue> {
        self.values.get(name)
    }

    /// The input as a string, if present and of String type
    pub fn string(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_str())
    }

    /// The input as an integer triple, if present and of Int3 type
    pub fn int3(&self, name: &str) -> Option<[i32; 3]> {
        self.values.get(name).and_then(|v| v.as_int3())
    }
}

/// Counters describing one propagation pass
#[derive(Debug, Clone, Default)]
pub struct PassStats {
    /// Number of nodes the pass was seeded with
    pub roots: usize,
    /// Nodes that ran their compute routine, in visit order
    pub computed: Vec<NodeId>,
    /// Output socket writes that changed an observable value
    pub writes: usize,
}

impl PassStats {
    /// How often a node computed during the pass (0 or 1 by construction)
    pub fn times_computed(&self, id: NodeId) -> usize {
        self.computed.iter().filter(|&&n| n == id).count()
    }
}

/// Propagation engine driving node recomputation
#[derive(Debug, Default)]
pub struct PropagationEngine {
    last_pass: PassStats,
    passes: u64,
}

impl PropagationEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of the most recent pass
    pub fn last_pass(&self) -> &PassStats {
        &self.last_pass
    }

    /// Total number of passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Runs one propagation pass seeded with the given nodes.
    ///
    /// Each root is computed and its changed outputs are pushed downstream.
    /// A single visited set spans all roots, so a node reachable from
    /// several roots still computes only once.
    pub fn propagate(&mut self, graph: &mut NodeGraph, store: &mut dyn TextStore, roots: &[NodeId]) {
        self.passes += 1;
        let mut stats = PassStats {
            roots: roots.len(),
            ..PassStats::default()
        };
        let mut visited = HashSet::new();
        for &root in roots {
            visit(graph, store, &mut visited, &mut stats, root);
        }
        debug!(
            "pass {}: {} roots, {} computed, {} writes",
            self.passes,
            stats.roots,
            stats.computed.len(),
            stats.writes
        );
        self.last_pass = stats;
    }
}

fn visit(
    graph: &mut NodeGraph,
    store: &mut dyn TextStore,
    visited: &mut HashSet<NodeId>,
    stats: &mut PassStats,
    id: NodeId,
) {
    if !visited.insert(id) {
        return;
    }
    if !graph.nodes.contains_key(&id) {
        return;
    }

    let changed = compute_node(graph, store, stats, id);
    stats.computed.push(id);

    for socket in changed {
        for dependent in graph.dependents_of_output(id, &socket) {
            visit(graph, store, visited, stats, dependent);
        }
    }
}

/// Runs one node's compute routine and applies its output writes.
///
/// Returns the names of output sockets whose value changed.
fn compute_node(
    graph: &mut NodeGraph,
    store: &mut dyn TextStore,
    stats: &mut PassStats,
    id: NodeId,
) -> Vec<String> {
    let Some(node) = graph.nodes.get(&id) else {
        return Vec::new();
    };
    let inputs = NodeInputs::collect(graph, id);
    let writes = match node.kind {
        NodeKind::String(mode) => string::logic::compute(mode, &inputs),
        NodeKind::TextFileInput => file::input::compute(node.resource.as_deref(), store),
        NodeKind::TextFileOutput => {
            file::output::compute(&inputs, node.resource.as_deref(), store);
            Vec::new()
        }
    };

    let mut changed = Vec::new();
    if let Some(node) = graph.nodes.get_mut(&id) {
        for (name, value) in writes {
            match node.output_mut(&name) {
                Some(sock) => {
                    if sock.write(value, false) {
                        stats.writes += 1;
                        changed.push(name);
                    }
                }
                None => log::warn!("node {} has no output named \"{}\"", id, name),
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::string::StringMode;
    use crate::resources::MemoryTextStore;

    fn chain() -> (NodeGraph, NodeId, NodeId, NodeId) {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(NodeKind::String(StringMode::New));
        let b = graph.add_node(NodeKind::String(StringMode::New));
        let c = graph.add_node(NodeKind::String(StringMode::New));
        graph.connect(a, "String", b, "String").unwrap();
        graph.connect(b, "String", c, "String").unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn test_chain_propagates_in_one_pass() {
        let (mut graph, a, _, c) = chain();
        let mut store = MemoryTextStore::new();
        let mut engine = PropagationEngine::new();

        graph.write_input(a, "String", SocketValue::from("hi")).unwrap();
        engine.propagate(&mut graph, &mut store, &[a]);

        assert_eq!(engine.last_pass().computed.len(), 3);
        assert_eq!(
            graph.nodes[&c].output("String").unwrap().value(),
            Some(&SocketValue::from("hi"))
        );
    }

    #[test]
    fn test_unchanged_output_stops_recursion() {
        let (mut graph, a, b, c) = chain();
        let mut store = MemoryTextStore::new();
        let mut engine = PropagationEngine::new();

        graph.write_input(a, "String", SocketValue::from("hi")).unwrap();
        engine.propagate(&mut graph, &mut store, &[a]);

        // Same value again: node a recomputes, writes nothing new, and the
        // pass ends there.
        engine.propagate(&mut graph, &mut store, &[a]);
        assert_eq!(engine.last_pass().computed, vec![a]);
        assert_eq!(engine.last_pass().writes, 0);
        assert_eq!(engine.last_pass().times_computed(b), 0);
        assert_eq!(engine.last_pass().times_computed(c), 0);
    }

    #[test]
    fn test_fan_in_computes_once_per_pass() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(NodeKind::String(StringMode::New));
        let left = graph.add_node(NodeKind::String(StringMode::New));
        let right = graph.add_node(NodeKind::String(StringMode::New));
        let sink = graph.add_node(NodeKind::String(StringMode::Concatenate));
        graph.connect(src, "String", left, "String").unwrap();
        graph.connect(src, "String", right, "String").unwrap();
        graph.connect(left, "String", sink, "String").unwrap();
        graph.connect(right, "String", sink, "String 2").unwrap();

        let mut store = MemoryTextStore::new();
        let mut engine = PropagationEngine::new();
        graph.write_input(src, "String", SocketValue::from("x")).unwrap();
        engine.propagate(&mut graph, &mut store, &[src]);

        assert_eq!(engine.last_pass().times_computed(sink), 1);
        assert_eq!(engine.last_pass().times_computed(src), 1);
        assert_eq!(engine.last_pass().computed.len(), 4);
    }

    #[test]
    fn test_multi_root_pass_shares_visited_set() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(NodeKind::String(StringMode::New));
        let b = graph.add_node(NodeKind::String(StringMode::New));
        graph.connect(a, "String", b, "String").unwrap();
        graph.write_input(a, "String", SocketValue::from("v")).unwrap();

        let mut store = MemoryTextStore::new();
        let mut engine = PropagationEngine::new();
        engine.propagate(&mut graph, &mut store, &[a, b]);
        assert_eq!(engine.last_pass().times_computed(b), 1);
        assert_eq!(engine.last_pass().roots, 2);
    }

    #[test]
    fn test_vanished_root_is_skipped() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(NodeKind::String(StringMode::New));
        graph.remove_node(a).unwrap();

        let mut store = MemoryTextStore::new();
        let mut engine = PropagationEngine::new();
        engine.propagate(&mut graph, &mut store, &[a]);
        assert!(engine.last_pass().computed.is_empty());
    }
}
