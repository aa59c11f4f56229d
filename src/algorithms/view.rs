//! The shared read-only surface every graph algorithm is written against.
//!
//! Rather than hand-writing BFS/Dijkstra/etc. twice — once for a live
//! [`crate::core::graph::Graph`] and once for a point-in-time
//! [`crate::core::snapshot::Snapshot`] — both implement one trait and every
//! algorithm in this module is written against it exactly once.

use std::collections::hash_map::Keys;
use std::collections::HashMap;

use crate::core::graph::{Edge, Node};
use crate::core::ids::{EdgeId, NodeId};

/// Read-only access to a materialized graph state, independent of whether
/// that state is the live tip of a [`crate::core::graph::Graph`] or a
/// replayed [`crate::core::snapshot::Snapshot`].
pub trait GraphView {
    /// The currently live nodes.
    fn nodes(&self) -> &HashMap<NodeId, Node>;
    /// The currently live edges.
    fn edges(&self) -> &HashMap<EdgeId, Edge>;
    /// Outgoing adjacency: node id -> the edge ids leaving it.
    fn outgoing(&self) -> &HashMap<NodeId, Vec<EdgeId>>;
    /// Incoming adjacency: node id -> the edge ids arriving at it.
    fn incoming(&self) -> &HashMap<NodeId, Vec<EdgeId>>;

    /// Whether `id` names a currently live node.
    fn has_node(&self, id: &NodeId) -> bool {
        self.nodes().contains_key(id)
    }

    /// Look up a live edge by id.
    fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges().get(id)
    }

    /// The edge ids leaving `id`, or an empty slice if `id` has none (or
    /// does not exist).
    fn outgoing_edges(&self, id: &NodeId) -> &[EdgeId] {
        self.outgoing()
            .get(id)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// The edge ids arriving at `id`, or an empty slice if `id` has none
    /// (or does not exist).
    fn incoming_edges(&self, id: &NodeId) -> &[EdgeId] {
        self.incoming()
            .get(id)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Every live node id.
    fn node_ids(&self) -> Keys<'_, NodeId, Node> {
        self.nodes().keys()
    }

    /// The live neighbor node ids reachable by following one outgoing edge
    /// from `id`, in adjacency order. An edge to a since-deleted node is
    /// silently skipped.
    fn successors(&self, id: &NodeId) -> Vec<NodeId> {
        self.outgoing_edges(id)
            .iter()
            .filter_map(|edge_id| self.edge(edge_id))
            .map(|edge| edge.to.clone())
            .collect()
    }

    /// The live neighbor node ids reachable by following one outgoing or
    /// incoming edge from `id` (i.e. treating edges as undirected), in
    /// outgoing-then-incoming adjacency order.
    fn neighbors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut result: Vec<NodeId> = self.successors(id);
        let predecessors = self
            .incoming_edges(id)
            .iter()
            .filter_map(|edge_id| self.edge(edge_id))
            .map(|edge| edge.from.clone());
        result.extend(predecessors);
        result
    }
}
