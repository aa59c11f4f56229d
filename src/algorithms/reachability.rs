//! Plain (non-temporal) reachability.

use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::algorithms::view::GraphView;
use crate::core::graph::Graph;
use crate::core::ids::NodeId;
use crate::core::snapshot::Snapshot;

/// Whether `target` is reachable from `source` by following zero or more
/// outgoing edges, via breadth-first search.
///
/// A node is reachable from itself (zero-length path). If `source` does
/// not exist, the result is `false` rather than an error.
pub fn is_reachable(view: &impl GraphView, source: &NodeId, target: &NodeId) -> bool {
    if source == target {
        return view.has_node(source);
    }
    if !view.has_node(source) {
        return false;
    }

    let mut visited: IndexSet<NodeId> = IndexSet::new();
    let mut queue = VecDeque::new();
    visited.insert(source.clone());
    queue.push_back(source.clone());

    while let Some(current) = queue.pop_front() {
        for next in view.successors(&current) {
            if next == *target {
                return true;
            }
            if visited.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Whether `target` is reachable from `source` as of `timestamp`,
/// equivalent to `is_reachable(&Snapshot::at(graph, timestamp), source,
/// target)` but without requiring the caller to build the snapshot first.
pub fn is_reachable_at(graph: &Graph, source: &NodeId, target: &NodeId, timestamp: i64) -> bool {
    is_reachable(&Snapshot::at(graph, timestamp), source, target)
}
