//! Time-respecting reachability: is there a path along which edges were
//! created in non-decreasing order?

use std::collections::VecDeque;

use crate::algorithms::view::GraphView;
use crate::core::ids::NodeId;

/// Whether `target` is reachable from `source` by a path whose edges'
/// `created_timestamp`s are non-decreasing when followed in order —
/// i.e. a path that could plausibly have been "travelled" forward in
/// time, not merely one that exists in the graph's topology.
///
/// Differs from [`crate::algorithms::reachability::is_reachable`] by
/// tracking, for each visited node, the *smallest* last-edge timestamp
/// known to reach it, and only continuing along an edge whose own
/// timestamp is greater than or equal to that. A smaller last-edge
/// timestamp is strictly more permissive for everything that follows
/// (the constraint on the next edge is `>=` it), so the smallest arrival
/// value reachable at a node dominates every larger one and is the only
/// one worth keeping — a node is re-queued only when a path improves on
/// it.
pub fn is_time_respecting_reachable(
    view: &impl GraphView,
    source: &NodeId,
    target: &NodeId,
) -> bool {
    if source == target {
        return view.has_node(source);
    }
    if !view.has_node(source) {
        return false;
    }

    // (node, smallest last-edge timestamp known to reach it)
    let mut best_arrival: std::collections::HashMap<NodeId, i64> = std::collections::HashMap::new();
    best_arrival.insert(source.clone(), i64::MIN);
    let mut queue = VecDeque::new();
    queue.push_back(source.clone());

    while let Some(current) = queue.pop_front() {
        let arrival = best_arrival[&current];
        for edge_id in view.outgoing_edges(&current) {
            let Some(edge) = view.edge(edge_id) else {
                continue;
            };
            if edge.created_timestamp < arrival {
                continue;
            }
            if edge.to == *target {
                return true;
            }
            let improves = match best_arrival.get(&edge.to) {
                Some(existing) => edge.created_timestamp < *existing,
                None => true,
            };
            if improves {
                best_arrival.insert(edge.to.clone(), edge.created_timestamp);
                queue.push_back(edge.to.clone());
            }
        }
    }
    false
}
