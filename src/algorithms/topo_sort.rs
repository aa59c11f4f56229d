//! Topological ordering via Kahn's algorithm.

use std::collections::{BTreeSet, HashMap};

use crate::algorithms::view::GraphView;
use crate::core::ids::NodeId;

/// A topological ordering of every live node, or `None` if the graph
/// contains a cycle (including a self-loop).
///
/// Ties are broken by node id, so the result is deterministic regardless
/// of the underlying storage's iteration order.
pub fn topological_sort(view: &impl GraphView) -> Option<Vec<NodeId>> {
    let mut in_degree: HashMap<NodeId, usize> =
        view.node_ids().map(|id| (id.clone(), 0)).collect();
    for id in view.node_ids() {
        for successor in view.successors(id) {
            if let Some(degree) = in_degree.get_mut(&successor) {
                *degree += 1;
            }
        }
    }

    let mut ready: BTreeSet<NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| id.clone())
        .collect();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(current) = ready.pop_first() {
        order.push(current.clone());
        for successor in view.successors(&current) {
            if let Some(degree) = in_degree.get_mut(&successor) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(successor);
                }
            }
        }
    }

    if order.len() == in_degree.len() {
        Some(order)
    } else {
        None
    }
}
