//! Weighted shortest path via Dijkstra's algorithm.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::algorithms::view::GraphView;
use crate::core::ids::NodeId;
use crate::util::parse_weight;

#[derive(Clone, Debug, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap`, a max-heap, pops the smallest cost
        // first. `parse_weight` already rejects NaN and infinities, so
        // `partial_cmp` is total in practice.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// The cheapest path from `source` to `target` by summed edge weight,
/// where each edge's weight is parsed out of its `weight_attr` attribute.
///
/// An edge missing `weight_attr`, or whose value does not parse as a
/// finite number, is skipped rather than treated as an error.
/// When several edges connect the same pair of nodes,
/// Dijkstra's relaxation step naturally picks the cheapest one — no
/// special-casing for parallel edges is needed.
///
/// Returns `None` if no path exists or either endpoint does not exist.
pub fn shortest_path_weighted(
    view: &impl GraphView,
    source: &NodeId,
    target: &NodeId,
    weight_attr: &str,
) -> Option<(f64, Vec<NodeId>)> {
    if !view.has_node(source) || !view.has_node(target) {
        return None;
    }
    if source == target {
        return Some((0.0, vec![source.clone()]));
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut predecessor: HashMap<NodeId, NodeId> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source.clone(), 0.0);
    heap.push(HeapEntry {
        cost: 0.0,
        node: source.clone(),
    });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if target == &node {
            return Some((cost, reconstruct(&predecessor, source, target)));
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        for edge_id in view.outgoing_edges(&node) {
            let Some(edge) = view.edge(edge_id) else {
                continue;
            };
            let Some(weight) = edge
                .attributes
                .get(weight_attr)
                .and_then(|raw| parse_weight(raw))
            else {
                continue;
            };
            let next_cost = cost + weight;
            if next_cost < *dist.get(&edge.to).unwrap_or(&f64::INFINITY) {
                dist.insert(edge.to.clone(), next_cost);
                predecessor.insert(edge.to.clone(), node.clone());
                heap.push(HeapEntry {
                    cost: next_cost,
                    node: edge.to.clone(),
                });
            }
        }
    }
    None
}

fn reconstruct(
    predecessor: &HashMap<NodeId, NodeId>,
    source: &NodeId,
    target: &NodeId,
) -> Vec<NodeId> {
    let mut path = vec![target.clone()];
    let mut current = target.clone();
    while current != *source {
        current = predecessor[&current].clone();
        path.push(current.clone());
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::Attributes;
    use crate::core::graph::Graph;

    fn weighted(weight: &str) -> Attributes {
        [("weight".to_string(), weight.to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn picks_the_cheaper_of_two_routes() {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_node(id, Attributes::new(), 1);
        }
        g.add_edge("e1", "a", "b", weighted("1"), 1);
        g.add_edge("e2", "b", "d", weighted("1"), 1);
        g.add_edge("e3", "a", "d", weighted("10"), 1);

        let (cost, path) =
            shortest_path_weighted(&g, &NodeId::from("a"), &NodeId::from("d"), "weight").unwrap();
        assert_eq!(cost, 2.0);
        assert_eq!(path, vec![NodeId::from("a"), NodeId::from("b"), NodeId::from("d")]);
    }

    #[test]
    fn parallel_edges_use_the_cheaper_one() {
        let mut g = Graph::new();
        g.add_node("a", Attributes::new(), 1);
        g.add_node("b", Attributes::new(), 1);
        g.add_edge("e1", "a", "b", weighted("5"), 1);
        g.add_edge("e2", "a", "b", weighted("2"), 1);

        let (cost, _) =
            shortest_path_weighted(&g, &NodeId::from("a"), &NodeId::from("b"), "weight").unwrap();
        assert_eq!(cost, 2.0);
    }

    #[test]
    fn unparseable_weight_skips_the_edge() {
        let mut g = Graph::new();
        g.add_node("a", Attributes::new(), 1);
        g.add_node("b", Attributes::new(), 1);
        g.add_edge("e1", "a", "b", weighted("not-a-number"), 1);

        assert_eq!(
            shortest_path_weighted(&g, &NodeId::from("a"), &NodeId::from("b"), "weight"),
            None
        );
    }
}
