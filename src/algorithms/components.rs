//! Weakly and strongly connected components.

use std::collections::HashSet;

use crate::algorithms::view::GraphView;
use crate::core::ids::NodeId;

/// The graph's weakly connected components: maximal sets of nodes
/// connected when edges are treated as undirected.
///
/// Each component's members are sorted by id, and components are sorted
/// by their first member, for a deterministic result regardless of the
/// underlying storage's iteration order.
pub fn weakly_connected_components(view: &impl GraphView) -> Vec<Vec<NodeId>> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut node_ids: Vec<NodeId> = view.node_ids().cloned().collect();
    node_ids.sort();

    let mut components = Vec::new();
    for start in &node_ids {
        if visited.contains(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start.clone()];
        visited.insert(start.clone());
        while let Some(current) = stack.pop() {
            component.push(current.clone());
            let mut neighbors = view.neighbors(&current);
            neighbors.sort();
            for neighbor in neighbors {
                if visited.insert(neighbor.clone()) {
                    stack.push(neighbor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components.sort();
    components
}

/// The graph's strongly connected components, via Kosaraju's algorithm:
/// a post-order DFS pass over the graph followed by a DFS pass over its
/// transpose in reverse finish order. Both passes are iterative (an
/// explicit stack rather than recursion) so that a long chain does not
/// overflow the call stack.
///
/// Each component's members are sorted by id, and components are sorted
/// by their first member.
pub fn strongly_connected_components(view: &impl GraphView) -> Vec<Vec<NodeId>> {
    let mut node_ids: Vec<NodeId> = view.node_ids().cloned().collect();
    node_ids.sort();

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut finish_order: Vec<NodeId> = Vec::with_capacity(node_ids.len());
    for start in &node_ids {
        if visited.contains(start) {
            continue;
        }
        let mut stack = vec![(start.clone(), false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                finish_order.push(node);
                continue;
            }
            if !visited.insert(node.clone()) {
                continue;
            }
            stack.push((node.clone(), true));
            let mut successors = view.successors(&node);
            successors.sort();
            for successor in successors {
                if !visited.contains(&successor) {
                    stack.push((successor, false));
                }
            }
        }
    }

    let mut visited2: HashSet<NodeId> = HashSet::new();
    let mut components = Vec::new();
    for node in finish_order.into_iter().rev() {
        if visited2.contains(&node) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![node.clone()];
        visited2.insert(node.clone());
        while let Some(current) = stack.pop() {
            component.push(current.clone());
            let mut predecessors: Vec<NodeId> = view
                .incoming_edges(&current)
                .iter()
                .filter_map(|edge_id| view.edge(edge_id))
                .map(|edge| edge.from.clone())
                .collect();
            predecessors.sort();
            for predecessor in predecessors {
                if visited2.insert(predecessor.clone()) {
                    stack.push(predecessor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components.sort();
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::Attributes;
    use crate::core::graph::Graph;

    #[test]
    fn weakly_connected_ignores_direction() {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_node(id, Attributes::new(), 1);
        }
        g.add_edge("e1", "a", "b", Attributes::new(), 1);
        g.add_edge("e2", "c", "b", Attributes::new(), 1);

        let components = weakly_connected_components(&g);
        assert_eq!(components.len(), 2);
        assert_eq!(
            components[0],
            vec![NodeId::from("a"), NodeId::from("b"), NodeId::from("c")]
        );
        assert_eq!(components[1], vec![NodeId::from("d")]);
    }

    #[test]
    fn strongly_connected_requires_a_cycle() {
        let mut g = Graph::new();
        for id in ["a", "b", "c"] {
            g.add_node(id, Attributes::new(), 1);
        }
        g.add_edge("e1", "a", "b", Attributes::new(), 1);
        g.add_edge("e2", "b", "a", Attributes::new(), 1);
        g.add_edge("e3", "b", "c", Attributes::new(), 1);

        let components = strongly_connected_components(&g);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], vec![NodeId::from("a"), NodeId::from("b")]);
        assert_eq!(components[1], vec![NodeId::from("c")]);
    }
}
