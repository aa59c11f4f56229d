//! Unweighted shortest path via breadth-first search.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::algorithms::view::GraphView;
use crate::core::ids::NodeId;

/// The shortest path from `source` to `target` by edge count, or `None` if
/// no path exists (including when either endpoint does not exist).
///
/// Returns the full path including both endpoints. A source equal to the
/// target returns a single-element path, if the node exists.
pub fn shortest_path_unweighted(
    view: &impl GraphView,
    source: &NodeId,
    target: &NodeId,
) -> Option<Vec<NodeId>> {
    if !view.has_node(source) || !view.has_node(target) {
        return None;
    }
    if source == target {
        return Some(vec![source.clone()]);
    }

    let mut predecessor: IndexMap<NodeId, NodeId> = IndexMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(source.clone());
    predecessor.insert(source.clone(), source.clone());

    while let Some(current) = queue.pop_front() {
        for next in view.successors(&current) {
            if predecessor.contains_key(&next) {
                continue;
            }
            predecessor.insert(next.clone(), current.clone());
            if next == *target {
                return Some(reconstruct(&predecessor, source, target));
            }
            queue.push_back(next);
        }
    }
    None
}

fn reconstruct(
    predecessor: &IndexMap<NodeId, NodeId>,
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

    #[test]
    fn finds_shortest_of_two_paths() {
        let mut g = Graph::new();
        for id in ["a", "b", "c", "d"] {
            g.add_node(id, Attributes::new(), 1);
        }
        g.add_edge("e1", "a", "b", Attributes::new(), 1);
        g.add_edge("e2", "b", "d", Attributes::new(), 1);
        g.add_edge("e3", "a", "c", Attributes::new(), 1);
        g.add_edge("e4", "c", "d", Attributes::new(), 1);
        g.add_edge("e5", "a", "d", Attributes::new(), 1);

        let path = shortest_path_unweighted(&g, &NodeId::from("a"), &NodeId::from("d")).unwrap();
        assert_eq!(path, vec![NodeId::from("a"), NodeId::from("d")]);
    }

    #[test]
    fn no_path_returns_none() {
        let mut g = Graph::new();
        g.add_node("a", Attributes::new(), 1);
        g.add_node("b", Attributes::new(), 1);
        assert_eq!(
            shortest_path_unweighted(&g, &NodeId::from("a"), &NodeId::from("b")),
            None
        );
    }
}
