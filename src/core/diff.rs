//! The symmetric difference between a graph's state at two timestamps.

use tracing::instrument;

use crate::algorithms::view::GraphView;
use crate::core::graph::{Edge, Graph, Node};
use crate::core::ids::{EdgeId, NodeId};
use crate::core::snapshot::Snapshot;

/// One node whose attributes differ between the two timestamps being
/// diffed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatedNode {
    /// The node's state at `t1`.
    pub before: Node,
    /// The node's state at `t2`.
    pub after: Node,
}

/// One edge whose attributes (or endpoints) differ between the two
/// timestamps being diffed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatedEdge {
    /// The edge's state at `t1`.
    pub before: Edge,
    /// The edge's state at `t2`.
    pub after: Edge,
}

/// Nodes and edges added, removed, or updated between two points in time.
///
/// Every field is sorted by id, so the result is deterministic regardless
/// of the hash-map iteration order of the underlying snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    /// Nodes present at `t2` but not at `t1`.
    pub nodes_added: Vec<NodeId>,
    /// Nodes present at `t1` but not at `t2`.
    pub nodes_removed: Vec<NodeId>,
    /// Nodes present at both timestamps whose attributes differ, paired
    /// before/after.
    pub nodes_updated: Vec<UpdatedNode>,
    /// Edges present at `t2` but not at `t1`.
    pub edges_added: Vec<EdgeId>,
    /// Edges present at `t1` but not at `t2`.
    pub edges_removed: Vec<EdgeId>,
    /// Edges present at both timestamps whose attributes (or endpoints)
    /// differ, paired before/after.
    pub edges_updated: Vec<UpdatedEdge>,
}

impl Diff {
    /// Compute the diff between `graph`'s state at `t1` and at `t2`.
    #[instrument(skip(graph))]
    pub fn compute(graph: &Graph, t1: i64, t2: i64) -> Self {
        let before = Snapshot::at(graph, t1);
        let after = Snapshot::at(graph, t2);
        Self::between(&before, &after)
    }

    /// Compute the diff between two already-built views, which need not
    /// both be [`Snapshot`]s — either side may be the live tip [`Graph`].
    pub fn between(before: &impl GraphView, after: &impl GraphView) -> Self {
        let mut nodes_added = Vec::new();
        let mut nodes_updated = Vec::new();
        for (id, node) in after.nodes() {
            match before.nodes().get(id) {
                None => nodes_added.push(id.clone()),
                Some(prior) if prior.attributes != node.attributes => {
                    nodes_updated.push(UpdatedNode {
                        before: prior.clone(),
                        after: node.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        let mut nodes_removed: Vec<NodeId> = before
            .nodes()
            .keys()
            .filter(|id| !after.nodes().contains_key(*id))
            .cloned()
            .collect();

        let mut edges_added = Vec::new();
        let mut edges_updated = Vec::new();
        for (id, edge) in after.edges() {
            match before.edges().get(id) {
                None => edges_added.push(id.clone()),
                Some(prior)
                    if prior.attributes != edge.attributes
                        || prior.from != edge.from
                        || prior.to != edge.to =>
                {
                    edges_updated.push(UpdatedEdge {
                        before: prior.clone(),
                        after: edge.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        let mut edges_removed: Vec<EdgeId> = before
            .edges()
            .keys()
            .filter(|id| !after.edges().contains_key(*id))
            .cloned()
            .collect();

        nodes_added.sort();
        nodes_removed.sort();
        nodes_updated.sort_by(|a, b| a.after.id.cmp(&b.after.id));
        edges_added.sort();
        edges_removed.sort();
        edges_updated.sort_by(|a, b| a.after.id.cmp(&b.after.id));

        Self {
            nodes_added,
            nodes_removed,
            nodes_updated,
            edges_added,
            edges_removed,
            edges_updated,
        }
    }

    /// Whether this diff records no changes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes_added.is_empty()
            && self.nodes_removed.is_empty()
            && self.nodes_updated.is_empty()
            && self.edges_added.is_empty()
            && self.edges_removed.is_empty()
            && self.edges_updated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::Attributes;

    #[test]
    fn diff_detects_add_remove_and_update() {
        let mut g = Graph::new();
        g.add_node("n1", Attributes::new(), 1);
        g.add_node("n2", Attributes::new(), 1);
        g.add_node(
            "n3",
            [("color".to_string(), "red".to_string())]
                .into_iter()
                .collect(),
            1,
        );

        g.del_node("n2", 2);
        g.update_node(
            "n3",
            [("color".to_string(), "blue".to_string())]
                .into_iter()
                .collect(),
            2,
        );
        g.add_node("n4", Attributes::new(), 2);

        let diff = g.diff(1, 2);
        assert_eq!(diff.nodes_added, vec![NodeId::from("n4")]);
        assert_eq!(diff.nodes_removed, vec![NodeId::from("n2")]);
        assert_eq!(diff.nodes_updated.len(), 1);
        assert_eq!(diff.nodes_updated[0].before.id, NodeId::from("n3"));
        assert_eq!(
            diff.nodes_updated[0].before.attributes.get("color"),
            Some(&"red".to_string())
        );
        assert_eq!(
            diff.nodes_updated[0].after.attributes.get("color"),
            Some(&"blue".to_string())
        );
    }

    #[test]
    fn identical_timestamps_yield_empty_diff() {
        let mut g = Graph::new();
        g.add_node("n1", Attributes::new(), 1);
        assert!(g.diff(5, 5).is_empty());
    }
}
