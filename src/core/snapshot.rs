//! Point-in-time views of a [`crate::core::graph::Graph`].

use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::algorithms::view::GraphView;
use crate::core::graph::{Edge, Graph, GraphState, Node};
use crate::core::ids::{EdgeId, NodeId};

/// The materialized graph as of some timestamp `T`: every node and edge
/// whose lifetime (creation through any later deletion) covers `T`.
///
/// Built by seeking to the latest checkpoint whose own timestamp is at or
/// before `T` and replaying the remaining log, applying only events whose
/// timestamp is at or before `T`. Replay filters by `event.timestamp`, not
/// by the event's position in the log — timestamps are caller-supplied
/// and are not required to be monotonic with respect to append order, so
/// a later-appended event can carry an earlier timestamp than one
/// appended before it.
///
/// Using a checkpoint as a replay seed is an optimization that assumes
/// timestamps are close to monotonic with append order; for a log with
/// wildly out-of-order timestamps interleaved across a checkpoint boundary,
/// replaying strictly from the beginning is the only way to guarantee
/// exactness. Accepted as a documented approximation for the workloads
/// this crate targets.
#[derive(Clone, Debug)]
pub struct Snapshot {
    timestamp: i64,
    state: GraphState,
}

impl Snapshot {
    /// Construct the snapshot of `graph` as it stood at `timestamp`.
    #[instrument(skip(graph))]
    pub fn at(graph: &Graph, timestamp: i64) -> Self {
        let seed_index = graph
            .checkpoints()
            .iter()
            .rev()
            .find(|checkpoint| checkpoint.timestamp <= timestamp)
            .map(|checkpoint| (checkpoint.event_index, checkpoint.clone()));

        let mut state = match &seed_index {
            Some((_, checkpoint)) => checkpoint.state.clone(),
            None => GraphState::default(),
        };
        let start = seed_index.map(|(index, _)| index).unwrap_or(0);

        let mut replayed = 0usize;
        for event in &graph.event_log()[start..] {
            if event.timestamp <= timestamp {
                state.apply_event(event);
                replayed += 1;
            }
        }
        trace!(start, replayed, "replayed events to build snapshot");

        Self { timestamp, state }
    }

    /// The timestamp this snapshot was built for.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The nodes live at this snapshot's timestamp.
    pub fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.state.nodes
    }

    /// The edges live at this snapshot's timestamp.
    pub fn edges(&self) -> &HashMap<EdgeId, Edge> {
        &self.state.edges
    }

    /// The outgoing adjacency at this snapshot's timestamp.
    pub fn outgoing(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.outgoing
    }

    /// The incoming adjacency at this snapshot's timestamp.
    pub fn incoming(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.incoming
    }
}

impl GraphView for Snapshot {
    fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.state.nodes
    }

    fn edges(&self) -> &HashMap<EdgeId, Edge> {
        &self.state.edges
    }

    fn outgoing(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.outgoing
    }

    fn incoming(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.incoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GraphConfig;
    use crate::core::event::Attributes;

    #[test]
    fn snapshot_before_and_after_edge_add() {
        let mut g = Graph::new();
        g.add_node("n1", Attributes::new(), 1);
        g.add_node("n2", Attributes::new(), 1);
        g.add_edge("e1", "n1", "n2", Attributes::new(), 5);

        let before = Snapshot::at(&g, 4);
        assert!(before.edges().is_empty());

        let after = Snapshot::at(&g, 5);
        assert_eq!(after.edges().len(), 1);
    }

    #[test]
    fn snapshot_cascade_deletes_incident_edges() {
        let mut g = Graph::new();
        g.add_node("n1", Attributes::new(), 1);
        g.add_node("n2", Attributes::new(), 1);
        g.add_edge("e1", "n1", "n2", Attributes::new(), 2);
        g.del_node("n1", 3);

        let snap = Snapshot::at(&g, 10);
        assert!(snap.nodes().get(&NodeId::from("n1")).is_none());
        assert!(snap.edges().is_empty());
    }

    #[test]
    fn snapshot_uses_checkpoint_seed_when_available() {
        let mut g = Graph::with_config(GraphConfig {
            checkpoint_interval: 2,
        });
        g.add_node("n1", Attributes::new(), 1);
        g.add_node("n2", Attributes::new(), 2); // checkpoint at event_index 2
        g.add_node("n3", Attributes::new(), 3);

        assert_eq!(g.checkpoints().len(), 1);
        let snap = Snapshot::at(&g, 3);
        assert_eq!(snap.nodes().len(), 3);
    }
}
