//! The event-sourced graph: the authoritative event log, the materialized
//! current state derived from it, and periodic checkpoints that bound
//! replay cost.

use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::core::config::GraphConfig;
use crate::core::diff::Diff;
use crate::core::event::{Attributes, Event, EventKind};
use crate::core::ids::{CountingIdFactory, EdgeId, EventId, IdFactory, NodeId};

/// A node: an id and its current attribute mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// This node's stable id.
    pub id: NodeId,
    /// The node's current attributes.
    pub attributes: Attributes,
}

/// An edge: an id, its endpoints, its current attributes, and the
/// timestamp of the `ADD_EDGE` event that produced the currently-live
/// edge (used by time-respecting reachability).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// This edge's stable id.
    pub id: EdgeId,
    /// The source node id. Not required to reference a live node.
    pub from: NodeId,
    /// The destination node id. Not required to reference a live node.
    pub to: NodeId,
    /// The edge's current attributes.
    pub attributes: Attributes,
    /// The timestamp of the `ADD_EDGE` event that created this live edge.
    pub created_timestamp: i64,
}

/// Bare materialized state: nodes, edges, and their adjacency, with no
/// event log of its own. Shared by [`Graph`] (the live, mutating owner),
/// [`Checkpoint`] (a frozen copy at some point in the log), and
/// [`crate::core::snapshot::Snapshot`] (a read-only replay target) so that
/// the state-mutation logic driven by an [`Event`] exists in exactly one
/// place: `apply_event` mutates state identically no matter which of the
/// three callers drives it.
#[derive(Clone, Debug, Default)]
pub(crate) struct GraphState {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) edges: HashMap<EdgeId, Edge>,
    pub(crate) outgoing: HashMap<NodeId, Vec<EdgeId>>,
    pub(crate) incoming: HashMap<NodeId, Vec<EdgeId>>,
}

impl GraphState {
    fn insert_node(&mut self, id: NodeId, attributes: Attributes) {
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                attributes,
            },
        );
        self.outgoing.entry(id.clone()).or_default();
        self.incoming.entry(id).or_default();
    }

    fn update_node(&mut self, id: &NodeId, attributes: &Attributes) {
        if let Some(node) = self.nodes.get_mut(id) {
            for (key, value) in attributes {
                node.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    fn insert_edge(
        &mut self,
        id: EdgeId,
        from: NodeId,
        to: NodeId,
        attributes: Attributes,
        created_timestamp: i64,
    ) {
        self.edges.insert(
            id.clone(),
            Edge {
                id: id.clone(),
                from: from.clone(),
                to: to.clone(),
                attributes,
                created_timestamp,
            },
        );
        self.outgoing.entry(from).or_default().push(id.clone());
        self.incoming.entry(to).or_default().push(id);
    }

    /// Remove a single edge from state, if present, cleaning up both
    /// adjacency lists. Returns the removed edge.
    fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        if let Some(list) = self.outgoing.get_mut(&edge.from) {
            list.retain(|e| e != id);
        }
        if let Some(list) = self.incoming.get_mut(&edge.to) {
            list.retain(|e| e != id);
        }
        Some(edge)
    }

    fn update_edge(&mut self, id: &EdgeId, attributes: &Attributes) {
        if let Some(edge) = self.edges.get_mut(id) {
            for (key, value) in attributes {
                edge.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    /// Cascade-remove a node and every edge incident to it, state-only (no
    /// new events are produced). Used both by replay (`apply_event` on a
    /// `DelNode`) and, indirectly, by `Graph::del_node` once its own
    /// cascade has already logged the individual `DelEdge` events.
    ///
    /// Snapshots the incident edge id lists before iterating, since
    /// removing an edge mutates the very adjacency lists being walked.
    fn remove_node_cascade(&mut self, id: &NodeId) {
        let out_edges: Vec<EdgeId> = self.outgoing.get(id).cloned().unwrap_or_default();
        for edge_id in out_edges {
            self.remove_edge(&edge_id);
        }
        let in_edges: Vec<EdgeId> = self.incoming.get(id).cloned().unwrap_or_default();
        for edge_id in in_edges {
            self.remove_edge(&edge_id);
        }
        self.nodes.remove(id);
        self.outgoing.remove(id);
        self.incoming.remove(id);
    }

    /// Mutate state to reflect `event`, with the same semantics the six
    /// top-level mutators use, but without touching an event log or
    /// checkpoints.
    pub(crate) fn apply_event(&mut self, event: &Event) {
        match &event.kind {
            EventKind::AddNode { attributes } => {
                self.insert_node(NodeId::from(event.entity_id.as_str()), attributes.clone());
            }
            EventKind::DelNode => {
                self.remove_node_cascade(&NodeId::from(event.entity_id.as_str()));
            }
            EventKind::UpdateNode { attributes } => {
                self.update_node(&NodeId::from(event.entity_id.as_str()), attributes);
            }
            EventKind::AddEdge {
                from,
                to,
                attributes,
            } => {
                self.insert_edge(
                    EdgeId::from(event.entity_id.as_str()),
                    from.clone(),
                    to.clone(),
                    attributes.clone(),
                    event.timestamp,
                );
            }
            EventKind::DelEdge { .. } => {
                self.remove_edge(&EdgeId::from(event.entity_id.as_str()));
            }
            EventKind::UpdateEdge { attributes } => {
                self.update_edge(&EdgeId::from(event.entity_id.as_str()), attributes);
            }
        }
    }
}

/// A full copy of materialized state at a point in the event log, captured
/// every `checkpoint_interval` events so that [`crate::core::snapshot::Snapshot`]
/// construction does not have to replay the whole log from the beginning.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    /// The timestamp of the event that triggered this checkpoint's capture.
    pub timestamp: i64,
    /// The number of events in the log at capture time.
    pub event_index: usize,
    pub(crate) state: GraphState,
}

impl Checkpoint {
    /// The nodes live at this checkpoint.
    pub fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.state.nodes
    }

    /// The edges live at this checkpoint.
    pub fn edges(&self) -> &HashMap<EdgeId, Edge> {
        &self.state.edges
    }

    /// The outgoing adjacency (node id -> edge ids) at this checkpoint.
    pub fn outgoing(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.outgoing
    }

    /// The incoming adjacency (node id -> edge ids) at this checkpoint.
    pub fn incoming(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.incoming
    }
}

/// The authoritative event log plus the current materialized graph state
/// derived from it.
///
/// Every mutator appends to `event_log` in insertion order (not timestamp
/// order, since timestamps are caller-supplied and need not be monotonic)
/// and then updates live state identically to how [`Graph::apply_event`]
/// would, so that the two never drift apart.
#[derive(Debug)]
pub struct Graph {
    event_log: Vec<Event>,
    state: GraphState,
    checkpoints: Vec<Checkpoint>,
    config: GraphConfig,
    id_factory: Box<dyn IdFactory>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph with the default checkpoint interval (5000)
    /// and a deterministic, counter-based id factory prefixed `"e"`.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty graph with a custom [`GraphConfig`].
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            event_log: Vec::new(),
            state: GraphState::default(),
            checkpoints: Vec::new(),
            config,
            id_factory: Box::new(CountingIdFactory::new("e")),
        }
    }

    /// Create an empty graph with a custom [`GraphConfig`] and a
    /// caller-supplied [`IdFactory`], e.g. to share an id namespace across
    /// several graphs or to inject deterministic ids in tests.
    pub fn with_id_factory(config: GraphConfig, id_factory: Box<dyn IdFactory>) -> Self {
        Self {
            event_log: Vec::new(),
            state: GraphState::default(),
            checkpoints: Vec::new(),
            config,
            id_factory,
        }
    }

    fn new_event(&mut self, timestamp: i64, entity_id: String, kind: EventKind) -> Event {
        Event {
            id: EventId::from(self.id_factory.next_id()),
            timestamp,
            entity_id,
            kind,
        }
    }

    fn maybe_create_checkpoint(&mut self, triggering_event: &Event) {
        let event_index = self.event_log.len();
        if event_index > 0 && event_index % self.config.checkpoint_interval == 0 {
            trace!(event_index, "capturing checkpoint");
            self.checkpoints.push(Checkpoint {
                timestamp: triggering_event.timestamp,
                event_index,
                state: self.state.clone(),
            });
        }
    }

    /// Append `id`'s node, creating it with `attributes` if it does not
    /// exist yet, or replacing its attributes wholesale if it does.
    #[instrument(skip(self, attributes))]
    pub fn add_node(&mut self, id: impl Into<NodeId>, attributes: Attributes, timestamp: i64) {
        let id = id.into();
        let event = self.new_event(
            timestamp,
            id.as_str().to_owned(),
            EventKind::AddNode {
                attributes: attributes.clone(),
            },
        );
        self.event_log.push(event.clone());
        self.state.insert_node(id, attributes);
        self.maybe_create_checkpoint(&event);
    }

    /// Delete `id`'s node. Always appends a `DEL_NODE` event, even if the
    /// node does not exist (a no-op for state in that case). Any edges
    /// currently incident to the node are cascade-deleted first, each
    /// producing its own `DEL_EDGE` event.
    #[instrument(skip(self))]
    pub fn del_node(&mut self, id: impl Into<NodeId>, timestamp: i64) {
        let id = id.into();
        let event = self.new_event(timestamp, id.as_str().to_owned(), EventKind::DelNode);
        self.event_log.push(event.clone());

        let mut incident: Vec<EdgeId> = self
            .state
            .outgoing
            .get(&id)
            .cloned()
            .unwrap_or_default();
        for edge_id in self.state.incoming.get(&id).cloned().unwrap_or_default() {
            if !incident.contains(&edge_id) {
                incident.push(edge_id);
            }
        }
        for edge_id in incident {
            if self.state.edges.contains_key(&edge_id) {
                self.del_edge(edge_id, timestamp);
            }
        }

        self.state.nodes.remove(&id);
        self.state.outgoing.remove(&id);
        self.state.incoming.remove(&id);
        self.maybe_create_checkpoint(&event);
    }

    /// Add an edge `id` from `from` to `to`. Endpoints are not validated
    /// against live nodes; algorithms tolerate dangling references.
    #[instrument(skip(self, attributes))]
    pub fn add_edge(
        &mut self,
        id: impl Into<EdgeId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        attributes: Attributes,
        timestamp: i64,
    ) {
        let id = id.into();
        let from = from.into();
        let to = to.into();
        let event = self.new_event(
            timestamp,
            id.as_str().to_owned(),
            EventKind::AddEdge {
                from: from.clone(),
                to: to.clone(),
                attributes: attributes.clone(),
            },
        );
        self.event_log.push(event.clone());
        self.state.insert_edge(id, from, to, attributes, timestamp);
        self.maybe_create_checkpoint(&event);
    }

    /// Delete edge `id`. If the edge does not exist, this is a no-op and no
    /// event is appended.
    #[instrument(skip(self))]
    pub fn del_edge(&mut self, id: impl Into<EdgeId>, timestamp: i64) {
        let id = id.into();
        let Some(edge) = self.state.edges.get(&id).cloned() else {
            return;
        };
        let event = self.new_event(
            timestamp,
            id.as_str().to_owned(),
            EventKind::DelEdge {
                from: edge.from,
                to: edge.to,
            },
        );
        self.event_log.push(event.clone());
        self.state.remove_edge(&id);
        self.maybe_create_checkpoint(&event);
    }

    /// Merge `attributes` into node `id`'s attribute map, per-key. Always
    /// appends an `UPDATE_NODE` event, even if the node does not exist.
    #[instrument(skip(self, attributes))]
    pub fn update_node(&mut self, id: impl Into<NodeId>, attributes: Attributes, timestamp: i64) {
        let id = id.into();
        let event = self.new_event(
            timestamp,
            id.as_str().to_owned(),
            EventKind::UpdateNode {
                attributes: attributes.clone(),
            },
        );
        self.event_log.push(event.clone());
        self.state.update_node(&id, &attributes);
        self.maybe_create_checkpoint(&event);
    }

    /// Merge `attributes` into edge `id`'s attribute map, per-key. Always
    /// appends an `UPDATE_EDGE` event, even if the edge does not exist.
    #[instrument(skip(self, attributes))]
    pub fn update_edge(&mut self, id: impl Into<EdgeId>, attributes: Attributes, timestamp: i64) {
        let id = id.into();
        let event = self.new_event(
            timestamp,
            id.as_str().to_owned(),
            EventKind::UpdateEdge {
                attributes: attributes.clone(),
            },
        );
        self.event_log.push(event.clone());
        self.state.update_edge(&id, &attributes);
        self.maybe_create_checkpoint(&event);
    }

    /// Append `event` to the log without mutating live state or creating a
    /// checkpoint. Paired with [`Graph::apply_event`] by
    /// [`crate::core::repository::Repository`] during checkout and merge
    /// replay.
    pub fn add_event(&mut self, event: Event) {
        self.event_log.push(event);
    }

    /// Mutate state to reflect `event`, identically to the mutators, but
    /// without appending to the log or creating a checkpoint.
    pub fn apply_event(&mut self, event: &Event) {
        self.state.apply_event(event);
    }

    /// Erase live state (nodes, edges, adjacency) but retain the event log
    /// and checkpoints.
    pub fn clear_state_keep_log(&mut self) {
        self.state = GraphState::default();
    }

    /// Erase both live state and the event log, and the checkpoints too,
    /// since a checkpoint from before a `clear_graph` no longer corresponds
    /// to any position in the (now empty) log.
    pub fn clear_graph(&mut self) {
        self.event_log.clear();
        self.state = GraphState::default();
        self.checkpoints.clear();
    }

    /// The full append-only event log, in insertion order.
    pub fn event_log(&self) -> &[Event] {
        &self.event_log
    }

    /// The currently live nodes.
    pub fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.state.nodes
    }

    /// The currently live edges.
    pub fn edges(&self) -> &HashMap<EdgeId, Edge> {
        &self.state.edges
    }

    /// The current outgoing adjacency: node id -> the edge ids leaving it,
    /// in insertion order.
    pub fn outgoing(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.outgoing
    }

    /// The current incoming adjacency: node id -> the edge ids arriving at
    /// it, in insertion order.
    pub fn incoming(&self) -> &HashMap<NodeId, Vec<EdgeId>> {
        &self.state.incoming
    }

    /// The checkpoints captured so far, in capture order (strictly
    /// increasing `event_index`).
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Compute the symmetric difference between this graph's state at `t1`
    /// and at `t2`.
    pub fn diff(&self, t1: i64, t2: i64) -> Diff {
        Diff::compute(self, t1, t2)
    }
}

impl crate::algorithms::view::GraphView for Graph {
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
