//! The immutable unit of mutation that everything else in this crate is
//! derived from.

use indexmap::IndexMap;

use crate::core::ids::{EdgeId, EventId, NodeId};

/// A text-to-text attribute payload.
///
/// Backed by an [`IndexMap`] rather than a [`std::collections::HashMap`] so
/// that iteration order matches insertion order — deterministic across runs
/// without forcing every comparison site to sort first.
pub type Attributes = IndexMap<String, String>;

/// The kind of mutation an [`Event`] records, and the fields meaningful for
/// that kind.
///
/// A tagged variant rather than a flat record with optional fields:
/// mutators and replayers dispatch on this tag and the compiler checks
/// that every arm is handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A node was added (or, if it already existed, had its attributes
    /// replaced wholesale).
    AddNode {
        /// Attributes the node was created or replaced with.
        attributes: Attributes,
    },
    /// A node was deleted. Carries no payload; deletion of incident edges
    /// is recorded as separate `DelEdge` events.
    DelNode,
    /// An existing node had attributes merged into it, per-key.
    UpdateNode {
        /// Attributes merged into the node (key-wise overwrite).
        attributes: Attributes,
    },
    /// An edge was added between `from` and `to`.
    AddEdge {
        /// The source node id.
        from: NodeId,
        /// The destination node id.
        to: NodeId,
        /// Attributes the edge was created with.
        attributes: Attributes,
    },
    /// An edge was deleted. Carries the endpoints it had when it was live,
    /// since the edge record itself is gone by the time this event exists.
    DelEdge {
        /// The source node id the deleted edge had.
        from: NodeId,
        /// The destination node id the deleted edge had.
        to: NodeId,
    },
    /// An existing edge had attributes merged into it, per-key.
    UpdateEdge {
        /// Attributes merged into the edge (key-wise overwrite).
        attributes: Attributes,
    },
}

/// One immutable, timestamped mutation against a [`crate::core::graph::Graph`].
///
/// Event ids are opaque and need only be unique; timestamps are
/// caller-supplied and are not required to be monotonic with respect to
/// append order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// This event's unique id.
    pub id: EventId,
    /// The caller-supplied timestamp this mutation is attributed to.
    pub timestamp: i64,
    /// The node or edge id this event mutates.
    pub entity_id: String,
    /// What kind of mutation this is, and its kind-specific fields.
    pub kind: EventKind,
}

impl Event {
    /// The node id this event targets, if it is a node event.
    pub fn node_id(&self) -> Option<NodeId> {
        match &self.kind {
            EventKind::AddNode { .. } | EventKind::DelNode | EventKind::UpdateNode { .. } => {
                Some(NodeId::from(self.entity_id.as_str()))
            }
            EventKind::AddEdge { .. } | EventKind::DelEdge { .. } | EventKind::UpdateEdge { .. } => {
                None
            }
        }
    }

    /// The edge id this event targets, if it is an edge event.
    pub fn edge_id(&self) -> Option<EdgeId> {
        match &self.kind {
            EventKind::AddEdge { .. } | EventKind::DelEdge { .. } | EventKind::UpdateEdge { .. } => {
                Some(EdgeId::from(self.entity_id.as_str()))
            }
            EventKind::AddNode { .. } | EventKind::DelNode | EventKind::UpdateNode { .. } => None,
        }
    }
}
