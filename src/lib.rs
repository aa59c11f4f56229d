//! ChronoGraph: a versioned, temporal, directed property-graph engine.
//!
//! The crate is built from three tightly coupled subsystems, in order of
//! dependency: an event-sourced [`core::graph::Graph`], a
//! [`core::snapshot::Snapshot`]/diff engine for time travel, and a
//! [`core::repository::Repository`] that layers Git-style commits, branches,
//! checkout, and three-way merge on top of the event log. Read-only
//! [`algorithms`] consume the graph or a snapshot of it.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::as_conversions, clippy::clone_on_ref_ptr)]
#![allow(clippy::too_many_arguments)]

pub mod algorithms;
pub mod core;
pub mod testing;
pub mod util;

pub use crate::core::commit::{Commit, CommitGraph};
pub use crate::core::config::{GraphConfig, RepositoryConfig};
pub use crate::core::diff::{Diff, UpdatedEdge, UpdatedNode};
pub use crate::core::error::{ChronoGraphError, Result};
pub use crate::core::event::{Attributes, Event, EventKind};
pub use crate::core::graph::{Checkpoint, Edge, Graph, Node};
pub use crate::core::ids::{CommitId, EdgeId, EventId, NodeId};
pub use crate::core::repository::{Conflict, ConflictKind, MergePolicy, MergeResult, Repository};
pub use crate::core::snapshot::Snapshot;
