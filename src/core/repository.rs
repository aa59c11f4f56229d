//! The Git-style layer on top of [`crate::core::graph::Graph`]: commits,
//! branches, checkout, and three-way merge.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use tracing::{info, instrument, warn};

use crate::core::commit::{Commit, CommitGraph};
use crate::core::config::RepositoryConfig;
use crate::core::error::{ChronoGraphError, Result};
use crate::core::event::{Attributes, Event, EventKind};
use crate::core::graph::{Edge, Graph, GraphState, Node};
use crate::core::ids::{CommitId, CountingIdFactory, EdgeId, IdFactory, NodeId};

/// How a three-way merge should resolve a conflicting entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the current branch's version.
    Ours,
    /// Keep the incoming branch's version.
    Theirs,
    /// Keep both sides' attributes, with the incoming branch's values
    /// winning on a key collision. When one side deleted the entity and
    /// the other updated it, the update wins (there is nothing to union
    /// against a deletion).
    AttributeUnion,
    /// Record the conflict but do not auto-resolve it. The current
    /// branch's version is staged provisionally; a caller inspecting
    /// [`MergeResult::conflicts`] is expected to resolve it out of band,
    /// since this crate has no interactive prompt loop to drive the
    /// resolution itself.
    Interactive,
}

/// What kind of three-way conflict was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both sides added an entity with the same id but different content,
    /// and neither side had it at the common ancestor.
    AddAdd,
    /// One side deleted the entity while the other updated it.
    DelUpdate,
    /// Both sides updated the entity differently.
    UpdateUpdate,
}

/// One conflicting node or edge surfaced by a three-way merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// What kind of conflict this is.
    pub kind: ConflictKind,
    /// The node id in conflict, if this conflict is about a node.
    pub node_id: Option<NodeId>,
    /// The edge id in conflict, if this conflict is about an edge.
    pub edge_id: Option<EdgeId>,
}

/// The outcome of [`Repository::merge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeResult {
    /// `HEAD_commitId` after the merge: a new merge commit for a three-way
    /// merge, the incoming branch's tip for a fast-forward, or the
    /// unchanged current tip if the branches were already equal or
    /// `theirs` was already an ancestor of `ours`.
    pub commit_id: CommitId,
    /// Whether a new merge commit was created (three-way) vs. the
    /// current branch simply advancing to the incoming tip or not moving
    /// at all.
    pub created_commit: bool,
    /// Whether the merge fast-forwarded instead of creating a merge
    /// commit.
    pub fast_forwarded: bool,
    /// Conflicts detected during a three-way merge, resolved per the
    /// requested [`MergePolicy`]. Empty for a fast-forward or a no-op
    /// merge.
    pub conflicts: Vec<Conflict>,
}

/// A versioned, branchable [`Graph`].
///
/// `working_graph` always mirrors the event history of `HEAD_commitId`'s
/// full ancestor chain: every mutator call on the repository forwards to
/// `working_graph`, and `commit()` slices off whatever has accumulated
/// since the last commit boundary. `checkout` and `merge` keep this
/// invariant by either fast-forwarding `working_graph` (replaying only the
/// newly-reachable commits' events) or rebuilding it from scratch.
#[derive(Debug)]
pub struct Repository {
    working_graph: Graph,
    commits: IndexMap<CommitId, Commit>,
    branches: IndexMap<String, CommitId>,
    head_branch: String,
    head_commit_id: CommitId,
    last_committed_event_index: usize,
    commit_id_factory: Box<dyn IdFactory>,
}

impl Repository {
    /// Create a repository with a single root commit, on a branch named
    /// `config.root_branch`.
    #[instrument]
    pub fn init(config: RepositoryConfig) -> Self {
        let mut commit_id_factory: Box<dyn IdFactory> = Box::new(CountingIdFactory::new("c"));
        let root_id = CommitId::from(commit_id_factory.next_id());
        let root_commit = Commit {
            id: root_id.clone(),
            parents: Vec::new(),
            events: Vec::new(),
            message: "root commit".to_string(),
        };
        let mut commits = IndexMap::new();
        commits.insert(root_id.clone(), root_commit);
        let mut branches = IndexMap::new();
        branches.insert(config.root_branch.clone(), root_id.clone());

        info!(branch = %config.root_branch, commit = %root_id, "initialized repository");
        Self {
            working_graph: Graph::new(),
            commits,
            branches,
            head_branch: config.root_branch,
            head_commit_id: root_id,
            last_committed_event_index: 0,
            commit_id_factory,
        }
    }

    /// The live working graph. Mutate through this handle between commits.
    pub fn working_graph(&self) -> &Graph {
        &self.working_graph
    }

    /// The live working graph, mutably.
    pub fn working_graph_mut(&mut self) -> &mut Graph {
        &mut self.working_graph
    }

    /// The name of the currently checked-out branch.
    pub fn head(&self) -> &str {
        &self.head_branch
    }

    /// The commit `HEAD` currently points to.
    pub fn head_commit_id(&self) -> &CommitId {
        &self.head_commit_id
    }

    /// Every branch name and the commit id it currently points to.
    pub fn list_branches(&self) -> Vec<(&str, &CommitId)> {
        self.branches
            .iter()
            .map(|(name, id)| (name.as_str(), id))
            .collect()
    }

    /// The full commit DAG.
    pub fn commit_graph(&self) -> CommitGraph {
        CommitGraph::build(&self.commits)
    }

    /// Look up a commit by id.
    pub fn get_commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// `branch_name`'s ancestry, root-first.
    #[instrument(skip(self))]
    pub fn list_commits(&self, branch_name: &str) -> Result<Vec<CommitId>> {
        let tip = self.branches.get(branch_name).cloned().ok_or_else(|| {
            ChronoGraphError::UnknownBranch {
                name: branch_name.to_string(),
            }
        })?;
        let graph = self.commit_graph();
        let ancestors = graph.ancestors(&tip);
        Ok(graph.topo_order(&ancestors))
    }

    /// Record a new commit capturing every event appended to
    /// `working_graph` since the last commit, advancing the current
    /// branch and `HEAD` to it. Commits with no new events are permitted
    /// and simply record an empty delta.
    #[instrument(skip(self))]
    pub fn commit(&mut self, message: impl Into<String>) -> CommitId {
        let new_events: Vec<Event> = self.working_graph.event_log()
            [self.last_committed_event_index..]
            .to_vec();
        let id = CommitId::from(self.commit_id_factory.next_id());
        let commit = Commit {
            id: id.clone(),
            parents: vec![self.head_commit_id.clone()],
            events: new_events,
            message: message.into(),
        };
        self.commits.insert(id.clone(), commit);
        self.branches.insert(self.head_branch.clone(), id.clone());
        self.head_commit_id = id.clone();
        self.last_committed_event_index = self.working_graph.event_log().len();
        id
    }

    /// Point a new branch named `name` at the current `HEAD_commitId`,
    /// without checking it out. Overwrites an existing branch of the same
    /// name.
    #[instrument(skip(self))]
    pub fn branch(&mut self, name: impl Into<String>) {
        self.branches.insert(name.into(), self.head_commit_id.clone());
    }

    /// Switch `HEAD` to branch `name`, updating `working_graph` to match.
    ///
    /// If the current `HEAD_commitId` is an ancestor of the target, the
    /// working graph is fast-forwarded: only the events introduced by
    /// commits newly reachable are replayed. Otherwise the working graph
    /// is rebuilt from scratch by replaying the target's entire ancestor
    /// chain, since there is no way to "subtract" the divergent history
    /// incrementally.
    #[instrument(skip(self))]
    pub fn checkout(&mut self, name: &str) -> Result<()> {
        let target = self
            .branches
            .get(name)
            .cloned()
            .ok_or_else(|| ChronoGraphError::UnknownBranch {
                name: name.to_string(),
            })?;

        if target != self.head_commit_id {
            let graph = self.commit_graph();
            let target_ancestors = graph.ancestors(&target);

            if target_ancestors.contains(&self.head_commit_id) {
                self.fast_forward_working_graph(&graph, &target_ancestors);
            } else {
                self.rebuild_working_graph(&graph, &target_ancestors);
            }
            self.head_commit_id = target;
        }
        self.head_branch = name.to_string();
        self.last_committed_event_index = self.working_graph.event_log().len();
        Ok(())
    }

    fn fast_forward_working_graph(&mut self, graph: &CommitGraph, target_ancestors: &IndexSet<CommitId>) {
        let head_ancestors = graph.ancestors(&self.head_commit_id);
        let delta: IndexSet<CommitId> = target_ancestors
            .iter()
            .filter(|id| !head_ancestors.contains(*id))
            .cloned()
            .collect();
        let order = graph.topo_order(&delta);
        for commit_id in order {
            if let Some(commit) = self.commits.get(&commit_id) {
                for event in commit.events.clone() {
                    self.working_graph.add_event(event.clone());
                    self.working_graph.apply_event(&event);
                }
            }
        }
    }

    fn rebuild_working_graph(&mut self, graph: &CommitGraph, target_ancestors: &IndexSet<CommitId>) {
        self.working_graph.clear_graph();
        let order = graph.topo_order(target_ancestors);
        for commit_id in order {
            if let Some(commit) = self.commits.get(&commit_id) {
                for event in commit.events.clone() {
                    self.working_graph.add_event(event.clone());
                    self.working_graph.apply_event(&event);
                }
            }
        }
    }

    fn materialize_commit_state(&self, commit_id: &CommitId) -> GraphState {
        let graph = self.commit_graph();
        let ancestors = graph.ancestors(commit_id);
        let order = graph.topo_order(&ancestors);
        let mut state = GraphState::default();
        for id in order {
            if let Some(commit) = self.commits.get(&id) {
                for event in &commit.events {
                    state.apply_event(event);
                }
            }
        }
        state
    }

    /// Merge branch `name` into the current branch.
    ///
    /// - If `name`'s tip is already an ancestor of `HEAD` (including being
    ///   equal to it), this is a no-op: nothing changes.
    /// - If `HEAD` is an ancestor of `name`'s tip, this fast-forwards:
    ///   `HEAD` and the current branch advance to `name`'s tip, and no
    ///   merge commit is created.
    /// - Otherwise, a three-way merge is performed against the common
    ///   ancestor, conflicts are resolved per `policy`, and a new merge
    ///   commit with both tips as parents is created at `timestamp`.
    #[instrument(skip(self))]
    pub fn merge(
        &mut self,
        name: &str,
        policy: MergePolicy,
        timestamp: i64,
    ) -> Result<MergeResult> {
        let theirs = self
            .branches
            .get(name)
            .cloned()
            .ok_or_else(|| ChronoGraphError::UnknownBranch {
                name: name.to_string(),
            })?;
        let ours = self.head_commit_id.clone();

        let graph = self.commit_graph();
        let ours_ancestors = graph.ancestors(&ours);
        if ours_ancestors.contains(&theirs) {
            return Ok(MergeResult {
                commit_id: ours,
                created_commit: false,
                fast_forwarded: false,
                conflicts: Vec::new(),
            });
        }

        let theirs_ancestors = graph.ancestors(&theirs);
        if theirs_ancestors.contains(&ours) {
            self.fast_forward_working_graph(&graph, &theirs_ancestors);
            self.branches.insert(self.head_branch.clone(), theirs.clone());
            self.head_commit_id = theirs.clone();
            self.last_committed_event_index = self.working_graph.event_log().len();
            return Ok(MergeResult {
                commit_id: theirs,
                created_commit: false,
                fast_forwarded: true,
                conflicts: Vec::new(),
            });
        }

        // The first commit in `theirs`'s ancestry, walked tip-to-root, that
        // is also an ancestor of `ours`. `topo_order` returns a root-first
        // ordering, so the tip-to-root walk is just that order reversed.
        let mut theirs_tip_to_root = graph.topo_order(&theirs_ancestors);
        theirs_tip_to_root.reverse();
        let base_id = theirs_tip_to_root
            .into_iter()
            .find(|id| ours_ancestors.contains(id))
            .ok_or_else(|| ChronoGraphError::NoCommonAncestor {
                ours: ours.clone(),
                theirs: theirs.clone(),
            })?;

        let base_state = self.materialize_commit_state(&base_id);
        let ours_state = self.materialize_commit_state(&ours);
        let theirs_state = self.materialize_commit_state(&theirs);

        let (merged, conflicts) = merge_states(&base_state, &ours_state, &theirs_state, policy);

        let mut event_id_factory = CountingIdFactory::new("m");
        let events = events_to_reach(&ours_state, &merged, timestamp, &mut event_id_factory);
        for event in &events {
            self.working_graph.add_event(event.clone());
            self.working_graph.apply_event(event);
        }

        let id = CommitId::from(self.commit_id_factory.next_id());
        let commit = Commit {
            id: id.clone(),
            parents: vec![ours, theirs],
            events,
            message: String::new(),
        };
        self.commits.insert(id.clone(), commit);
        self.branches.insert(self.head_branch.clone(), id.clone());
        self.head_commit_id = id.clone();
        self.last_committed_event_index = self.working_graph.event_log().len();

        if !conflicts.is_empty() {
            warn!(count = conflicts.len(), "merge produced conflicts");
        }

        Ok(MergeResult {
            commit_id: id,
            created_commit: true,
            fast_forwarded: false,
            conflicts,
        })
    }
}

fn events_to_reach(
    from: &GraphState,
    to: &GraphState,
    timestamp: i64,
    id_factory: &mut dyn IdFactory,
) -> Vec<Event> {
    let mut events = Vec::new();

    let mut removed_node_ids: Vec<&NodeId> = from
        .nodes
        .keys()
        .filter(|id| !to.nodes.contains_key(*id))
        .collect();
    removed_node_ids.sort();
    for id in &removed_node_ids {
        events.push(Event {
            id: crate::core::ids::EventId::from(id_factory.next_id()),
            timestamp,
            entity_id: id.as_str().to_string(),
            kind: EventKind::DelNode,
        });
    }

    let mut removed_edge_ids: Vec<&EdgeId> = from
        .edges
        .keys()
        .filter(|id| !to.edges.contains_key(*id))
        .collect();
    removed_edge_ids.sort();
    for id in &removed_edge_ids {
        let edge = &from.edges[*id];
        events.push(Event {
            id: crate::core::ids::EventId::from(id_factory.next_id()),
            timestamp,
            entity_id: id.as_str().to_string(),
            kind: EventKind::DelEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            },
        });
    }

    let mut added_or_changed_nodes: Vec<&NodeId> = to.nodes.keys().collect();
    added_or_changed_nodes.sort();
    for id in added_or_changed_nodes {
        let target_node = &to.nodes[id];
        match from.nodes.get(id) {
            Some(current) if current.attributes == target_node.attributes => {}
            Some(_) => events.push(Event {
                id: crate::core::ids::EventId::from(id_factory.next_id()),
                timestamp,
                entity_id: id.as_str().to_string(),
                kind: EventKind::UpdateNode {
                    attributes: target_node.attributes.clone(),
                },
            }),
            None => events.push(Event {
                id: crate::core::ids::EventId::from(id_factory.next_id()),
                timestamp,
                entity_id: id.as_str().to_string(),
                kind: EventKind::AddNode {
                    attributes: target_node.attributes.clone(),
                },
            }),
        }
    }

    let mut added_or_changed_edges: Vec<&EdgeId> = to.edges.keys().collect();
    added_or_changed_edges.sort();
    for id in added_or_changed_edges {
        let target_edge = &to.edges[id];
        match from.edges.get(id) {
            Some(current) if current.attributes == target_edge.attributes => {}
            Some(_) => events.push(Event {
                id: crate::core::ids::EventId::from(id_factory.next_id()),
                timestamp,
                entity_id: id.as_str().to_string(),
                kind: EventKind::UpdateEdge {
                    attributes: target_edge.attributes.clone(),
                },
            }),
            None => events.push(Event {
                id: crate::core::ids::EventId::from(id_factory.next_id()),
                timestamp,
                entity_id: id.as_str().to_string(),
                kind: EventKind::AddEdge {
                    from: target_edge.from.clone(),
                    to: target_edge.to.clone(),
                    attributes: target_edge.attributes.clone(),
                },
            }),
        }
    }

    events
}

fn merge_states(
    base: &GraphState,
    ours: &GraphState,
    theirs: &GraphState,
    policy: MergePolicy,
) -> (GraphState, Vec<Conflict>) {
    let mut merged = base.clone();
    let mut conflicts = Vec::new();

    let mut node_ids: IndexSet<NodeId> = IndexSet::new();
    node_ids.extend(base.nodes.keys().cloned());
    node_ids.extend(ours.nodes.keys().cloned());
    node_ids.extend(theirs.nodes.keys().cloned());
    let mut node_ids: Vec<NodeId> = node_ids.into_iter().collect();
    node_ids.sort();

    for id in node_ids {
        let b = base.nodes.get(&id);
        let o = ours.nodes.get(&id);
        let t = theirs.nodes.get(&id);
        resolve_node(&mut merged, &mut conflicts, &id, b, o, t, policy);
    }

    let mut edge_ids: IndexSet<EdgeId> = IndexSet::new();
    edge_ids.extend(base.edges.keys().cloned());
    edge_ids.extend(ours.edges.keys().cloned());
    edge_ids.extend(theirs.edges.keys().cloned());
    let mut edge_ids: Vec<EdgeId> = edge_ids.into_iter().collect();
    edge_ids.sort();

    for id in edge_ids {
        let b = base.edges.get(&id);
        let o = ours.edges.get(&id);
        let t = theirs.edges.get(&id);
        resolve_edge(&mut merged, &mut conflicts, &id, b, o, t, policy);
    }

    rebuild_adjacency(&mut merged);
    (merged, conflicts)
}

fn resolve_node(
    merged: &mut GraphState,
    conflicts: &mut Vec<Conflict>,
    id: &NodeId,
    base: Option<&Node>,
    ours: Option<&Node>,
    theirs: Option<&Node>,
    policy: MergePolicy,
) {
    match (base, ours, theirs) {
        (None, Some(o), Some(t)) => {
            if o.attributes == t.attributes {
                merged.nodes.insert(id.clone(), o.clone());
            } else {
                conflicts.push(Conflict {
                    kind: ConflictKind::AddAdd,
                    node_id: Some(id.clone()),
                    edge_id: None,
                });
                merged
                    .nodes
                    .insert(id.clone(), resolve_attrs_node(id, o, t, policy));
            }
        }
        (None, Some(o), None) => {
            merged.nodes.insert(id.clone(), o.clone());
        }
        (None, None, Some(t)) => {
            merged.nodes.insert(id.clone(), t.clone());
        }
        (None, None, None) => {}
        (Some(b), None, Some(t)) => {
            if t.attributes == b.attributes {
                merged.nodes.remove(id);
            } else {
                conflicts.push(Conflict {
                    kind: ConflictKind::DelUpdate,
                    node_id: Some(id.clone()),
                    edge_id: None,
                });
                match policy {
                    MergePolicy::Ours | MergePolicy::Interactive => {
                        merged.nodes.remove(id);
                    }
                    MergePolicy::Theirs | MergePolicy::AttributeUnion => {
                        merged.nodes.insert(id.clone(), t.clone());
                    }
                }
            }
        }
        (Some(b), Some(o), None) => {
            if o.attributes == b.attributes {
                merged.nodes.remove(id);
            } else {
                conflicts.push(Conflict {
                    kind: ConflictKind::DelUpdate,
                    node_id: Some(id.clone()),
                    edge_id: None,
                });
                match policy {
                    MergePolicy::Theirs => {
                        merged.nodes.remove(id);
                    }
                    MergePolicy::Ours | MergePolicy::AttributeUnion | MergePolicy::Interactive => {
                        merged.nodes.insert(id.clone(), o.clone());
                    }
                }
            }
        }
        (Some(_), None, None) => {
            merged.nodes.remove(id);
        }
        (Some(b), Some(o), Some(t)) => {
            if o.attributes == b.attributes && t.attributes == b.attributes {
                return;
            }
            let (attributes, conflicted) =
                merge_attrs_per_key(&b.attributes, &o.attributes, &t.attributes, policy);
            if conflicted {
                conflicts.push(Conflict {
                    kind: ConflictKind::UpdateUpdate,
                    node_id: Some(id.clone()),
                    edge_id: None,
                });
            }
            merged.nodes.insert(
                id.clone(),
                Node {
                    id: id.clone(),
                    attributes,
                },
            );
        }
    }
}

/// Merge `ours` and `theirs`'s per-key changes relative to `base`, key by
/// key, so that each side changing a *different* key is not a conflict —
/// only a key both sides changed away from `base`, to different values, is.
///
/// A key absent from `ours` or `theirs` but present in `base` means that
/// side wholesale-replaced the entity since `base` (the only way a key can
/// disappear, since updates only ever merge keys in) dropping that key;
/// that counts as "changed" too.
///
/// Returns the merged attribute map and whether any key actually
/// conflicted (both sides changed it, to different values).
fn merge_attrs_per_key(
    base: &Attributes,
    ours: &Attributes,
    theirs: &Attributes,
    policy: MergePolicy,
) -> (Attributes, bool) {
    let mut keys: IndexSet<String> = IndexSet::new();
    keys.extend(base.keys().cloned());
    keys.extend(ours.keys().cloned());
    keys.extend(theirs.keys().cloned());

    let mut result = Attributes::new();
    let mut conflicted = false;
    for key in keys {
        let b = base.get(&key);
        let o = ours.get(&key);
        let t = theirs.get(&key);
        let o_changed = o != b;
        let t_changed = t != b;
        match (o_changed, t_changed) {
            (false, false) => {
                if let Some(v) = b {
                    result.insert(key, v.clone());
                }
            }
            (true, false) => {
                if let Some(v) = o {
                    result.insert(key, v.clone());
                }
            }
            (false, true) => {
                if let Some(v) = t {
                    result.insert(key, v.clone());
                }
            }
            (true, true) => {
                if o == t {
                    if let Some(v) = o {
                        result.insert(key, v.clone());
                    }
                } else {
                    conflicted = true;
                    let winner = match policy {
                        MergePolicy::Ours | MergePolicy::Interactive => o,
                        MergePolicy::Theirs => t,
                        // incoming (theirs) wins on a key collision.
                        MergePolicy::AttributeUnion => t.or(o),
                    };
                    if let Some(v) = winner {
                        result.insert(key, v.clone());
                    }
                }
            }
        }
    }
    (result, conflicted)
}

fn resolve_attrs_node(id: &NodeId, ours: &Node, theirs: &Node, policy: MergePolicy) -> Node {
    let attributes = match policy {
        MergePolicy::Ours | MergePolicy::Interactive => ours.attributes.clone(),
        MergePolicy::Theirs => theirs.attributes.clone(),
        MergePolicy::AttributeUnion => {
            let mut merged: Attributes = ours.attributes.clone();
            for (key, value) in &theirs.attributes {
                merged.insert(key.clone(), value.clone());
            }
            merged
        }
    };
    Node {
        id: id.clone(),
        attributes,
    }
}

fn resolve_edge(
    merged: &mut GraphState,
    conflicts: &mut Vec<Conflict>,
    id: &EdgeId,
    base: Option<&Edge>,
    ours: Option<&Edge>,
    theirs: Option<&Edge>,
    policy: MergePolicy,
) {
    match (base, ours, theirs) {
        (None, Some(o), Some(t)) => {
            if o.attributes == t.attributes && o.from == t.from && o.to == t.to {
                merged.edges.insert(id.clone(), o.clone());
            } else {
                conflicts.push(Conflict {
                    kind: ConflictKind::AddAdd,
                    node_id: None,
                    edge_id: Some(id.clone()),
                });
                merged
                    .edges
                    .insert(id.clone(), resolve_attrs_edge(id, o, t, policy));
            }
        }
        (None, Some(o), None) => {
            merged.edges.insert(id.clone(), o.clone());
        }
        (None, None, Some(t)) => {
            merged.edges.insert(id.clone(), t.clone());
        }
        (None, None, None) => {}
        (Some(b), None, Some(t)) => {
            if t.attributes == b.attributes {
                merged.edges.remove(id);
            } else {
                conflicts.push(Conflict {
                    kind: ConflictKind::DelUpdate,
                    node_id: None,
                    edge_id: Some(id.clone()),
                });
                match policy {
                    MergePolicy::Ours | MergePolicy::Interactive => {
                        merged.edges.remove(id);
                    }
                    MergePolicy::Theirs | MergePolicy::AttributeUnion => {
                        merged.edges.insert(id.clone(), t.clone());
                    }
                }
            }
        }
        (Some(b), Some(o), None) => {
            if o.attributes == b.attributes {
                merged.edges.remove(id);
            } else {
                conflicts.push(Conflict {
                    kind: ConflictKind::DelUpdate,
                    node_id: None,
                    edge_id: Some(id.clone()),
                });
                match policy {
                    MergePolicy::Theirs => {
                        merged.edges.remove(id);
                    }
                    MergePolicy::Ours | MergePolicy::AttributeUnion | MergePolicy::Interactive => {
                        merged.edges.insert(id.clone(), o.clone());
                    }
                }
            }
        }
        (Some(_), None, None) => {
            merged.edges.remove(id);
        }
        (Some(b), Some(o), Some(t)) => {
            if o.attributes == b.attributes && t.attributes == b.attributes {
                return;
            }
            let (attributes, conflicted) =
                merge_attrs_per_key(&b.attributes, &o.attributes, &t.attributes, policy);
            if conflicted {
                conflicts.push(Conflict {
                    kind: ConflictKind::UpdateUpdate,
                    node_id: None,
                    edge_id: Some(id.clone()),
                });
            }
            merged.edges.insert(
                id.clone(),
                Edge {
                    id: id.clone(),
                    from: o.from.clone(),
                    to: o.to.clone(),
                    attributes,
                    created_timestamp: o.created_timestamp,
                },
            );
        }
    }
}

fn resolve_attrs_edge(id: &EdgeId, ours: &Edge, theirs: &Edge, policy: MergePolicy) -> Edge {
    let attributes = match policy {
        MergePolicy::Ours | MergePolicy::Interactive => ours.attributes.clone(),
        MergePolicy::Theirs => theirs.attributes.clone(),
        MergePolicy::AttributeUnion => {
            let mut merged: Attributes = ours.attributes.clone();
            for (key, value) in &theirs.attributes {
                merged.insert(key.clone(), value.clone());
            }
            merged
        }
    };
    Edge {
        id: id.clone(),
        from: ours.from.clone(),
        to: ours.to.clone(),
        attributes,
        created_timestamp: ours.created_timestamp,
    }
}

fn rebuild_adjacency(state: &mut GraphState) {
    let mut outgoing: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
    let mut incoming: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
    for id in state.nodes.keys() {
        outgoing.entry(id.clone()).or_default();
        incoming.entry(id.clone()).or_default();
    }
    let mut edge_ids: Vec<&EdgeId> = state.edges.keys().collect();
    edge_ids.sort();
    for edge_id in edge_ids {
        let edge = &state.edges[edge_id];
        outgoing.entry(edge.from.clone()).or_default().push(edge_id.clone());
        incoming.entry(edge.to.clone()).or_default().push(edge_id.clone());
    }
    state.outgoing = outgoing;
    state.incoming = incoming;
}
