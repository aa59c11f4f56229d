//! Commits: named, immutable checkpoints of the event log, and the DAG
//! they form through their parent links.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::core::event::Event;
use crate::core::ids::CommitId;

/// One commit: the events it introduced relative to its parent(s), plus
/// the commit message and parent links.
///
/// A commit with zero parents is a root commit. A commit with two parents
/// is a merge commit; this crate does not support more than two parents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// This commit's id.
    pub id: CommitId,
    /// Parent commit ids: empty for the root commit, one for a normal
    /// commit, two for a merge commit.
    pub parents: Vec<CommitId>,
    /// The events this commit introduced, in append order.
    pub events: Vec<Event>,
    /// The commit message supplied by the caller.
    pub message: String,
}

/// The commit DAG: every commit reachable from `Repository::commits`,
/// indexed both by parent and by child, so that callers can walk history
/// in either direction without re-deriving the child links each time.
#[derive(Clone, Debug, Default)]
pub struct CommitGraph {
    /// Every commit id, in the order commits were created.
    pub commit_ids: Vec<CommitId>,
    /// Commit id -> its parent ids.
    pub parents: IndexMap<CommitId, Vec<CommitId>>,
    /// Commit id -> the ids of commits that name it as a parent.
    pub children: IndexMap<CommitId, Vec<CommitId>>,
}

impl CommitGraph {
    /// Build a [`CommitGraph`] from every commit in `commits`, inverting
    /// the parent relation to derive `children`.
    pub fn build(commits: &IndexMap<CommitId, Commit>) -> Self {
        let commit_ids: Vec<CommitId> = commits.keys().cloned().collect();
        let mut parents = IndexMap::new();
        let mut children: IndexMap<CommitId, Vec<CommitId>> = IndexMap::new();
        for id in &commit_ids {
            children.entry(id.clone()).or_default();
        }
        for (id, commit) in commits {
            parents.insert(id.clone(), commit.parents.clone());
            for parent in &commit.parents {
                children.entry(parent.clone()).or_default().push(id.clone());
            }
        }
        Self {
            commit_ids,
            parents,
            children,
        }
    }

    /// The ancestors of `commit_id`, including itself, computed by an
    /// iterative (non-recursive) post-order traversal of parent links — a
    /// recursive walk would blow the stack on a long linear history.
    pub fn ancestors(&self, commit_id: &CommitId) -> IndexSet<CommitId> {
        let mut seen = IndexSet::new();
        let mut stack = vec![commit_id.clone()];
        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(parents) = self.parents.get(&id) {
                for parent in parents {
                    if !seen.contains(parent) {
                        stack.push(parent.clone());
                    }
                }
            }
        }
        seen
    }

    /// A topological (parent-before-child) ordering of `subset`, via Kahn's
    /// algorithm restricted to it: a commit's in-degree only counts parents
    /// that are themselves in `subset`, so callers can order an arbitrary
    /// ancestor slice (e.g. "everything new since `HEAD`") without first
    /// materializing the commits outside it.
    pub fn topo_order(&self, subset: &IndexSet<CommitId>) -> Vec<CommitId> {
        let mut in_degree: IndexMap<CommitId, usize> =
            subset.iter().map(|id| (id.clone(), 0)).collect();
        for id in subset {
            if let Some(parents) = self.parents.get(id) {
                for parent in parents {
                    if subset.contains(parent) {
                        *in_degree.get_mut(id).unwrap() += 1;
                    }
                }
            }
        }

        let mut queue: VecDeque<CommitId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| id.clone())
            .collect();
        let mut order = Vec::with_capacity(subset.len());
        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            if let Some(children) = self.children.get(&id) {
                for child in children {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(child.clone());
                        }
                    }
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str, parents: &[&str]) -> Commit {
        Commit {
            id: CommitId::from(id),
            parents: parents.iter().map(|p| CommitId::from(*p)).collect(),
            events: Vec::new(),
            message: String::new(),
        }
    }

    #[test]
    fn children_are_inverted_from_parents() {
        let mut commits = IndexMap::new();
        commits.insert(CommitId::from("root"), commit("root", &[]));
        commits.insert(CommitId::from("a"), commit("a", &["root"]));
        commits.insert(CommitId::from("b"), commit("b", &["root"]));

        let graph = CommitGraph::build(&commits);
        let mut children = graph.children[&CommitId::from("root")].clone();
        children.sort();
        assert_eq!(children, vec![CommitId::from("a"), CommitId::from("b")]);
    }

    #[test]
    fn ancestors_include_self_and_walk_merge_parents() {
        let mut commits = IndexMap::new();
        commits.insert(CommitId::from("root"), commit("root", &[]));
        commits.insert(CommitId::from("a"), commit("a", &["root"]));
        commits.insert(CommitId::from("b"), commit("b", &["root"]));
        commits.insert(CommitId::from("m"), commit("m", &["a", "b"]));

        let graph = CommitGraph::build(&commits);
        let ancestors = graph.ancestors(&CommitId::from("m"));
        assert!(ancestors.contains(&CommitId::from("m")));
        assert!(ancestors.contains(&CommitId::from("a")));
        assert!(ancestors.contains(&CommitId::from("b")));
        assert!(ancestors.contains(&CommitId::from("root")));
        assert_eq!(ancestors.len(), 4);
    }

    #[test]
    fn topo_order_places_parents_before_children() {
        let mut commits = IndexMap::new();
        commits.insert(CommitId::from("root"), commit("root", &[]));
        commits.insert(CommitId::from("a"), commit("a", &["root"]));
        commits.insert(CommitId::from("b"), commit("b", &["root"]));
        commits.insert(CommitId::from("m"), commit("m", &["a", "b"]));

        let graph = CommitGraph::build(&commits);
        let ancestors = graph.ancestors(&CommitId::from("m"));
        let order = graph.topo_order(&ancestors);

        let pos = |id: &str| order.iter().position(|c| c.as_str() == id).unwrap();
        assert_eq!(pos("root"), 0);
        assert!(pos("a") > pos("root"));
        assert!(pos("b") > pos("root"));
        assert!(pos("m") > pos("a"));
        assert!(pos("m") > pos("b"));
    }
}
