//! Recoverable, caller-facing failures.
//!
//! ChronoGraph distinguishes unrecoverable conditions (surfaced here, as
//! `Err`) from locally recoverable ones (a missing entity on a deleting
//! mutator, an unparseable Dijkstra weight, a trivial self-merge), which
//! are instead handled silently and produce an empty or negative result.

use thiserror::Error;

use crate::core::ids::CommitId;

/// Errors surfaced by the ChronoGraph core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChronoGraphError {
    /// `checkout`, `listCommits`, or `merge` referenced a branch name that
    /// does not exist in `Repository::branches`.
    #[error("unknown branch: {name}")]
    UnknownBranch {
        /// The branch name that was looked up.
        name: String,
    },

    /// Three-way merge could not find a commit common to the ancestor sets
    /// of both sides. Should not occur for repositories with a single root
    /// commit, but handled defensively.
    #[error("no common ancestor between {ours} and {theirs}")]
    NoCommonAncestor {
        /// `HEAD_commitId` at the time the merge was requested.
        ours: CommitId,
        /// The tip commit of the branch being merged in.
        theirs: CommitId,
    },
}

/// Convenience alias for fallible ChronoGraph operations.
pub type Result<T> = std::result::Result<T, ChronoGraphError>;
