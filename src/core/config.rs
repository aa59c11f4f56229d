//! In-memory configuration for a [`crate::core::graph::Graph`] and a
//! [`crate::core::repository::Repository`].
//!
//! Both configs are plain structs constructed by the caller — there is no
//! persistence layer to read defaults from or write overrides to.

/// Configuration for a [`crate::core::graph::Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    /// How many events must accumulate in the log between checkpoints.
    /// A checkpoint is captured whenever the event log's length becomes a
    /// positive multiple of this value. Defaults to 5000.
    pub checkpoint_interval: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 5000,
        }
    }
}

/// Configuration for a [`crate::core::repository::Repository`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// The name `Repository::init` gives the first branch, which is also
    /// left checked out and pointed at the root commit. Defaults to
    /// `"main"`.
    pub root_branch: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root_branch: "main".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_five_thousand_and_main() {
        assert_eq!(GraphConfig::default().checkpoint_interval, 5000);
        assert_eq!(RepositoryConfig::default().root_branch, "main");
    }
}
