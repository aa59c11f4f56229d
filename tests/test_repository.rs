//! End-to-end tests for commits, branches, and checkout.

use chronograph::{Attributes, Repository, RepositoryConfig};

#[test]
fn init_leaves_a_single_root_commit_checked_out() {
    let repo = Repository::init(RepositoryConfig::default());
    assert_eq!(repo.head(), "main");
    let commits = repo.list_commits("main").unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(&commits[0], repo.head_commit_id());
}

#[test]
fn checkout_unknown_branch_is_an_error() {
    let mut repo = Repository::init(RepositoryConfig::default());
    let err = repo.checkout("does-not-exist").unwrap_err();
    assert!(matches!(
        err,
        chronograph::ChronoGraphError::UnknownBranch { .. }
    ));
}

#[test]
fn linear_history_grows_with_each_commit() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.working_graph_mut().add_node("n1", Attributes::new(), 1);
    repo.commit("first");
    repo.working_graph_mut().add_node("n2", Attributes::new(), 2);
    repo.commit("second");

    let commits = repo.list_commits("main").unwrap();
    assert_eq!(commits.len(), 3);
    assert_eq!(repo.working_graph().nodes().len(), 2);
}

#[test]
fn branch_does_not_move_head() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.branch("feature");
    assert_eq!(repo.head(), "main");
    let branches: std::collections::HashMap<&str, _> = repo.list_branches().into_iter().collect();
    assert_eq!(branches["main"], branches["feature"]);
}

#[test]
fn checkout_rebuilds_working_graph_on_divergent_history() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.branch("feature");

    repo.working_graph_mut().add_node("on-main", Attributes::new(), 1);
    repo.commit("main work");

    repo.checkout("feature").unwrap();
    assert!(repo.working_graph().nodes().is_empty());

    repo.working_graph_mut().add_node("on-feature", Attributes::new(), 2);
    repo.commit("feature work");

    repo.checkout("main").unwrap();
    assert_eq!(repo.working_graph().nodes().len(), 1);
    assert!(repo
        .working_graph()
        .nodes()
        .contains_key(&chronograph::NodeId::from("on-main")));
}
