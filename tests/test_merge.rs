//! Fast-forward and three-way merge scenarios, including conflict
//! resolution under each [`chronograph::MergePolicy`].

use chronograph::{Attributes, MergePolicy, NodeId, Repository, RepositoryConfig};

fn single_attr(key: &str, value: &str) -> Attributes {
    [(key.to_string(), value.to_string())].into_iter().collect()
}

#[test]
fn merging_an_already_merged_branch_is_a_no_op() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.branch("feature");
    let before = repo.head_commit_id().clone();

    let result = repo.merge("feature", MergePolicy::Ours, 1).unwrap();
    assert_eq!(result.commit_id, before);
    assert!(!result.created_commit);
    assert!(!result.fast_forwarded);
    assert!(result.conflicts.is_empty());
}

#[test]
fn three_way_merge_add_add_conflict_with_attribute_union() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.branch("feature");

    repo.working_graph_mut()
        .add_node("shared", single_attr("owner", "main"), 1);
    repo.commit("add shared on main");

    repo.checkout("feature").unwrap();
    repo.working_graph_mut()
        .add_node("shared", single_attr("reviewer", "feature"), 1);
    repo.commit("add shared on feature");

    repo.checkout("main").unwrap();
    let result = repo
        .merge("feature", MergePolicy::AttributeUnion, 2)
        .unwrap();

    assert_eq!(result.conflicts.len(), 1);
    let node = &repo.working_graph().nodes()[&NodeId::from("shared")];
    assert_eq!(node.attributes.get("owner"), Some(&"main".to_string()));
    assert_eq!(node.attributes.get("reviewer"), Some(&"feature".to_string()));
}

#[test]
fn del_update_conflict_lets_the_update_win_under_attribute_union() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.working_graph_mut()
        .add_node("n1", single_attr("status", "draft"), 1);
    repo.commit("add n1");
    repo.branch("feature");

    repo.working_graph_mut().del_node("n1", 2);
    repo.commit("delete n1 on main");

    repo.checkout("feature").unwrap();
    repo.working_graph_mut()
        .update_node("n1", single_attr("status", "final"), 2);
    repo.commit("update n1 on feature");

    repo.checkout("main").unwrap();
    let result = repo
        .merge("feature", MergePolicy::AttributeUnion, 3)
        .unwrap();

    assert_eq!(result.conflicts.len(), 1);
    assert!(repo.working_graph().nodes().contains_key(&NodeId::from("n1")));
}

#[test]
fn non_overlapping_edge_attribute_updates_do_not_conflict() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.working_graph_mut()
        .add_node("a", Attributes::new(), 1);
    repo.working_graph_mut()
        .add_node("b", Attributes::new(), 1);
    repo.working_graph_mut()
        .add_edge("e1", "a", "b", single_attr("weight", "1"), 1);
    repo.commit("add e1");
    repo.branch("feature");

    repo.working_graph_mut()
        .update_edge("e1", single_attr("weight", "5"), 2);
    repo.commit("reweight on main");

    repo.checkout("feature").unwrap();
    repo.working_graph_mut()
        .update_edge("e1", single_attr("label", "highway"), 2);
    repo.commit("label on feature");

    repo.checkout("main").unwrap();
    let result = repo.merge("feature", MergePolicy::Ours, 3).unwrap();

    assert!(result.conflicts.is_empty());
    let edge = &repo.working_graph().edges()[&chronograph::EdgeId::from("e1")];
    assert_eq!(edge.attributes.get("weight"), Some(&"5".to_string()));
    assert_eq!(edge.attributes.get("label"), Some(&"highway".to_string()));
}

#[test]
fn merge_identical_concurrent_adds_produce_no_conflict() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.branch("feature");

    repo.working_graph_mut()
        .add_node("shared", single_attr("owner", "alice"), 1);
    repo.commit("add shared on main");

    repo.checkout("feature").unwrap();
    repo.working_graph_mut()
        .add_node("shared", single_attr("owner", "alice"), 1);
    repo.commit("add identical shared on feature");

    repo.checkout("main").unwrap();
    let result = repo.merge("feature", MergePolicy::Ours, 2).unwrap();
    assert!(result.conflicts.is_empty());
}

/// A criss-cross history:
///
/// ```text
///       root
///      /    \
///     a      b
///     |\    /|
///     | \  / |
///     |  \/  |
///     |  /\  |
///     | /  \ |
///     m1    m2      m1 = merge(a, b), m2 = merge(b, a)
///     |      |
///     o      t
/// ```
///
/// `a` and `b` are both common ancestors of `o` and `t`, neither is an
/// ancestor of the other, and both have the same ancestor-set size (`root`
/// plus themselves) — picking the base by "most total ancestors" is a
/// coin flip here, but walking `t`'s ancestry tip-to-root and taking the
/// first commit also found in `o`'s ancestry always picks the same one.
#[test]
fn three_way_merge_picks_the_nearer_of_two_incomparable_common_ancestors() {
    let mut repo = Repository::init(RepositoryConfig::default());
    repo.branch("b");

    repo.working_graph_mut()
        .add_node("x", single_attr("tag", "from-a"), 1);
    repo.commit("a");
    repo.branch("a_anchor");

    repo.checkout("b").unwrap();
    repo.working_graph_mut()
        .add_node("x", single_attr("tag", "from-b"), 1);
    repo.commit("b");
    repo.branch("b_anchor");

    repo.checkout("main").unwrap();
    repo.merge("b", MergePolicy::Ours, 2).unwrap(); // main = m1 = merge(a, b)
    repo.working_graph_mut()
        .add_node("o-marker", Attributes::new(), 3);
    repo.commit("o");

    repo.checkout("b_anchor").unwrap();
    repo.merge("a_anchor", MergePolicy::Ours, 2).unwrap(); // b_anchor = m2 = merge(b, a)
    repo.working_graph_mut()
        .add_node("t-marker", Attributes::new(), 3);
    repo.commit("t");

    repo.checkout("main").unwrap();
    let result = repo.merge("b_anchor", MergePolicy::Ours, 4).unwrap();

    assert!(result.created_commit);
    assert!(!result.fast_forwarded);
    // If `b` were picked as the merge base: relative to it, "x" is
    // unchanged on `b_anchor`'s side (still "from-b") and changed on
    // `main`'s side (to "from-a" via m1's own Ours resolution), so the
    // one-sided change wins and "x" ends up "from-a" with no conflict.
    // Picking `a` as the base instead would flip this the other way
    // (`main`'s side unchanged, `b_anchor`'s side changed to "from-b"),
    // so this assertion pins down which of the two incomparable
    // ancestors the tip-to-root walk actually selected.
    assert!(result.conflicts.is_empty());
    let node = &repo.working_graph().nodes()[&NodeId::from("x")];
    assert_eq!(node.attributes.get("tag"), Some(&"from-a".to_string()));

    let nodes = repo.working_graph().nodes();
    for marker in ["o-marker", "t-marker"] {
        assert!(
            nodes.contains_key(&NodeId::from(marker)),
            "expected {marker} to survive the criss-cross merge"
        );
    }
}
