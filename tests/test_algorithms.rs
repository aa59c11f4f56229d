//! Graph algorithms exercised against the shared fixtures, including a
//! property test that any DAG produced by `arb_dag` is always acyclic.

use chronograph::algorithms::{
    has_cycle, is_reachable, is_reachable_at, is_time_respecting_reachable,
    shortest_path_unweighted, shortest_path_weighted, strongly_connected_components,
    topological_sort, weakly_connected_components,
};
use chronograph::Snapshot;
use chronograph::testing::{arb_dag, cycle_graph, diamond_graph, disconnected_pair_graph, parallel_edge_graph};
use chronograph::NodeId;
use proptest::prelude::*;

#[test]
fn diamond_is_reachable_end_to_end_but_not_backwards() {
    let g = diamond_graph();
    assert!(is_reachable(&g, &NodeId::from("a"), &NodeId::from("d")));
    assert!(!is_reachable(&g, &NodeId::from("d"), &NodeId::from("a")));
    assert!(is_reachable(&g, &NodeId::from("a"), &NodeId::from("a")));
}

#[test]
fn reachability_on_missing_source_is_false_not_an_error() {
    let g = diamond_graph();
    assert!(!is_reachable(&g, &NodeId::from("ghost"), &NodeId::from("a")));
}

#[test]
fn disconnected_nodes_are_not_reachable() {
    let g = disconnected_pair_graph();
    assert!(!is_reachable(&g, &NodeId::from("a"), &NodeId::from("b")));
}

#[test]
fn unweighted_shortest_path_through_diamond_has_three_nodes() {
    let g = diamond_graph();
    let path = shortest_path_unweighted(&g, &NodeId::from("a"), &NodeId::from("d")).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[0], NodeId::from("a"));
    assert_eq!(path[2], NodeId::from("d"));
}

#[test]
fn weighted_shortest_path_picks_the_cheaper_parallel_edge() {
    let g = parallel_edge_graph("2", "5");
    let (cost, _) =
        shortest_path_weighted(&g, &NodeId::from("a"), &NodeId::from("b"), "weight").unwrap();
    assert_eq!(cost, 2.0);
}

#[test]
fn cycle_graph_is_detected_as_cyclic_and_has_no_topo_order() {
    let g = cycle_graph();
    assert!(has_cycle(&g));
    assert!(topological_sort(&g).is_none());
}

#[test]
fn diamond_has_a_valid_topo_order() {
    let g = diamond_graph();
    let order = topological_sort(&g).unwrap();
    let pos = |id: &str| order.iter().position(|n| n == &NodeId::from(id)).unwrap();
    assert!(pos("a") < pos("b"));
    assert!(pos("a") < pos("c"));
    assert!(pos("b") < pos("d"));
    assert!(pos("c") < pos("d"));
}

#[test]
fn time_respecting_reachability_blocks_edges_going_backward_in_time() {
    use chronograph::{Attributes, Graph};

    let mut g = Graph::new();
    for id in ["a", "b", "c"] {
        g.add_node(id, Attributes::new(), 1);
    }
    // b -> c was created before a -> b: travelling a -> b -> c would
    // require going backward in time through the second edge.
    g.add_edge("e_bc", "b", "c", Attributes::new(), 1);
    g.add_edge("e_ab", "a", "b", Attributes::new(), 10);

    assert!(is_reachable(&g, &NodeId::from("a"), &NodeId::from("c")));
    assert!(!is_time_respecting_reachable(
        &g,
        &NodeId::from("a"),
        &NodeId::from("c")
    ));
}

#[test]
fn weakly_connected_components_group_the_diamond_but_split_the_disconnected_pair() {
    let diamond = diamond_graph();
    assert_eq!(weakly_connected_components(&diamond).len(), 1);

    let pair = disconnected_pair_graph();
    assert_eq!(weakly_connected_components(&pair).len(), 2);
}

#[test]
fn strongly_connected_components_collapse_the_cycle_into_one() {
    let g = cycle_graph();
    let sccs = strongly_connected_components(&g);
    assert_eq!(sccs.len(), 1);
    assert_eq!(sccs[0].len(), 3);
}

#[test]
fn strongly_connected_components_of_a_dag_are_all_singletons() {
    let g = diamond_graph();
    let sccs = strongly_connected_components(&g);
    assert_eq!(sccs.len(), 4);
    assert!(sccs.iter().all(|c| c.len() == 1));
}

proptest! {
    #[test]
    fn arb_dag_always_has_a_topological_order(g in arb_dag(8)) {
        prop_assert!(topological_sort(&g).is_some());
        prop_assert!(!has_cycle(&g));
    }

    #[test]
    fn is_reachable_at_agrees_with_reachability_over_an_explicit_snapshot(
        g in arb_dag(8),
        t in -5i64..5i64,
    ) {
        for source in g.nodes().keys() {
            for target in g.nodes().keys() {
                prop_assert_eq!(
                    is_reachable_at(&g, source, target, t),
                    is_reachable(&Snapshot::at(&g, t), source, target)
                );
            }
        }
    }
}
