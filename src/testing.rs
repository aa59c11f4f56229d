//! Fixture graphs and property-test strategies shared across this crate's
//! test suites: a handful of small named graphs built by hand, plus a
//! `proptest` strategy for generating arbitrary ones.

use proptest::prelude::*;

use crate::core::event::Attributes;
use crate::core::graph::Graph;

/// A diamond: `a -> b -> d` and `a -> c -> d`, two distinct paths between
/// the same endpoints.
pub fn diamond_graph() -> Graph {
    let mut g = Graph::new();
    for id in ["a", "b", "c", "d"] {
        g.add_node(id, Attributes::new(), 1);
    }
    g.add_edge("e_ab", "a", "b", Attributes::new(), 1);
    g.add_edge("e_ac", "a", "c", Attributes::new(), 1);
    g.add_edge("e_bd", "b", "d", Attributes::new(), 1);
    g.add_edge("e_cd", "c", "d", Attributes::new(), 1);
    g
}

/// A three-node cycle: `a -> b -> c -> a`.
pub fn cycle_graph() -> Graph {
    let mut g = Graph::new();
    for id in ["a", "b", "c"] {
        g.add_node(id, Attributes::new(), 1);
    }
    g.add_edge("e_ab", "a", "b", Attributes::new(), 1);
    g.add_edge("e_bc", "b", "c", Attributes::new(), 1);
    g.add_edge("e_ca", "c", "a", Attributes::new(), 1);
    g
}

/// Two nodes with no edge between them.
pub fn disconnected_pair_graph() -> Graph {
    let mut g = Graph::new();
    g.add_node("a", Attributes::new(), 1);
    g.add_node("b", Attributes::new(), 1);
    g
}

/// Two nodes joined by two edges carrying different `weight` attributes,
/// for exercising the "parallel edges take the minimum" Dijkstra rule.
pub fn parallel_edge_graph(cheap_weight: &str, expensive_weight: &str) -> Graph {
    let mut g = Graph::new();
    g.add_node("a", Attributes::new(), 1);
    g.add_node("b", Attributes::new(), 1);
    g.add_edge(
        "e_expensive",
        "a",
        "b",
        [("weight".to_string(), expensive_weight.to_string())]
            .into_iter()
            .collect(),
        1,
    );
    g.add_edge(
        "e_cheap",
        "a",
        "b",
        [("weight".to_string(), cheap_weight.to_string())]
            .into_iter()
            .collect(),
        2,
    );
    g
}

/// A `proptest` strategy generating a small acyclic graph: `node_count`
/// nodes named `n0..nk`, with edges only from a lower-numbered node to a
/// higher-numbered one, guaranteeing the result is always a DAG.
pub fn arb_dag(max_nodes: usize) -> impl Strategy<Value = Graph> {
    (2..=max_nodes).prop_flat_map(|node_count| {
        let max_edges = node_count * (node_count - 1) / 2;
        prop::collection::vec(0..max_edges.max(1), 0..=max_edges).prop_map(move |edge_picks| {
            let mut g = Graph::new();
            for i in 0..node_count {
                g.add_node(format!("n{i}").as_str(), Attributes::new(), 1);
            }
            let mut candidates = Vec::with_capacity(max_edges);
            for i in 0..node_count {
                for j in (i + 1)..node_count {
                    candidates.push((i, j));
                }
            }
            for (edge_index, pick) in edge_picks.iter().enumerate() {
                if candidates.is_empty() {
                    break;
                }
                let (from, to) = candidates[pick % candidates.len()];
                g.add_edge(
                    format!("e{edge_index}").as_str(),
                    format!("n{from}").as_str(),
                    format!("n{to}").as_str(),
                    Attributes::new(),
                    1,
                );
            }
            g
        })
    })
}

/// Install a `tracing-subscriber` `fmt` layer for the current test binary,
/// filtered by `RUST_LOG` (defaulting to showing nothing), so a developer
/// can re-run a failing test with `RUST_LOG=chronograph=trace` and see the
/// `#[instrument]`ed mutator/merge/checkout spans. Safe to call from every
/// test; only the first call actually installs a subscriber.
#[cfg(test)]
pub fn init_test_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
