//! Cycle detection.

use crate::algorithms::topo_sort::topological_sort;
use crate::algorithms::view::GraphView;

/// Whether the graph contains at least one directed cycle (a self-loop
/// counts as a cycle of length one).
///
/// Implemented in terms of [`topological_sort`]: a graph has a cycle
/// exactly when Kahn's algorithm cannot order every node.
pub fn has_cycle(view: &impl GraphView) -> bool {
    topological_sort(view).is_none()
}
