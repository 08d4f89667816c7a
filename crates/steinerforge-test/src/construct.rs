//! Shortest-path construction of feasible trees.
//!
//! Starting from the root, the nearest unconnected target is attached by its
//! shortest path to the current tree until all targets are spanned. Targets
//! are the terminals, plus the potential terminals on prize-collecting and
//! maximum-weight instances.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use steinerforge_core::{EdgeId, EdgeState, Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    dist: f64,
    node: NodeId,
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Builds a feasible solution by repeated shortest-path attachment.
///
/// Targets unreachable from the root are skipped, so the result only fails
/// validation if a terminal is disconnected.
///
/// # Example
///
/// ```
/// use steinerforge_core::validate_solution;
/// use steinerforge_test::{grid::grid, shortest_path_tree};
///
/// let graph = grid(3, 3, |_, _| 1.0);
/// let edges = shortest_path_tree(&graph);
/// assert!(validate_solution(&graph, &edges).is_ok());
/// ```
pub fn shortest_path_tree(graph: &Graph) -> Vec<EdgeState> {
    let n = graph.node_count();
    let mut edges = vec![EdgeState::Unknown; graph.arc_count()];
    let Ok(root) = graph.root() else {
        return edges;
    };
    let is_target = |v: NodeId| {
        graph.is_terminal(v) || (graph.variant().has_prizes() && graph.is_potential_terminal(v))
    };

    let mut in_tree = vec![false; n];
    in_tree[root] = true;
    let mut dist = vec![f64::INFINITY; n];
    let mut pred: Vec<Option<EdgeId>> = vec![None; n];
    let mut queue = BinaryHeap::new();

    loop {
        dist.fill(f64::INFINITY);
        pred.fill(None);
        queue.clear();
        for v in (0..n).filter(|&v| in_tree[v]) {
            dist[v] = 0.0;
            queue.push(Entry { dist: 0.0, node: v });
        }

        let mut target = None;
        while let Some(Entry { dist: d, node }) = queue.pop() {
            if d > dist[node] {
                continue;
            }
            if !in_tree[node] && is_target(node) {
                target = Some(node);
                break;
            }
            for &e in graph.out_arcs(node) {
                let m = graph.head(e);
                let candidate = d + graph.cost(e);
                if candidate < dist[m] {
                    dist[m] = candidate;
                    pred[m] = Some(e);
                    queue.push(Entry {
                        dist: candidate,
                        node: m,
                    });
                }
            }
        }

        let Some(mut node) = target else {
            break;
        };
        while !in_tree[node] {
            in_tree[node] = true;
            let Some(e) = pred[node] else {
                break;
            };
            edges[e] = EdgeState::Connect;
            node = graph.tail(e);
        }
    }
    edges
}
