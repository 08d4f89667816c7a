//! Hand-made instances with known local search outcomes.
//!
//! # Example
//!
//! ```
//! use steinerforge_core::objective;
//! use steinerforge_test::scenarios::star_with_shortcut;
//!
//! let instance = star_with_shortcut();
//! assert_eq!(objective(&instance.graph, &instance.edges), 15.0);
//! ```

use steinerforge_core::{EdgeId, EdgeState, Graph, ProblemVariant};

/// A graph together with a feasible solution.
#[derive(Debug, Clone)]
pub struct Instance {
    pub graph: Graph,
    pub edges: Vec<EdgeState>,
}

impl Instance {
    /// Builds an instance from `(tail, head, cost)` edges; the listed edge
    /// indices are selected in their `tail → head` orientation.
    pub fn build(
        mut graph: Graph,
        edges: &[(usize, usize, f64)],
        selected: &[usize],
    ) -> Self {
        let arcs: Vec<EdgeId> = edges
            .iter()
            .map(|&(tail, head, cost)| {
                graph
                    .add_edge(tail, head, cost)
                    .expect("fixture edges are valid")
            })
            .collect();
        let mut states = vec![EdgeState::Unknown; graph.arc_count()];
        for &i in selected {
            states[arcs[i]] = EdgeState::Connect;
        }
        Self {
            graph,
            edges: states,
        }
    }

    /// Replaces the solution by the given arcs.
    pub fn with_selected(mut self, arcs: &[EdgeId]) -> Self {
        self.edges.fill(EdgeState::Unknown);
        for &e in arcs {
            self.edges[e] = EdgeState::Connect;
        }
        self
    }

    /// Arcs selected in the solution.
    pub fn selected_arcs(&self) -> Vec<EdgeId> {
        selected_arcs(&self.edges)
    }
}

/// Returns the `Connect` arcs of `edges` in increasing order.
pub fn selected_arcs(edges: &[EdgeState]) -> Vec<EdgeId> {
    edges
        .iter()
        .enumerate()
        .filter(|(_, state)| **state == EdgeState::Connect)
        .map(|(e, _)| e)
        .collect()
}

fn steiner_graph(nodes: usize, root: usize, terminals: &[usize]) -> Graph {
    let mut graph = Graph::new(nodes, ProblemVariant::Steiner);
    graph.set_root(root).expect("root in range");
    for &t in terminals {
        graph.set_terminal(t).expect("terminal in range");
    }
    graph
}

/// Path 0 - 1 - 2 - 3 with unit costs and terminals at both ends.
///
/// The selected path is optimal.
pub fn path_no_op() -> Instance {
    Instance::build(
        steiner_graph(4, 0, &[3]),
        &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)],
        &[0, 1, 2],
    )
}

/// Steiner node 2 joins terminals 0, 1 and 3 at cost 5 each; terminals 0
/// and 1 share a direct edge of cost 1.
///
/// The star costs 15; replacing the edge 2 - 1 by 0 - 1 gives 11.
pub fn star_with_shortcut() -> Instance {
    Instance::build(
        steiner_graph(4, 0, &[1, 3]),
        &[(2, 0, 5.0), (2, 1, 5.0), (2, 3, 5.0), (0, 1, 1.0)],
        &[],
    )
    .with_selected(&[1, 2, 4])
}

/// Two Steiner hubs 3 and 4 over root 0 and terminals 1, 2.
///
/// The tree through hub 3 costs 12; the one through hub 4 costs 3.
pub fn two_hubs() -> Instance {
    Instance::build(
        steiner_graph(5, 0, &[1, 2]),
        &[
            (0, 3, 4.0),
            (3, 1, 4.0),
            (3, 2, 4.0),
            (0, 4, 1.0),
            (4, 1, 1.0),
            (4, 2, 1.0),
        ],
        &[0, 1, 2],
    )
}

/// Prize-collecting instance where potential terminal 3 (prize 10) lies on
/// the boundary paths to both terminals 1 and 2.
///
/// The input routes through Steiner node 4 for 9 plus the missed prize.
/// The optimum `0 - 3 - {1, 2}` costs 5.
pub fn shared_prize() -> Instance {
    let mut graph = Graph::new(5, ProblemVariant::PrizeCollecting);
    graph.set_root(0).expect("root in range");
    graph.set_terminal(1).expect("terminal in range");
    graph.set_terminal(2).expect("terminal in range");
    graph
        .set_potential_terminal(3, 10.0)
        .expect("prize is valid");
    Instance::build(
        graph,
        &[
            (0, 3, 1.0),
            (3, 1, 2.0),
            (3, 2, 2.0),
            (0, 4, 3.0),
            (4, 1, 3.0),
            (4, 2, 3.0),
        ],
        &[3, 4, 5],
    )
}
