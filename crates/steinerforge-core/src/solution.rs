//! Edge-state solutions and their objective.
//!
//! A solution assigns an [`EdgeState`] to every arc of a [`Graph`]. The
//! `Connect` arcs of a feasible solution form an arborescence rooted at the
//! graph root that spans every terminal.

use std::collections::VecDeque;

use thiserror::Error;

use crate::graph::{flip, EdgeId, Graph, GraphError, NodeId, ProblemVariant};

/// Membership of an arc in a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeState {
    /// The arc is part of the tree, oriented away from the root.
    Connect,
    /// The arc is not part of the tree.
    #[default]
    Unknown,
}

/// Structural defects of a solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolutionError {
    #[error("solution has {actual} arc states, graph has {expected} arcs")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("both orientations of edge {0} are selected")]
    BothOrientations(EdgeId),

    #[error("root {0} has an incoming arc")]
    RootHasParent(NodeId),

    #[error("node {0} has more than one incoming arc")]
    MultipleParents(NodeId),

    #[error("arc {0} is not reachable from the root")]
    Unreachable(EdgeId),

    #[error("terminal {0} is not spanned")]
    MissingTerminal(NodeId),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Checks that `edges` describes a tree rooted at the graph root that spans
/// every terminal.
pub fn validate_solution(graph: &Graph, edges: &[EdgeState]) -> Result<(), SolutionError> {
    if edges.len() != graph.arc_count() {
        return Err(SolutionError::LengthMismatch {
            expected: graph.arc_count(),
            actual: edges.len(),
        });
    }
    let root = graph.root()?;
    let n = graph.node_count();

    let mut has_parent = vec![false; n];
    for e in 0..graph.arc_count() {
        if edges[e] != EdgeState::Connect {
            continue;
        }
        if edges[flip(e)] == EdgeState::Connect {
            return Err(SolutionError::BothOrientations(e / 2));
        }
        let head = graph.head(e);
        if head == root {
            return Err(SolutionError::RootHasParent(root));
        }
        if has_parent[head] {
            return Err(SolutionError::MultipleParents(head));
        }
        has_parent[head] = true;
    }

    let mut reached = vec![false; n];
    reached[root] = true;
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        for &e in graph.out_arcs(node) {
            if edges[e] == EdgeState::Connect && !reached[graph.head(e)] {
                reached[graph.head(e)] = true;
                queue.push_back(graph.head(e));
            }
        }
    }

    if let Some(e) = (0..graph.arc_count())
        .find(|&e| edges[e] == EdgeState::Connect && !reached[graph.tail(e)])
    {
        return Err(SolutionError::Unreachable(e));
    }
    if let Some(t) = graph.terminals().find(|&t| !reached[t]) {
        return Err(SolutionError::MissingTerminal(t));
    }
    Ok(())
}

/// Returns the node mask of a solution: the root plus every endpoint of a
/// `Connect` arc.
pub fn solution_nodes(graph: &Graph, edges: &[EdgeState]) -> Vec<bool> {
    let mut nodes = vec![false; graph.node_count()];
    if let Ok(root) = graph.root() {
        nodes[root] = true;
    }
    for (e, state) in edges.iter().enumerate() {
        if *state == EdgeState::Connect {
            nodes[graph.tail(e)] = true;
            nodes[graph.head(e)] = true;
        }
    }
    nodes
}

/// Objective value of a solution (lower is better).
///
/// - Steiner: total cost of the selected arcs.
/// - Prize-collecting: edge cost plus the prizes of unspanned potential terminals.
/// - Maximum-weight: the negated weight of the spanned nodes.
pub fn objective(graph: &Graph, edges: &[EdgeState]) -> f64 {
    let edge_cost = || -> f64 {
        edges
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == EdgeState::Connect)
            .map(|(e, _)| graph.cost(e))
            .sum()
    };

    match graph.variant() {
        ProblemVariant::Steiner => edge_cost(),
        ProblemVariant::PrizeCollecting => {
            let nodes = solution_nodes(graph, edges);
            let missed: f64 = (0..graph.node_count())
                .filter(|&v| !nodes[v] && graph.is_potential_terminal(v))
                .map(|v| graph.prize(v))
                .sum();
            edge_cost() + missed
        }
        ProblemVariant::MaximumWeight => {
            let nodes = solution_nodes(graph, edges);
            -(0..graph.node_count())
                .filter(|&v| nodes[v])
                .map(|v| graph.prize(v))
                .sum::<f64>()
        }
    }
}
