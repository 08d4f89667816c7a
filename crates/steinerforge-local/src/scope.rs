//! Working state shared by the phases of one run.

use std::collections::TryReserveError;
use std::time::Instant;

use steinerforge_core::numerics::is_less;
use steinerforge_core::{objective, validate_solution, EdgeState, Graph, NodeId};

use crate::error::PruneError;
use crate::prune::Pruner;
use crate::scratch::try_filled;
use crate::stats::LocalSearchStats;

/// Working solution, its objective and a rollback point.
///
/// # Type Parameters
/// * `'g` - Lifetime of the graph being searched
pub struct SearchScope<'g> {
    graph: &'g Graph,
    root: NodeId,
    edges: Vec<EdgeState>,
    objective: f64,
    saved: Vec<EdgeState>,
    saved_objective: f64,
    pruner: Pruner,
    stats: LocalSearchStats,
    start_time: Instant,
}

impl<'g> SearchScope<'g> {
    /// Creates a scope holding a copy of `edges`.
    pub fn try_new(
        graph: &'g Graph,
        root: NodeId,
        edges: &[EdgeState],
    ) -> Result<Self, TryReserveError> {
        let mut working = try_filled(EdgeState::Unknown, edges.len())?;
        working.copy_from_slice(edges);
        let mut saved = try_filled(EdgeState::Unknown, edges.len())?;
        saved.copy_from_slice(edges);
        let objective = objective(graph, edges);
        Ok(Self {
            graph,
            root,
            edges: working,
            objective,
            saved,
            saved_objective: objective,
            pruner: Pruner::try_new(graph)?,
            stats: LocalSearchStats::default(),
            start_time: Instant::now(),
        })
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn edges(&self) -> &[EdgeState] {
        &self.edges
    }

    /// Objective of the working solution as of the last refresh.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn stats(&self) -> &LocalSearchStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut LocalSearchStats {
        &mut self.stats
    }

    /// Returns the working solution and the statistics for in-place edits.
    ///
    /// Callers must [`refresh_objective`](Self::refresh_objective) or
    /// [`normalize`](Self::normalize) after editing.
    pub fn parts_mut(&mut self) -> (&mut [EdgeState], &mut LocalSearchStats) {
        (&mut self.edges, &mut self.stats)
    }

    pub fn refresh_objective(&mut self) -> f64 {
        self.objective = objective(self.graph, &self.edges);
        self.objective
    }

    /// Records the current solution as the rollback point.
    pub fn save(&mut self) {
        self.saved.copy_from_slice(&self.edges);
        self.saved_objective = self.objective;
    }

    /// Returns to the last rollback point.
    pub fn rollback(&mut self) {
        self.edges.copy_from_slice(&self.saved);
        self.objective = self.saved_objective;
    }

    /// Prunes the working solution and refreshes its objective.
    pub fn normalize(&mut self) -> Result<f64, PruneError> {
        self.pruner.prune(self.graph, &mut self.edges)?;
        Ok(self.refresh_objective())
    }

    /// Writes the pruned tree over `nodes` into `out`.
    pub fn prune_into(&mut self, nodes: &[bool], out: &mut [EdgeState]) -> Result<(), PruneError> {
        self.pruner.prune_node_set(self.graph, nodes, out)
    }

    /// Replaces the working solution.
    pub fn replace(&mut self, edges: &[EdgeState]) {
        self.edges.copy_from_slice(edges);
        self.refresh_objective();
    }

    /// Normalizes the working solution and keeps it only if it is feasible
    /// and strictly better than the rollback point.
    ///
    /// Returns `true` if the solution was kept.
    pub fn commit_if_improved(&mut self) -> bool {
        let kept = match self.normalize() {
            Ok(value) => {
                validate_solution(self.graph, &self.edges).is_ok()
                    && is_less(value, self.saved_objective)
            }
            Err(_) => false,
        };
        if !kept {
            self.rollback();
            self.stats.rollbacks += 1;
        }
        kept
    }

    /// Time since the scope was created.
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub(crate) fn into_parts(self) -> (Vec<EdgeState>, f64, LocalSearchStats) {
        (self.edges, self.objective, self.stats)
    }
}

/// Marks the root and every endpoint of a `Connect` arc in `mask`.
pub(crate) fn mark_tree_nodes(graph: &Graph, edges: &[EdgeState], root: NodeId, mask: &mut [bool]) {
    mask.fill(false);
    mask[root] = true;
    for (e, state) in edges.iter().enumerate() {
        if *state == EdgeState::Connect {
            mask[graph.tail(e)] = true;
            mask[graph.head(e)] = true;
        }
    }
}
