//! Greedy extension for prize-collecting and maximum-weight instances.
//!
//! Shortest paths are grown from the current tree. The unreached prized
//! nodes with the largest `prize - distance` are attached one at a time;
//! the first attachment that lowers the objective after pruning is kept and
//! the round restarts from the extended tree.

use std::collections::TryReserveError;

use steinerforge_config::GreedyExtensionConfig;
use steinerforge_core::numerics::is_less;
use steinerforge_core::{objective, EdgeState, Graph, NodeId, ProblemVariant};
use tracing::{debug, trace};

use crate::active::ActiveSet;
use crate::phase::Phase;
use crate::scope::{mark_tree_nodes, SearchScope};
use crate::scratch::{try_filled, try_with_capacity};
use crate::voronoi::VoronoiDiagram;

/// Attaches profitable prized nodes to the tree.
#[derive(Debug)]
pub struct GreedyExtensionPhase {
    config: GreedyExtensionConfig,
    voronoi: VoronoiDiagram,
    active: ActiveSet,
    arc_cost: Vec<f64>,
    nodes: Vec<bool>,
    trial_nodes: Vec<bool>,
    trial: Vec<EdgeState>,
    candidates: Vec<(f64, NodeId)>,
}

impl GreedyExtensionPhase {
    pub fn try_new(graph: &Graph, config: GreedyExtensionConfig) -> Result<Self, TryReserveError> {
        let n = graph.node_count();
        let mut arc_cost = try_with_capacity(graph.arc_count())?;
        match graph.variant() {
            ProblemVariant::MaximumWeight => arc_cost.extend(
                (0..graph.arc_count()).map(|e| (-graph.prize(graph.head(e))).max(0.0)),
            ),
            _ => arc_cost.extend_from_slice(graph.costs()),
        }
        Ok(Self {
            config,
            voronoi: VoronoiDiagram::try_new(n)?,
            active: ActiveSet::try_new(n)?,
            arc_cost,
            nodes: try_filled(false, n)?,
            trial_nodes: try_filled(false, n)?,
            trial: try_filled(EdgeState::Unknown, graph.arc_count())?,
            candidates: try_with_capacity(n)?,
        })
    }

    fn collect_candidates(&mut self, graph: &Graph, limit: usize) {
        self.candidates.clear();
        for v in 0..graph.node_count() {
            if self.nodes[v] || !graph.is_potential_terminal(v) || self.voronoi.base(v).is_none() {
                continue;
            }
            let score = graph.prize(v) - self.voronoi.dist(v);
            if score > 0.0 {
                self.candidates.push((score, v));
            }
        }
        self.candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        self.candidates.truncate(limit);
    }

    /// Tries the candidates in order and keeps the first improving one.
    fn extend_once(&mut self, scope: &mut SearchScope<'_>) -> Option<NodeId> {
        let graph = scope.graph();
        for i in 0..self.candidates.len() {
            let target = self.candidates[i].1;
            self.trial_nodes.copy_from_slice(&self.nodes);
            self.trial_nodes[target] = true;
            for arc in self.voronoi.path_arcs(graph, target) {
                self.trial_nodes[graph.tail(arc)] = true;
            }
            if scope.prune_into(&self.trial_nodes, &mut self.trial).is_err() {
                continue;
            }
            let value = objective(graph, &self.trial);
            if is_less(value, scope.objective()) {
                trace!(
                    event = "move",
                    kind = "greedy_extension",
                    node = target,
                    gain = scope.objective() - value,
                );
                scope.replace(&self.trial);
                return Some(target);
            }
        }
        None
    }
}

impl Phase for GreedyExtensionPhase {
    fn solve(&mut self, scope: &mut SearchScope<'_>) {
        let graph = scope.graph();
        if !self.config.enabled || !graph.variant().has_prizes() {
            return;
        }
        let limit = match graph.variant() {
            ProblemVariant::MaximumWeight => self.config.extensions_mw,
            _ => self.config.extensions,
        };
        let root = scope.root();
        let before = scope.objective();
        let mut steps = 0u64;

        for _ in 0..self.config.max_restarts {
            mark_tree_nodes(graph, scope.edges(), root, &mut self.nodes);
            self.active.reset(graph, root);
            self.voronoi
                .compute(graph, &self.arc_cost, &self.nodes, &self.active);
            self.collect_candidates(graph, limit);
            if self.extend_once(scope).is_none() {
                break;
            }
            steps += 1;
        }

        scope.stats_mut().extension_steps += steps;
        debug!(
            event = "greedy_extension_end",
            steps,
            objective = scope.objective(),
            gain = before - scope.objective(),
        );
    }

    fn phase_type_name(&self) -> &'static str {
        "GreedyExtension"
    }
}

#[cfg(test)]
mod tests {
    use steinerforge_core::validate_solution;

    use super::*;

    fn run(graph: &Graph, config: GreedyExtensionConfig) -> (Vec<EdgeState>, f64, u64) {
        let edges = vec![EdgeState::Unknown; graph.arc_count()];
        let mut scope = SearchScope::try_new(graph, 0, &edges).unwrap();
        let mut phase = GreedyExtensionPhase::try_new(graph, config).unwrap();
        phase.solve(&mut scope);
        (
            scope.edges().to_vec(),
            scope.objective(),
            scope.stats().extension_steps,
        )
    }

    #[test]
    fn test_attaches_profitable_prize() {
        let mut graph = Graph::new(3, ProblemVariant::PrizeCollecting);
        graph.add_edge(0, 1, 3.0).unwrap();
        graph.add_edge(0, 2, 4.0).unwrap();
        graph.set_root(0).unwrap();
        graph.set_potential_terminal(1, 10.0).unwrap();
        graph.set_potential_terminal(2, 1.0).unwrap();

        let (edges, value, steps) = run(&graph, GreedyExtensionConfig::default());
        assert_eq!(steps, 1);
        assert_eq!(value, 4.0);
        assert_eq!(edges[0], EdgeState::Connect);
        assert!(validate_solution(&graph, &edges).is_ok());
    }

    #[test]
    fn test_weighted_path_through_negative_node() {
        let mut graph = Graph::new(3, ProblemVariant::MaximumWeight);
        graph.add_edge(0, 1, 0.0).unwrap();
        graph.add_edge(1, 2, 0.0).unwrap();
        graph.set_root(0).unwrap();
        graph.set_weight(1, -2.0).unwrap();
        graph.set_weight(2, 5.0).unwrap();

        let (edges, value, steps) = run(&graph, GreedyExtensionConfig::default());
        assert_eq!(steps, 1);
        assert_eq!(value, -3.0);
        assert!(validate_solution(&graph, &edges).is_ok());
    }

    #[test]
    fn test_disabled_extension_is_noop() {
        let mut graph = Graph::new(2, ProblemVariant::PrizeCollecting);
        graph.add_edge(0, 1, 1.0).unwrap();
        graph.set_root(0).unwrap();
        graph.set_potential_terminal(1, 10.0).unwrap();

        let config = GreedyExtensionConfig {
            enabled: false,
            ..GreedyExtensionConfig::default()
        };
        let (edges, value, steps) = run(&graph, config);
        assert_eq!(steps, 0);
        assert_eq!(value, 10.0);
        assert!(edges.iter().all(|s| *s == EdgeState::Unknown));
    }

    #[test]
    fn test_unprofitable_prize_skipped() {
        let mut graph = Graph::new(2, ProblemVariant::PrizeCollecting);
        graph.add_edge(0, 1, 5.0).unwrap();
        graph.set_root(0).unwrap();
        graph.set_potential_terminal(1, 2.0).unwrap();

        let (_, value, steps) = run(&graph, GreedyExtensionConfig::default());
        assert_eq!(steps, 0);
        assert_eq!(value, 2.0);
    }
}
