//! Local search entry point.

use steinerforge_config::LocalSearchConfig;
use steinerforge_core::numerics::is_less;
use steinerforge_core::{
    objective, validate_solution, EdgeState, Graph, NodeId, ProblemVariant, SolutionError,
};
use tracing::{debug, info};

use crate::error::LocalSearchError;
use crate::extend::GreedyExtensionPhase;
use crate::key_vertex::KeyVertexPhase;
use crate::phase::Phase;
use crate::scope::SearchScope;
use crate::stats::LocalSearchStats;
use crate::vertex_insertion::VertexInsertionPhase;

/// Result of a local search run.
#[derive(Debug, Clone)]
pub struct LocalSearchOutcome {
    /// `true` if the solution was replaced by a strictly better one.
    pub improved: bool,
    pub initial_objective: f64,
    pub final_objective: f64,
    pub stats: LocalSearchStats,
}

/// Improves feasible Steiner tree solutions in place.
///
/// A run prunes the input, then applies greedy extension (prize-collecting
/// and maximum-weight only), vertex insertion and repeated key-vertex
/// passes (not for maximum-weight). The solution is only overwritten by a
/// feasible tree with a strictly smaller objective.
///
/// # Example
///
/// ```
/// use steinerforge_config::LocalSearchConfig;
/// use steinerforge_core::{EdgeState, Graph, ProblemVariant};
/// use steinerforge_local::LocalSearch;
///
/// // triangle 0 - 1 - 2 with an expensive edge 0 - 2
/// let mut graph = Graph::new(3, ProblemVariant::Steiner);
/// let a = graph.add_edge(0, 1, 1.0).unwrap();
/// let b = graph.add_edge(1, 2, 1.0).unwrap();
/// let c = graph.add_edge(0, 2, 5.0).unwrap();
/// graph.set_root(0).unwrap();
/// graph.set_terminal(1).unwrap();
/// graph.set_terminal(2).unwrap();
///
/// let mut edges = vec![EdgeState::Unknown; graph.arc_count()];
/// edges[a] = EdgeState::Connect;
/// edges[c] = EdgeState::Connect;
///
/// let outcome = LocalSearch::new(LocalSearchConfig::default())
///     .run(&graph, &mut edges)
///     .unwrap();
/// assert!(outcome.improved);
/// assert_eq!(outcome.final_objective, 2.0);
/// assert_eq!(edges[b], EdgeState::Connect);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalSearch {
    config: LocalSearchConfig,
}

impl LocalSearch {
    pub fn new(config: LocalSearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Runs the local search on `edges`.
    ///
    /// Errors leave `edges` untouched. If no strictly better solution is
    /// found, `edges` keeps the input exactly.
    pub fn run(
        &self,
        graph: &Graph,
        edges: &mut [EdgeState],
    ) -> Result<LocalSearchOutcome, LocalSearchError> {
        self.config
            .validate()
            .map_err(|err| LocalSearchError::InvalidConfig(err.to_string()))?;
        validate_solution(graph, edges)?;
        let root = graph.root().map_err(SolutionError::from)?;

        let initial = objective(graph, edges);
        let mut stats = LocalSearchStats::default();
        stats.start();

        if is_trivial(graph, edges, root) {
            debug!(event = "local_search_skip", objective = initial);
            stats.finish();
            return Ok(LocalSearchOutcome {
                improved: false,
                initial_objective: initial,
                final_objective: initial,
                stats,
            });
        }

        info!(
            event = "local_search_start",
            variant = ?graph.variant(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            objective = initial,
        );

        let mut scope = SearchScope::try_new(graph, root, edges)?;
        *scope.stats_mut() = stats;
        let mut phases = self.build_phases(graph)?;

        scope.normalize()?;
        for phase in &mut phases {
            let before = scope.objective();
            debug!(event = "phase_start", phase = phase.phase_type_name(), objective = before);
            phase.solve(&mut scope);
            debug!(
                event = "phase_end",
                phase = phase.phase_type_name(),
                objective = scope.objective(),
                elapsed_ms = scope.elapsed().as_millis() as u64,
            );
        }
        if is_less(scope.objective(), initial) {
            scope.save();
            if scope.normalize().is_err() {
                scope.rollback();
            }
        }

        let (result, value, mut stats) = scope.into_parts();
        stats.finish();
        let improved = is_less(value, initial) && validate_solution(graph, &result).is_ok();
        if improved {
            edges.copy_from_slice(&result);
        }
        let final_objective = if improved { value } else { initial };

        info!(
            event = "local_search_end",
            improved,
            objective = final_objective,
            gain = initial - final_objective,
            passes = stats.passes,
            moves = stats.moves_accepted(),
            elapsed_ms = stats.elapsed().as_millis() as u64,
        );
        Ok(LocalSearchOutcome {
            improved,
            initial_objective: initial,
            final_objective,
            stats,
        })
    }

    fn build_phases(&self, graph: &Graph) -> Result<Vec<Box<dyn Phase>>, LocalSearchError> {
        let config = &self.config;
        let mut phases: Vec<Box<dyn Phase>> = Vec::new();
        if config.greedy_extension.enabled && graph.variant().has_prizes() {
            phases.push(Box::new(GreedyExtensionPhase::try_new(
                graph,
                config.greedy_extension,
            )?));
        }
        if config.moves.vertex_insertion {
            phases.push(Box::new(VertexInsertionPhase::try_new(graph)?));
        }
        if config.moves.any_key_vertex_move() && graph.variant() != ProblemVariant::MaximumWeight {
            phases.push(Box::new(KeyVertexPhase::try_new(
                graph,
                config.max_restarts,
                config.moves,
            )?));
        }
        Ok(phases)
    }
}

fn is_trivial(graph: &Graph, edges: &[EdgeState], root: NodeId) -> bool {
    if graph.degree(root) == 0 {
        return true;
    }
    match graph.variant() {
        ProblemVariant::Steiner => graph.terminal_count() <= 1,
        _ => !edges.contains(&EdgeState::Connect),
    }
}
