//! Local search entry points that hide the wiring.

use steinerforge_config::LocalSearchConfig;
use steinerforge_core::{EdgeState, Graph};
use steinerforge_local::{LocalSearch, LocalSearchError, LocalSearchOutcome};

/// Improves `edges` in place with the configuration from `local_search.toml`,
/// or the defaults if the file is missing.
pub fn improve(
    graph: &Graph,
    edges: &mut [EdgeState],
) -> Result<LocalSearchOutcome, LocalSearchError> {
    let config = LocalSearchConfig::load("local_search.toml").unwrap_or_default();
    improve_with(graph, edges, config)
}

/// Improves `edges` in place with an explicit configuration.
pub fn improve_with(
    graph: &Graph,
    edges: &mut [EdgeState],
    config: LocalSearchConfig,
) -> Result<LocalSearchOutcome, LocalSearchError> {
    LocalSearch::new(config).run(graph, edges)
}
