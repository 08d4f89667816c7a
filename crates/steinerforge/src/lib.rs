//! SteinerForge - local search for Steiner tree problems in Rust
//!
//! Hand over a graph and a feasible tree; get back a tree that is at least
//! as good.
//!
//! # Example
//!
//! ```rust
//! use steinerforge::prelude::*;
//!
//! // root 0 reaches terminal 2 directly at cost 5 or through 1 at cost 2
//! let mut graph = Graph::new(3, ProblemVariant::Steiner);
//! graph.add_edge(0, 1, 1.0).unwrap();
//! graph.add_edge(1, 2, 1.0).unwrap();
//! let direct = graph.add_edge(0, 2, 5.0).unwrap();
//! graph.set_root(0).unwrap();
//! graph.set_terminal(2).unwrap();
//!
//! let mut edges = vec![EdgeState::Unknown; graph.arc_count()];
//! edges[direct] = EdgeState::Connect;
//!
//! let outcome = steinerforge::improve(&graph, &mut edges).unwrap();
//! assert!(outcome.improved);
//! assert_eq!(outcome.final_objective, 2.0);
//! ```

pub mod console;

mod improve;
pub use improve::{improve, improve_with};

// Graph model and solutions
pub use steinerforge_core::{
    flip, objective, solution_nodes, validate_solution, EdgeId, EdgeState, Graph, GraphError,
    NodeId, NodeKind, ProblemVariant, SolutionError,
};

// Configuration
pub use steinerforge_config::{ConfigError, GreedyExtensionConfig, LocalSearchConfig, MoveConfig};

// Local search
pub use steinerforge_local::{
    prune_solution, LocalSearch, LocalSearchError, LocalSearchOutcome, LocalSearchStats,
};

/// Building blocks for driving individual phases.
pub mod phases {
    pub use steinerforge_local::{
        DynamicTree, GreedyExtensionPhase, KeyVertexPhase, Phase, PrizeChain, Pruner,
        SearchScope, VertexInsertionPhase,
    };
}

pub mod prelude {
    pub use super::{
        EdgeState, Graph, LocalSearch, LocalSearchConfig, LocalSearchOutcome, MoveConfig,
        ProblemVariant,
    };
}
