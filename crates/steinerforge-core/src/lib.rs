//! SteinerForge Core - graph model and solution primitives
//!
//! This crate provides the fundamental types shared by the SteinerForge crates:
//! - The undirected [`Graph`] stored as paired arcs, with node kinds and prizes
//! - [`EdgeState`] solutions oriented away from the root
//! - Objective evaluation and structural validation for all problem variants
//! - Numeric tolerance helpers used by every improvement test

pub mod error;
pub mod graph;
pub mod numerics;
pub mod solution;

#[cfg(test)]
mod graph_tests;
#[cfg(test)]
mod solution_tests;

pub use error::{Result, SteinerForgeError};
pub use graph::{flip, EdgeId, Graph, GraphError, NodeId, NodeKind, ProblemVariant};
pub use solution::{
    objective, solution_nodes, validate_solution, EdgeState, SolutionError,
};
