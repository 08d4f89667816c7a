//! Error types for the local search.

use std::collections::TryReserveError;

use steinerforge_core::{NodeId, SolutionError};
use thiserror::Error;

/// Errors raised by [`LocalSearch::run`](crate::LocalSearch::run).
#[derive(Debug, Error)]
pub enum LocalSearchError {
    /// The input solution is not a feasible tree.
    #[error("invalid input solution: {0}")]
    InvalidInput(#[from] SolutionError),

    /// Scratch memory could not be reserved.
    #[error("failed to allocate local search scratch space: {0}")]
    Allocation(#[from] TryReserveError),

    /// A node set could not be turned back into a tree.
    #[error("pruning failed: {0}")]
    Prune(#[from] PruneError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while rebuilding a tree from a node set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PruneError {
    #[error("node {0} is not connected to the root inside the node set")]
    Disconnected(NodeId),

    #[error("graph has no root")]
    MissingRoot,
}

/// Inconsistent tree state met while collecting the key paths of a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StarPathsError {
    #[error("non-terminal leaf {0} on a key path")]
    DanglingLeaf(NodeId),

    #[error("node {0} has no parent in the tree")]
    MissingParent(NodeId),
}
