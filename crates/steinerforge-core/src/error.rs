//! Error types for SteinerForge

use thiserror::Error;

use crate::graph::GraphError;
use crate::solution::SolutionError;

/// Main error type for SteinerForge operations
#[derive(Debug, Error)]
pub enum SteinerForgeError {
    /// The instance graph could not be built
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// A solution does not describe a feasible tree
    #[error("Solution error: {0}")]
    Solution(#[from] SolutionError),

    /// Invalid operation for current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for SteinerForge operations
pub type Result<T> = std::result::Result<T, SteinerForgeError>;
