//! SteinerForge Local - key-vertex local search for Steiner trees
//!
//! This crate improves feasible solutions of the Steiner tree problem and its
//! prize-collecting and maximum-weight variants:
//! - Vertex insertion over a link-cut tree
//! - Key-path exchange and key-vertex elimination driven by Voronoi regions,
//!   meldable boundary-edge heaps and a supergraph spanning tree
//! - Greedy extension towards profitable prized nodes
//! - Spanning-tree pruning used after every phase
//!
//! [`LocalSearch`] runs the phases in order; each phase can also be driven
//! directly through a [`SearchScope`].

mod active;
mod boundary;
pub mod dynamic_tree;
pub mod error;
pub mod extend;
mod heap;
mod key_path;
pub mod key_vertex;
pub mod phase;
mod prize;
pub mod prune;
pub mod scope;
mod scratch;
pub mod search;
pub mod stats;
mod supergraph;
mod traversal;
mod union_find;
pub mod vertex_insertion;
mod voronoi;

pub use dynamic_tree::{DynamicTree, PrizeChain};
pub use error::{LocalSearchError, PruneError, StarPathsError};
pub use extend::GreedyExtensionPhase;
pub use key_vertex::KeyVertexPhase;
pub use phase::Phase;
pub use prune::{prune_solution, Pruner};
pub use scope::SearchScope;
pub use search::{LocalSearch, LocalSearchOutcome};
pub use stats::LocalSearchStats;
pub use vertex_insertion::VertexInsertionPhase;
