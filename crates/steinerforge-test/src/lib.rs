//! Shared test fixtures for SteinerForge crates.
//!
//! This crate provides instances and reference solutions for testing.
//!
//! - [`scenarios`] - small hand-made instances with known outcomes
//! - [`grid`] - grid graphs with terminals on the border
//! - [`random`] - seeded random instances for all problem variants
//! - [`construct`] - a shortest-path construction producing feasible trees
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! steinerforge-test = { workspace = true }
//! ```

pub mod construct;
pub mod grid;
pub mod random;
pub mod scenarios;

pub use construct::shortest_path_tree;
pub use random::RandomInstance;
pub use scenarios::Instance;
