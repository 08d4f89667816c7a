//! Seeded random instances.
//!
//! # Example
//!
//! ```
//! use steinerforge_core::ProblemVariant;
//! use steinerforge_test::RandomInstance;
//!
//! let graph = RandomInstance::new(20, ProblemVariant::Steiner)
//!     .with_terminals(5)
//!     .generate(7);
//! assert_eq!(graph.node_count(), 20);
//! assert_eq!(graph.terminal_count(), 5);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use steinerforge_core::{Graph, ProblemVariant};

/// Parameters of a connected random instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomInstance {
    pub nodes: usize,
    pub variant: ProblemVariant,
    /// Edges added on top of the random spanning tree.
    pub extra_edges: usize,
    /// Terminals including the root.
    pub terminals: usize,
    /// Potential terminals (prize-collecting) or positive nodes (maximum-weight).
    pub prized: usize,
    pub max_cost: u32,
}

impl RandomInstance {
    pub fn new(nodes: usize, variant: ProblemVariant) -> Self {
        Self {
            nodes,
            variant,
            extra_edges: nodes,
            terminals: (nodes / 4).max(2),
            prized: nodes / 4,
            max_cost: 10,
        }
    }

    pub fn with_extra_edges(mut self, extra_edges: usize) -> Self {
        self.extra_edges = extra_edges;
        self
    }

    pub fn with_terminals(mut self, terminals: usize) -> Self {
        self.terminals = terminals;
        self
    }

    pub fn with_prized(mut self, prized: usize) -> Self {
        self.prized = prized;
        self
    }

    /// Generates the instance for `seed`.
    ///
    /// Costs are integral in `1..=max_cost`. Maximum-weight instances have
    /// zero costs; their non-prized nodes get weights in `-max_cost..=0`.
    pub fn generate(&self, seed: u64) -> Graph {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.nodes.max(1);
        let mut graph = Graph::new(n, self.variant);
        let mw = self.variant == ProblemVariant::MaximumWeight;
        let max_cost = self.max_cost.max(1);
        let draw_cost = |rng: &mut ChaCha8Rng| {
            if mw {
                0.0
            } else {
                f64::from(rng.random_range(1..=max_cost))
            }
        };

        for v in 1..n {
            let u = rng.random_range(0..v);
            let cost = draw_cost(&mut rng);
            graph.add_edge(u, v, cost).expect("tree edge is valid");
        }
        let mut added = 0;
        let mut attempts = 0;
        while added < self.extra_edges && attempts < 10 * self.extra_edges && n > 1 {
            attempts += 1;
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            if u == v || graph.find_arc(u, v).is_some() {
                continue;
            }
            let cost = draw_cost(&mut rng);
            graph.add_edge(u, v, cost).expect("extra edge is valid");
            added += 1;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        let terminals = self.terminals.clamp(1, n);
        graph.set_root(order[0]).expect("root in range");
        for &t in &order[1..terminals] {
            graph.set_terminal(t).expect("terminal in range");
        }

        let prized_end = (terminals + self.prized).min(n);
        match self.variant {
            ProblemVariant::Steiner => {}
            ProblemVariant::PrizeCollecting => {
                for &v in &order[terminals..prized_end] {
                    let prize = f64::from(rng.random_range(1..=2 * max_cost));
                    graph
                        .set_potential_terminal(v, prize)
                        .expect("prize is valid");
                }
            }
            ProblemVariant::MaximumWeight => {
                for &v in &order[terminals..prized_end] {
                    let weight = f64::from(rng.random_range(1..=max_cost));
                    graph.set_weight(v, weight).expect("weight is valid");
                }
                for &v in &order[prized_end..] {
                    let weight = -f64::from(rng.random_range(0..=max_cost));
                    graph.set_weight(v, weight).expect("weight is valid");
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_instance() {
        let params = RandomInstance::new(30, ProblemVariant::PrizeCollecting);
        let a = params.generate(42);
        let b = params.generate(42);
        assert_eq!(a.costs(), b.costs());
        assert_eq!(a.prizes(), b.prizes());
        assert_eq!(a.root().unwrap(), b.root().unwrap());
    }

    #[test]
    fn test_weighted_instance_has_zero_costs() {
        let graph = RandomInstance::new(15, ProblemVariant::MaximumWeight).generate(3);
        assert!(graph.costs().iter().all(|&c| c == 0.0));
        assert!((0..15).any(|v| graph.is_potential_terminal(v)));
    }
}
