//! Prize accounting for candidate moves on prize-collecting instances.

use std::collections::TryReserveError;

use steinerforge_core::{Graph, NodeId, ProblemVariant};

use crate::active::ActiveSet;
use crate::scratch::{try_filled, try_with_capacity};

/// Records which potential terminals a candidate move would newly span, so
/// that each prize is credited at most once per evaluation.
#[derive(Debug, Clone)]
pub struct PrizeLedger {
    marked: Vec<bool>,
    list: Vec<NodeId>,
}

impl PrizeLedger {
    pub fn try_new(node_count: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            marked: try_filled(false, node_count)?,
            list: try_with_capacity(node_count)?,
        })
    }

    /// Returns the prize of `node` the first time an evaluation spans it.
    ///
    /// Only active potential terminals outside the tree of prize-collecting
    /// instances carry a prize; everything else credits zero.
    pub fn credit(
        &mut self,
        graph: &Graph,
        in_tree: &[bool],
        active: &ActiveSet,
        node: NodeId,
    ) -> f64 {
        if graph.variant() != ProblemVariant::PrizeCollecting
            || !graph.is_potential_terminal(node)
            || in_tree[node]
            || !active.is_active(node)
            || self.marked[node]
        {
            return 0.0;
        }
        self.marked[node] = true;
        self.list.push(node);
        graph.prize(node)
    }

    pub fn clear(&mut self) {
        for node in self.list.drain(..) {
            self.marked[node] = false;
        }
    }

    #[cfg(test)]
    pub fn is_clear(&self) -> bool {
        self.list.is_empty()
    }
}
