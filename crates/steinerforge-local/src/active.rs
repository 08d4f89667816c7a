//! Active-node view shared by the components of a pass.

use std::collections::TryReserveError;

use steinerforge_core::{Graph, NodeId};

use crate::scratch::try_filled;

/// Marks the nodes a pass may still touch.
///
/// Nodes start active if they have at least one incident edge. The root is
/// always active. Moves deactivate the nodes they consume for the rest of
/// the pass.
#[derive(Debug, Clone)]
pub struct ActiveSet {
    active: Vec<bool>,
}

impl ActiveSet {
    /// Creates a set of `len` inactive nodes.
    pub fn try_new(len: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            active: try_filled(false, len)?,
        })
    }

    /// Activates every non-isolated node and the root.
    pub fn reset(&mut self, graph: &Graph, root: NodeId) {
        for (node, active) in self.active.iter_mut().enumerate() {
            *active = graph.degree(node) > 0;
        }
        self.active[root] = true;
    }

    #[inline]
    pub fn is_active(&self, node: NodeId) -> bool {
        self.active[node]
    }

    #[inline]
    pub fn deactivate(&mut self, node: NodeId) {
        self.active[node] = false;
    }
}
