//! Key-path exchange.

use steinerforge_core::numerics::is_less;
use steinerforge_core::{flip, EdgeId, EdgeState, Graph, NodeId};

use super::KeyVertexSearch;
use crate::supergraph::PathPricing;

impl KeyVertexSearch {
    /// Replaces the key path above `node` by the cheapest boundary path
    /// reconnecting `node`'s subtree, if that is strictly cheaper.
    ///
    /// The child key paths of `node` must already be absorbed into it.
    /// Returns the gain of an applied exchange.
    pub(super) fn try_exchange(
        &mut self,
        graph: &Graph,
        edges: &mut [EdgeState],
        node: NodeId,
    ) -> Option<f64> {
        if !self.tree.view(graph, edges).upper_path(node, &mut self.kp) {
            return None;
        }

        let costs = graph.costs();
        self.voronoi.reset_regions(&self.index.regions, &self.kp.nodes);
        let crossing = self.cheapest_crossing(graph, node);
        self.voronoi.repair_preprocess(
            graph,
            costs,
            &self.index.regions,
            &self.kp.nodes,
            &self.tree.active,
        );
        let repaired = if self.kp.nodes.is_empty() {
            None
        } else {
            self.voronoi
                .repair_single(graph, costs, &self.tree.active, &mut self.uf, node)
        };

        let candidate = match (crossing, repaired) {
            (Some(old), Some(new)) => {
                let old_cost = self.voronoi.boundary_path_cost(graph, costs, old);
                let new_cost = self.voronoi.boundary_path_cost(graph, costs, new);
                Some(if old_cost < new_cost { old } else { new })
            }
            (old, new) => old.or(new),
        };

        let mut gain = None;
        if let Some(arc) = candidate {
            let pricing = PathPricing {
                graph,
                cost: costs,
                voronoi: &self.voronoi,
                in_tree: &self.tree.in_tree,
                active: &self.tree.active,
            };
            let replace_cost = pricing.price([arc], &mut self.stamp, &mut self.ledger);
            if is_less(replace_cost, self.kp.cost) && self.apply_exchange(graph, edges, node, arc) {
                gain = Some(self.kp.cost - replace_cost);
            }
        }
        self.voronoi.restore();
        gain
    }

    /// Pops heap entries of `node` until one leaves its component through a
    /// live region; that entry is put back and returned.
    fn cheapest_crossing(&mut self, graph: &Graph, node: NodeId) -> Option<EdgeId> {
        while let Some((arc, key)) = self.index.heaps.pop_min(node) {
            let Some(base) = self.voronoi.base(graph.head(arc)) else {
                continue;
            };
            if !self.tree.active.is_active(base) || self.uf.same(base, node) {
                continue;
            }
            self.index.heaps.insert(node, arc, key);
            return Some(arc);
        }
        None
    }

    /// Swaps the key path above `node` for the boundary path through `arc`.
    ///
    /// Returns false, leaving everything untouched, if either end of `arc`
    /// lies outside the Voronoi regions.
    pub(super) fn apply_exchange(
        &mut self,
        graph: &Graph,
        edges: &mut [EdgeState],
        node: NodeId,
        arc: EdgeId,
    ) -> bool {
        // the head side of the new arc must be the root side
        let arc = match self.voronoi.base(graph.head(arc)) {
            Some(base) if self.uf.same(base, node) => flip(arc),
            _ => arc,
        };
        let (Some(lower), Some(upper)) = (
            self.voronoi.base(graph.tail(arc)),
            self.voronoi.base(graph.head(arc)),
        ) else {
            return false;
        };

        for &e in &self.kp.edges {
            edges[e] = EdgeState::Unknown;
        }
        for &k in &self.kp.nodes {
            self.tree.leave(k);
        }
        self.tree.active.deactivate(node);

        self.reroot(graph, edges, lower, node);

        let mut x = graph.tail(arc);
        self.tree.enter(x);
        while let Some(via) = self.voronoi.via(x).filter(|_| self.voronoi.base(x) != Some(x)) {
            edges[flip(via)] = EdgeState::Connect;
            x = graph.tail(via);
            self.tree.enter(x);
        }
        let mut x = graph.head(arc);
        self.tree.enter(x);
        while let Some(via) = self.voronoi.via(x).filter(|_| self.voronoi.base(x) != Some(x)) {
            edges[via] = EdgeState::Connect;
            x = graph.tail(via);
            self.tree.enter(x);
        }
        edges[flip(arc)] = EdgeState::Connect;

        for k in 0..graph.node_count() {
            if self.tree.scanned[k] && self.uf.same(k, node) {
                self.tree.active.deactivate(k);
            }
        }
        self.pin_base(graph, edges, upper);
        true
    }
}
