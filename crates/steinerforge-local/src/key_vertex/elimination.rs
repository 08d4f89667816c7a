//! Key-vertex elimination.

use steinerforge_core::numerics::is_less;
use steinerforge_core::{flip, EdgeState, Graph, NodeId};

use super::KeyVertexSearch;
use crate::error::StarPathsError;
use crate::supergraph::{collect_horizontal, collect_vertical, PathPricing};

impl KeyVertexSearch {
    /// Removes `node` with all its key paths and reconnects the pieces by a
    /// minimum spanning tree of boundary paths, if that is strictly cheaper.
    ///
    /// Returns the gain of an applied elimination. On rejection the child
    /// components are merged into `node`.
    pub(super) fn try_eliminate(
        &mut self,
        graph: &Graph,
        edges: &mut [EdgeState],
        node: NodeId,
    ) -> Result<Option<f64>, StarPathsError> {
        self.tree
            .view(graph, edges)
            .star_paths(node, &mut self.uf, &mut self.kp, &mut self.supernodes)?;

        let costs = graph.costs();
        self.voronoi.reset_regions(&self.index.regions, &self.kp.nodes);
        self.boundary.clear();
        collect_vertical(
            graph,
            &self.voronoi,
            &self.tree.active,
            &mut self.uf,
            &mut self.index.heaps,
            &self.supernodes,
            &mut self.boundary,
        );
        collect_horizontal(
            graph,
            &self.voronoi,
            &mut self.uf,
            &self.index.level_edges,
            node,
            &self.supernodes,
            &mut self.boundary,
        );
        self.voronoi.repair_preprocess(
            graph,
            costs,
            &self.index.regions,
            &self.kp.nodes,
            &self.tree.active,
        );
        self.voronoi.repair_multi(
            graph,
            costs,
            &self.tree.active,
            &mut self.uf,
            self.supernodes.mask(),
            &mut self.boundary,
        );

        let mut gain = None;
        if self.supernodes.children().len() >= 2
            && self.mst.compute(
                graph,
                costs,
                &self.voronoi,
                &mut self.uf,
                &self.supernodes,
                &self.boundary,
            )
        {
            let pricing = PathPricing {
                graph,
                cost: costs,
                voronoi: &self.voronoi,
                in_tree: &self.tree.in_tree,
                active: &self.tree.active,
            };
            let mst_cost = pricing.price(
                self.mst.arcs.iter().copied(),
                &mut self.stamp,
                &mut self.ledger,
            );
            if is_less(mst_cost, self.kp.cost) {
                gain = Some(self.kp.cost - mst_cost);
            }
        }

        if gain.is_some() {
            self.apply_elimination(graph, edges, node);
        } else {
            for i in 0..self.kp.root_path_start {
                self.index.heaps.meld(node, self.kp.nodes[i]);
            }
            for &child in self.supernodes.children() {
                self.index.heaps.meld(node, child);
                self.uf.union_into(node, child);
            }
        }
        self.supernodes.clear();
        self.voronoi.restore();
        Ok(gain)
    }

    fn apply_elimination(&mut self, graph: &Graph, edges: &mut [EdgeState], node: NodeId) {
        for &e in &self.kp.edges {
            edges[e] = EdgeState::Unknown;
        }
        for &k in &self.kp.nodes {
            self.tree.leave(k);
        }
        for k in 0..graph.node_count() {
            if !self.tree.scanned[k] {
                continue;
            }
            let rep = self.uf.find(k);
            if rep == node || self.supernodes.is_supernode(rep) {
                self.tree.active.deactivate(k);
            }
        }

        for i in 0..self.mst.arcs.len() {
            // oriented into the component it connects
            let arc = self.mst.arcs[i];
            let (Some(upper), Some(lower)) = (
                self.voronoi.base(graph.tail(arc)),
                self.voronoi.base(graph.head(arc)),
            ) else {
                continue;
            };
            let component = self.uf.find(lower);
            self.reroot(graph, edges, lower, component);

            let mut x = graph.tail(arc);
            self.tree.enter(x);
            while let Some(via) = self.voronoi.via(x).filter(|_| self.voronoi.base(x) != Some(x)) {
                edges[via] = EdgeState::Connect;
                x = graph.tail(via);
                self.tree.enter(x);
            }
            edges[arc] = EdgeState::Connect;
            let mut x = graph.head(arc);
            self.tree.enter(x);
            while let Some(via) = self.voronoi.via(x).filter(|_| self.voronoi.base(x) != Some(x)) {
                edges[flip(via)] = EdgeState::Connect;
                x = graph.tail(via);
                self.tree.enter(x);
            }

            self.pin_base(graph, edges, upper);
        }
    }
}
