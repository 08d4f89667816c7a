//! Boundary-path index of a pass.
//!
//! Built once per pass from the Voronoi diagram: the members of every
//! region, one heap of boundary arcs per base keyed by boundary-path cost,
//! and for every tree node the boundary arcs whose two regions have that
//! node as their lowest common ancestor.

use std::collections::TryReserveError;

use steinerforge_core::{flip, EdgeId, EdgeState, Graph, NodeId};

use crate::active::ActiveSet;
use crate::heap::HeapForest;
use crate::scratch::{try_filled, try_with_capacity};
use crate::traversal::PostOrder;
use crate::union_find::UnionFind;
use crate::voronoi::VoronoiDiagram;

const NIL: u32 = u32::MAX;

/// Members of each Voronoi region as intrusive singly linked lists.
#[derive(Debug, Clone)]
pub struct RegionLists {
    head: Vec<u32>,
    next: Vec<u32>,
}

impl RegionLists {
    pub fn try_new(node_count: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            head: try_filled(NIL, node_count)?,
            next: try_filled(NIL, node_count)?,
        })
    }

    pub fn clear(&mut self) {
        self.head.fill(NIL);
        self.next.fill(NIL);
    }

    /// Adds `node` to the region of `base`. A node belongs to one region.
    pub fn push(&mut self, base: NodeId, node: NodeId) {
        self.next[node] = self.head[base];
        self.head[base] = node as u32;
    }

    /// Iterates over the members of `base`'s region.
    pub fn members(&self, base: NodeId) -> RegionMembers<'_> {
        RegionMembers {
            lists: self,
            cur: self.head[base],
        }
    }
}

pub struct RegionMembers<'a> {
    lists: &'a RegionLists,
    cur: u32,
}

impl Iterator for RegionMembers<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.cur == NIL {
            return None;
        }
        let node = self.cur as usize;
        self.cur = self.lists.next[node];
        Some(node)
    }
}

/// Horizontal boundary arcs filed under their lowest common ancestor.
#[derive(Debug, Clone)]
pub struct LevelEdges {
    head: Vec<u32>,
    next: Vec<u32>,
    arcs: Vec<EdgeId>,
}

impl LevelEdges {
    pub fn try_new(node_count: usize, capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            head: try_filled(NIL, node_count)?,
            next: try_with_capacity(capacity)?,
            arcs: try_with_capacity(capacity)?,
        })
    }

    pub fn clear(&mut self) {
        self.head.fill(NIL);
        self.next.clear();
        self.arcs.clear();
    }

    pub fn push(&mut self, ancestor: NodeId, arc: EdgeId) {
        self.next.push(self.head[ancestor]);
        self.arcs.push(arc);
        self.head[ancestor] = (self.arcs.len() - 1) as u32;
    }

    pub fn arcs(&self, ancestor: NodeId) -> LevelArcs<'_> {
        LevelArcs {
            lists: self,
            cur: self.head[ancestor],
        }
    }
}

pub struct LevelArcs<'a> {
    lists: &'a LevelEdges,
    cur: u32,
}

impl Iterator for LevelArcs<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        if self.cur == NIL {
            return None;
        }
        let slot = self.cur as usize;
        self.cur = self.lists.next[slot];
        Some(self.lists.arcs[slot])
    }
}

/// Region lists, boundary heaps and level edges of one pass.
#[derive(Debug, Clone)]
pub struct BoundaryIndex {
    pub regions: RegionLists,
    pub heaps: HeapForest,
    pub level_edges: LevelEdges,
    finished: Vec<bool>,
}

impl BoundaryIndex {
    pub fn try_new(graph: &Graph) -> Result<Self, TryReserveError> {
        let n = graph.node_count();
        Ok(Self {
            regions: RegionLists::try_new(n)?,
            heaps: HeapForest::try_new(n, graph.arc_count())?,
            level_edges: LevelEdges::try_new(n, graph.arc_count())?,
            finished: try_filled(false, n)?,
        })
    }

    /// Rebuilds the index for the current diagram and tree.
    ///
    /// `uf` is used for the lowest-common-ancestor pass and is left clear.
    pub fn build(
        &mut self,
        graph: &Graph,
        voronoi: &VoronoiDiagram,
        active: &ActiveSet,
        edges: &[EdgeState],
        root: NodeId,
        uf: &mut UnionFind,
    ) {
        self.regions.clear();
        self.heaps.clear();
        self.level_edges.clear();
        self.finished.fill(false);

        for node in 0..graph.node_count() {
            if !active.is_active(node) {
                continue;
            }
            if let Some(base) = voronoi.base(node) {
                self.regions.push(base, node);
            }
        }

        for e in (0..graph.arc_count()).step_by(2) {
            let (tail, head) = (graph.tail(e), graph.head(e));
            if !active.is_active(tail) || !active.is_active(head) {
                continue;
            }
            let (Some(tail_base), Some(head_base)) = (voronoi.base(tail), voronoi.base(head)) else {
                continue;
            };
            if tail_base == head_base {
                continue;
            }
            let key = voronoi.boundary_path_cost(graph, graph.costs(), e);
            self.heaps.insert(tail_base, e, key);
            self.heaps.insert(head_base, flip(e), key);
        }

        uf.clear();
        for (node, parent) in PostOrder::new(graph, edges, root) {
            self.finished[node] = true;
            for arc in self.heaps.iter(node) {
                let Some(other) = voronoi.base(graph.head(arc)) else {
                    continue;
                };
                if !self.finished[other] {
                    continue;
                }
                let ancestor = uf.find(other);
                if ancestor != node && ancestor != other {
                    self.level_edges.push(ancestor, arc);
                }
            }
            if let Some(parent) = parent {
                uf.union_into(parent, node);
            }
        }
        uf.clear();
    }
}
