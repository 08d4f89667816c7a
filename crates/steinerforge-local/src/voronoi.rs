//! Multi-source shortest paths from the tree nodes.
//!
//! Every active node is assigned to its nearest base (a tree node). The
//! regions of the nodes on a key path can be reset, repaired with a bounded
//! Dijkstra restricted to the reset nodes, and restored afterwards.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, TryReserveError};

use steinerforge_core::{flip, EdgeId, Graph, NodeId};

use crate::active::ActiveSet;
use crate::boundary::RegionLists;
use crate::scratch::{try_filled, try_with_capacity};
use crate::union_find::UnionFind;

/// Settlement state of a node in the current diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// The node's label is final.
    Settled,
    /// The node is unreached or was reset for repair.
    Unsettled,
}

/// Min-ordered priority queue entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct QueueEntry {
    pub(crate) dist: f64,
    pub(crate) node: NodeId,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
struct SavedLabel {
    node: NodeId,
    base: Option<NodeId>,
    dist: f64,
    via: Option<EdgeId>,
}

/// Voronoi regions of the current tree nodes.
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    base: Vec<Option<NodeId>>,
    dist: Vec<f64>,
    via: Vec<Option<EdgeId>>,
    state: Vec<RegionState>,
    in_repair: Vec<bool>,
    saved: Vec<SavedLabel>,
    queue: BinaryHeap<QueueEntry>,
}

impl VoronoiDiagram {
    pub fn try_new(node_count: usize) -> Result<Self, TryReserveError> {
        let mut queue = BinaryHeap::new();
        queue.try_reserve(node_count)?;
        Ok(Self {
            base: try_filled(None, node_count)?,
            dist: try_filled(f64::INFINITY, node_count)?,
            via: try_filled(None, node_count)?,
            state: try_filled(RegionState::Unsettled, node_count)?,
            in_repair: try_filled(false, node_count)?,
            saved: try_with_capacity(node_count)?,
            queue,
        })
    }

    /// Nearest base of `node`, if `node` was reached.
    #[inline]
    pub fn base(&self, node: NodeId) -> Option<NodeId> {
        self.base[node]
    }

    #[inline]
    pub fn dist(&self, node: NodeId) -> f64 {
        self.dist[node]
    }

    /// Arc from the predecessor of `node` on its shortest path.
    #[inline]
    pub fn via(&self, node: NodeId) -> Option<EdgeId> {
        self.via[node]
    }

    #[cfg(test)]
    pub fn state(&self, node: NodeId) -> RegionState {
        self.state[node]
    }

    /// Cost of the boundary path through `arc`.
    pub fn boundary_path_cost(&self, graph: &Graph, cost: &[f64], arc: EdgeId) -> f64 {
        self.dist[graph.tail(arc)] + cost[arc] + self.dist[graph.head(arc)]
    }

    /// Arcs of the shortest path from `node` back to its base, nearest first.
    pub fn path_arcs<'a>(&'a self, graph: &'a Graph, node: NodeId) -> PathArcs<'a> {
        PathArcs {
            diagram: self,
            graph,
            node,
        }
    }

    /// Computes the diagram for the active `bases`.
    pub fn compute(&mut self, graph: &Graph, cost: &[f64], bases: &[bool], active: &ActiveSet) {
        self.base.fill(None);
        self.dist.fill(f64::INFINITY);
        self.via.fill(None);
        self.state.fill(RegionState::Unsettled);
        self.in_repair.fill(false);
        self.saved.clear();
        self.queue.clear();

        for node in 0..graph.node_count() {
            if bases[node] && active.is_active(node) {
                self.base[node] = Some(node);
                self.dist[node] = 0.0;
                self.queue.push(QueueEntry { dist: 0.0, node });
            }
        }

        while let Some(QueueEntry { dist, node }) = self.queue.pop() {
            if self.state[node] == RegionState::Settled || dist > self.dist[node] {
                continue;
            }
            self.state[node] = RegionState::Settled;
            for &e in graph.out_arcs(node) {
                let m = graph.head(e);
                if !active.is_active(m) || self.state[m] == RegionState::Settled {
                    continue;
                }
                let candidate = dist + cost[e];
                if candidate < self.dist[m] {
                    self.dist[m] = candidate;
                    self.base[m] = self.base[node];
                    self.via[m] = Some(e);
                    self.queue.push(QueueEntry {
                        dist: candidate,
                        node: m,
                    });
                }
            }
        }
    }

    /// Clears the regions of `bases` after saving their labels.
    pub fn reset_regions(&mut self, regions: &RegionLists, bases: &[NodeId]) {
        for &base in bases {
            for node in regions.members(base) {
                self.saved.push(SavedLabel {
                    node,
                    base: self.base[node],
                    dist: self.dist[node],
                    via: self.via[node],
                });
                self.base[node] = None;
                self.dist[node] = f64::INFINITY;
                self.via[node] = None;
                self.state[node] = RegionState::Unsettled;
                self.in_repair[node] = true;
            }
        }
    }

    /// Seeds the repair frontier: every reset node takes the best label
    /// offered by a settled active neighbour with an active base.
    pub fn repair_preprocess(
        &mut self,
        graph: &Graph,
        cost: &[f64],
        regions: &RegionLists,
        bases: &[NodeId],
        active: &ActiveSet,
    ) {
        self.queue.clear();
        for &base in bases {
            for node in regions.members(base) {
                if !active.is_active(node) {
                    continue;
                }
                for &e in graph.out_arcs(node) {
                    let adj = graph.head(e);
                    if self.state[adj] != RegionState::Settled || !active.is_active(adj) {
                        continue;
                    }
                    let Some(adj_base) = self.base[adj] else {
                        continue;
                    };
                    if !active.is_active(adj_base) {
                        continue;
                    }
                    let candidate = self.dist[adj] + cost[e];
                    if candidate < self.dist[node] {
                        self.dist[node] = candidate;
                        self.base[node] = Some(adj_base);
                        self.via[node] = Some(flip(e));
                    }
                }
                if self.base[node].is_some() {
                    self.queue.push(QueueEntry {
                        dist: self.dist[node],
                        node,
                    });
                }
            }
        }
    }

    /// Settles the next frontier node, relaxing its reset neighbours.
    ///
    /// Calls `on_boundary(node, arc, neighbour)` for every arc to an active
    /// settled neighbour whose base is active.
    fn settle_next(
        &mut self,
        graph: &Graph,
        cost: &[f64],
        active: &ActiveSet,
        mut on_boundary: impl FnMut(&Self, NodeId, EdgeId, NodeId),
    ) -> bool {
        let Some(QueueEntry { dist, node }) = self.queue.pop() else {
            return false;
        };
        if self.state[node] == RegionState::Settled || dist > self.dist[node] {
            return true;
        }
        self.state[node] = RegionState::Settled;
        for &e in graph.out_arcs(node) {
            let m = graph.head(e);
            if !active.is_active(m) {
                continue;
            }
            if self.state[m] == RegionState::Settled {
                if self.base[m].is_some_and(|b| active.is_active(b)) {
                    on_boundary(self, node, e, m);
                }
            } else if self.in_repair[m] {
                let candidate = dist + cost[e];
                if candidate < self.dist[m] {
                    self.dist[m] = candidate;
                    self.base[m] = self.base[node];
                    self.via[m] = Some(e);
                    self.queue.push(QueueEntry {
                        dist: candidate,
                        node: m,
                    });
                }
            }
        }
        true
    }

    /// Repairs the reset regions and returns the cheapest boundary arc
    /// leaving union-find component `group`, oriented away from the newly
    /// settled node.
    pub fn repair_single(
        &mut self,
        graph: &Graph,
        cost: &[f64],
        active: &ActiveSet,
        uf: &mut UnionFind,
        group: NodeId,
    ) -> Option<EdgeId> {
        let mut best: Option<(EdgeId, f64)> = None;
        loop {
            let progressed = self.settle_next(graph, cost, active, |diagram, node, e, m| {
                let (Some(node_base), Some(m_base)) = (diagram.base[node], diagram.base[m]) else {
                    return;
                };
                if (uf.find(node_base) == group) == (uf.find(m_base) == group) {
                    return;
                }
                let key = diagram.boundary_path_cost(graph, cost, e);
                if best.map_or(true, |(_, b)| key < b) {
                    best = Some((e, key));
                }
            });
            if !progressed {
                break;
            }
        }
        best.map(|(e, _)| e)
    }

    /// Repairs the reset regions and appends every arc that joins two
    /// different super-components to `out`.
    ///
    /// A node belongs to the component of its base's representative if that
    /// representative is marked in `is_supernode`, and to the root component
    /// otherwise.
    pub fn repair_multi(
        &mut self,
        graph: &Graph,
        cost: &[f64],
        active: &ActiveSet,
        uf: &mut UnionFind,
        is_supernode: &[bool],
        out: &mut Vec<EdgeId>,
    ) {
        loop {
            let progressed = self.settle_next(graph, cost, active, |diagram, node, e, m| {
                let (Some(node_base), Some(m_base)) = (diagram.base[node], diagram.base[m]) else {
                    return;
                };
                let component = |uf: &mut UnionFind, base: NodeId| {
                    let rep = uf.find(base);
                    is_supernode[rep].then_some(rep)
                };
                if component(uf, node_base) != component(uf, m_base) {
                    out.push(e);
                }
            });
            if !progressed {
                break;
            }
        }
    }

    /// Reinstates every label saved since the last restore.
    pub fn restore(&mut self) {
        while let Some(label) = self.saved.pop() {
            self.base[label.node] = label.base;
            self.dist[label.node] = label.dist;
            self.via[label.node] = label.via;
            self.state[label.node] = if label.base.is_some() {
                RegionState::Settled
            } else {
                RegionState::Unsettled
            };
            self.in_repair[label.node] = false;
        }
        self.queue.clear();
    }

    /// Returns `true` if no labels are waiting to be restored.
    #[cfg(test)]
    pub fn is_restored(&self) -> bool {
        self.saved.is_empty()
    }
}

/// Iterator over the arcs of a shortest path towards its base.
pub struct PathArcs<'a> {
    diagram: &'a VoronoiDiagram,
    graph: &'a Graph,
    node: NodeId,
}

impl Iterator for PathArcs<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        if self.diagram.base[self.node] == Some(self.node) {
            return None;
        }
        let arc = self.diagram.via[self.node]?;
        self.node = self.graph.tail(arc);
        Some(arc)
    }
}

#[cfg(test)]
mod tests;
