//! The supergraph of a key-vertex elimination.
//!
//! Removing a key vertex and its key paths splits the tree into one
//! component per child super-node plus the root component. Boundary arcs
//! between components are contracted into super-edges, and a minimum
//! spanning tree over them decides whether a cheaper reconnection exists.

use std::collections::{BinaryHeap, TryReserveError};

use steinerforge_core::{flip, EdgeId, Graph, NodeId};

use crate::active::ActiveSet;
use crate::boundary::LevelEdges;
use crate::heap::HeapForest;
use crate::prize::PrizeLedger;
use crate::scratch::{try_filled, try_with_capacity};
use crate::union_find::UnionFind;
use crate::voronoi::{QueueEntry, VoronoiDiagram};

const NIL: u32 = u32::MAX;

/// Super-nodes of one elimination: the child endpoints in discovery order,
/// followed by the root representative.
#[derive(Debug, Clone)]
pub struct SupernodeSet {
    nodes: Vec<NodeId>,
    is_supernode: Vec<bool>,
    index: Vec<u32>,
    has_root: bool,
}

impl SupernodeSet {
    pub fn try_new(node_count: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            nodes: try_with_capacity(node_count)?,
            is_supernode: try_filled(false, node_count)?,
            index: try_filled(NIL, node_count)?,
            has_root: false,
        })
    }

    pub fn clear(&mut self) {
        for &node in &self.nodes {
            self.is_supernode[node] = false;
            self.index[node] = NIL;
        }
        self.nodes.clear();
        self.has_root = false;
    }

    /// Registers the lower endpoint of a child key path.
    pub fn push_child(&mut self, node: NodeId) {
        if self.has_root || self.is_supernode[node] {
            return;
        }
        self.is_supernode[node] = true;
        self.index[node] = self.nodes.len() as u32;
        self.nodes.push(node);
    }

    /// Registers the root representative. It is not marked as a super-node.
    pub fn set_root(&mut self, node: NodeId) {
        if !self.has_root {
            self.nodes.push(node);
            self.has_root = true;
        }
    }

    pub fn children(&self) -> &[NodeId] {
        if self.has_root {
            &self.nodes[..self.nodes.len() - 1]
        } else {
            &self.nodes
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.has_root.then(|| self.nodes[self.nodes.len() - 1])
    }

    #[inline]
    pub fn is_supernode(&self, node: NodeId) -> bool {
        self.is_supernode[node]
    }

    /// Super-node mask indexed by node.
    pub fn mask(&self) -> &[bool] {
        &self.is_supernode
    }

    /// Number of components, root component included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Component index of a base: its representative's child index, or the
    /// root component.
    fn component(&self, uf: &mut UnionFind, base: NodeId) -> usize {
        let rep = uf.find(base);
        if self.is_supernode[rep] {
            self.index[rep] as usize
        } else {
            self.nodes.len() - 1
        }
    }
}

/// Generation stamps over undirected edges.
#[derive(Debug, Clone)]
pub struct EdgeStamp {
    stamp: Vec<u32>,
    generation: u32,
}

impl EdgeStamp {
    pub fn try_new(edge_count: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            stamp: try_filled(0, edge_count)?,
            generation: 1,
        })
    }

    /// Forgets every claim made so far.
    pub fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamp.fill(0);
            self.generation = 1;
        }
    }

    /// Claims the edge of `arc`; `false` if it was already claimed.
    pub fn claim(&mut self, arc: EdgeId) -> bool {
        let slot = &mut self.stamp[arc / 2];
        if *slot == self.generation {
            false
        } else {
            *slot = self.generation;
            true
        }
    }
}

/// Context for pricing boundary paths.
pub(crate) struct PathPricing<'a> {
    pub graph: &'a Graph,
    pub cost: &'a [f64],
    pub voronoi: &'a VoronoiDiagram,
    pub in_tree: &'a [bool],
    pub active: &'a ActiveSet,
}

impl PathPricing<'_> {
    /// Cost of the union of the boundary paths through `arcs`, counting each
    /// edge once and subtracting the prize of every newly spanned node once.
    pub fn price(
        &self,
        arcs: impl IntoIterator<Item = EdgeId>,
        stamp: &mut EdgeStamp,
        ledger: &mut PrizeLedger,
    ) -> f64 {
        let graph = self.graph;
        stamp.next_generation();
        let mut total = 0.0;
        for arc in arcs {
            if stamp.claim(arc) {
                total += self.cost[arc];
            }
            for end in [graph.tail(arc), graph.head(arc)] {
                total -= ledger.credit(graph, self.in_tree, self.active, end);
                for path_arc in self.voronoi.path_arcs(graph, end) {
                    if stamp.claim(path_arc) {
                        total += self.cost[path_arc];
                    }
                    total -= ledger.credit(graph, self.in_tree, self.active, graph.tail(path_arc));
                }
            }
        }
        ledger.clear();
        total
    }
}

/// Pops the cheapest valid vertical boundary arc of every child super-node
/// and appends it to `out`. Popped valid arcs are reinserted.
///
/// An arc is valid if the far side belongs neither to a super-node nor to a
/// frozen component.
pub(crate) fn collect_vertical(
    graph: &Graph,
    voronoi: &VoronoiDiagram,
    active: &ActiveSet,
    uf: &mut UnionFind,
    heaps: &mut HeapForest,
    supernodes: &SupernodeSet,
    out: &mut Vec<EdgeId>,
) {
    for &node in supernodes.children() {
        while let Some((arc, key)) = heaps.pop_min(node) {
            let Some(base) = voronoi.base(graph.head(arc)) else {
                continue;
            };
            let rep = uf.find(base);
            if supernodes.is_supernode(rep) || !active.is_active(rep) {
                continue;
            }
            heaps.insert(node, arc, key);
            out.push(arc);
            break;
        }
    }
}

/// Appends the level arcs of `node` that join two different super-nodes.
pub(crate) fn collect_horizontal(
    graph: &Graph,
    voronoi: &VoronoiDiagram,
    uf: &mut UnionFind,
    level_edges: &LevelEdges,
    node: NodeId,
    supernodes: &SupernodeSet,
    out: &mut Vec<EdgeId>,
) {
    for arc in level_edges.arcs(node) {
        let (Some(tail_base), Some(head_base)) =
            (voronoi.base(graph.tail(arc)), voronoi.base(graph.head(arc)))
        else {
            continue;
        };
        let (a, b) = (uf.find(tail_base), uf.find(head_base));
        if a != b && supernodes.is_supernode(a) && supernodes.is_supernode(b) {
            out.push(arc);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    a: usize,
    b: usize,
    key: f64,
    arc: EdgeId,
}

/// Prim's algorithm over the contracted super-edges.
///
/// Every buffer is sized for `node_count` components and `arc_count`
/// boundary arcs up front, so [`compute`](Self::compute) never reallocates.
#[derive(Debug, Clone)]
pub struct SupergraphMst {
    /// Tree arcs, each oriented into the component it connects.
    pub arcs: Vec<EdgeId>,
    links: Vec<Link>,
    offsets: Vec<usize>,
    cursor: Vec<usize>,
    adjacency: Vec<(usize, usize)>,
    best: Vec<f64>,
    entry: Vec<Option<usize>>,
    done: Vec<bool>,
    queue: BinaryHeap<QueueEntry>,
}

impl SupergraphMst {
    pub fn try_new(node_count: usize, arc_count: usize) -> Result<Self, TryReserveError> {
        let components = node_count + 1;
        // one push per improving link end plus the root
        let mut queue = BinaryHeap::new();
        queue.try_reserve(2 * arc_count + 1)?;
        Ok(Self {
            arcs: try_with_capacity(components)?,
            links: try_with_capacity(arc_count)?,
            offsets: try_with_capacity(components + 1)?,
            cursor: try_with_capacity(components + 1)?,
            adjacency: try_with_capacity(2 * arc_count)?,
            best: try_with_capacity(components)?,
            entry: try_with_capacity(components)?,
            done: try_with_capacity(components)?,
            queue,
        })
    }

    /// Computes the spanning tree from the root component.
    ///
    /// Returns `false` if some component cannot be reached.
    pub fn compute(
        &mut self,
        graph: &Graph,
        cost: &[f64],
        voronoi: &VoronoiDiagram,
        uf: &mut UnionFind,
        supernodes: &SupernodeSet,
        boundary: &[EdgeId],
    ) -> bool {
        self.arcs.clear();
        let k = supernodes.len();
        if k == 0 || supernodes.root().is_none() {
            return false;
        }
        let root = k - 1;

        self.links.clear();
        for &arc in boundary {
            let (Some(tail_base), Some(head_base)) =
                (voronoi.base(graph.tail(arc)), voronoi.base(graph.head(arc)))
            else {
                continue;
            };
            let a = supernodes.component(uf, tail_base);
            let b = supernodes.component(uf, head_base);
            if a == b {
                continue;
            }
            self.links.push(Link {
                a,
                b,
                key: voronoi.boundary_path_cost(graph, cost, arc),
                arc,
            });
        }

        self.offsets.clear();
        self.offsets.resize(k + 1, 0);
        for link in &self.links {
            self.offsets[link.a + 1] += 1;
            self.offsets[link.b + 1] += 1;
        }
        for i in 0..k {
            self.offsets[i + 1] += self.offsets[i];
        }
        self.adjacency.clear();
        self.adjacency.resize(2 * self.links.len(), (0, 0));
        self.cursor.clear();
        self.cursor.extend_from_slice(&self.offsets);
        for (l, link) in self.links.iter().enumerate() {
            self.adjacency[self.cursor[link.a]] = (link.b, l);
            self.cursor[link.a] += 1;
            self.adjacency[self.cursor[link.b]] = (link.a, l);
            self.cursor[link.b] += 1;
        }

        self.best.clear();
        self.best.resize(k, f64::INFINITY);
        self.entry.clear();
        self.entry.resize(k, None);
        self.done.clear();
        self.done.resize(k, false);
        self.queue.clear();
        self.best[root] = 0.0;
        self.queue.push(QueueEntry { dist: 0.0, node: root });

        while let Some(QueueEntry { dist, node }) = self.queue.pop() {
            if self.done[node] || dist > self.best[node] {
                continue;
            }
            self.done[node] = true;
            if let Some(l) = self.entry[node] {
                let link = self.links[l];
                self.arcs.push(if link.b == node { link.arc } else { flip(link.arc) });
            }
            for &(other, l) in &self.adjacency[self.offsets[node]..self.offsets[node + 1]] {
                let key = self.links[l].key;
                if !self.done[other] && key < self.best[other] {
                    self.best[other] = key;
                    self.entry[other] = Some(l);
                    self.queue.push(QueueEntry {
                        dist: key,
                        node: other,
                    });
                }
            }
        }
        self.done.iter().all(|&d| d)
    }
}

#[cfg(test)]
mod tests;
