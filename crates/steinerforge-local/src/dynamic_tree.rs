//! Link-cut trees over the solution forest.
//!
//! Each graph node owns a splay node. Every tree edge gets an auxiliary splay
//! node carrying the edge cost, so path aggregates over edges become plain
//! node aggregates: each splay node stores the index of the most expensive
//! node in its splay subtree. Edge slots are recycled through a free list.
//!
//! All operations except the path enumerations run in amortized
//! `O(log n)`.
//!
//! # Example
//!
//! ```
//! use steinerforge_local::DynamicTree;
//!
//! // 0 - 1 - 2 with costs 4 and 1, rooted at 0
//! let mut tree = DynamicTree::try_new(3).unwrap();
//! tree.link(1, 0, 1, 4.0);
//! tree.link(2, 1, 3, 1.0);
//!
//! assert_eq!(tree.parent(2), Some(1));
//! assert_eq!(tree.find_max_cost_on_path_to_root(2), Some((1, 1)));
//!
//! tree.evert(2);
//! assert_eq!(tree.parent(1), Some(2));
//! assert_eq!(tree.root_of(0), 2);
//! ```

use std::collections::TryReserveError;

use smallvec::SmallVec;
use steinerforge_core::{flip, EdgeId, NodeId};

use crate::scratch::{try_filled, try_with_capacity};

const NIL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct SplayNode {
    child: [u32; 2],
    parent: u32,
    flipped: bool,
    cost: f64,
    max: u32,
}

impl SplayNode {
    fn new(index: u32, cost: f64) -> Self {
        Self {
            child: [NIL, NIL],
            parent: NIL,
            flipped: false,
            cost,
            max: index,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TreeEdge {
    arc: EdgeId,
    tail: NodeId,
    head: NodeId,
}

/// A chain of removable nodes found by
/// [`DynamicTree::find_min_prize_chain`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeChain {
    /// Path node directly below the chain.
    pub below: NodeId,
    /// Topmost node of the chain.
    pub top: NodeId,
    /// Path node directly above the chain.
    pub above: NodeId,
    /// Chain nodes ordered from `below` towards the root.
    pub nodes: Vec<NodeId>,
    /// Total weight of the chain nodes.
    pub weight: f64,
}

/// A rooted forest supporting link, cut, evert and path-maximum queries.
#[derive(Debug, Clone)]
pub struct DynamicTree {
    nodes: Vec<SplayNode>,
    edges: Vec<TreeEdge>,
    free: Vec<u32>,
    vertex_count: usize,
}

impl DynamicTree {
    /// Creates a forest of `vertex_count` isolated nodes.
    pub fn try_new(vertex_count: usize) -> Result<Self, TryReserveError> {
        let mut tree = Self {
            nodes: try_with_capacity(2 * vertex_count)?,
            edges: try_filled(
                TreeEdge {
                    arc: 0,
                    tail: 0,
                    head: 0,
                },
                vertex_count,
            )?,
            free: try_with_capacity(vertex_count)?,
            vertex_count,
        };
        tree.reset();
        Ok(tree)
    }

    /// Cuts every edge.
    pub fn reset(&mut self) {
        let n = self.vertex_count;
        self.nodes.clear();
        for i in 0..n {
            self.nodes
                .push(SplayNode::new(i as u32, f64::NEG_INFINITY));
        }
        for slot in 0..self.edges.len() {
            let index = (n + slot) as u32;
            self.nodes.push(SplayNode::new(index, f64::NEG_INFINITY));
        }
        self.free.clear();
        self.free.extend((0..self.edges.len() as u32).rev());
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    fn is_splay_root(&self, x: u32) -> bool {
        let p = self.nodes[x as usize].parent;
        p == NIL || {
            let pc = self.nodes[p as usize].child;
            pc[0] != x && pc[1] != x
        }
    }

    fn push(&mut self, x: u32) {
        let node = &mut self.nodes[x as usize];
        if !node.flipped {
            return;
        }
        node.flipped = false;
        node.child.swap(0, 1);
        let child = node.child;
        for c in child {
            if c != NIL {
                self.nodes[c as usize].flipped ^= true;
            }
        }
    }

    fn pull(&mut self, x: u32) {
        let mut best = x;
        for c in self.nodes[x as usize].child {
            if c != NIL {
                let candidate = self.nodes[c as usize].max;
                if self.nodes[candidate as usize].cost > self.nodes[best as usize].cost {
                    best = candidate;
                }
            }
        }
        self.nodes[x as usize].max = best;
    }

    fn rotate(&mut self, x: u32) {
        let p = self.nodes[x as usize].parent;
        let g = self.nodes[p as usize].parent;
        let dir = usize::from(self.nodes[p as usize].child[1] == x);

        if !self.is_splay_root(p) {
            let gc = &mut self.nodes[g as usize].child;
            if gc[0] == p {
                gc[0] = x;
            } else {
                gc[1] = x;
            }
        }
        self.nodes[x as usize].parent = g;

        let b = self.nodes[x as usize].child[dir ^ 1];
        self.nodes[p as usize].child[dir] = b;
        if b != NIL {
            self.nodes[b as usize].parent = p;
        }
        self.nodes[x as usize].child[dir ^ 1] = p;
        self.nodes[p as usize].parent = x;

        self.pull(p);
        self.pull(x);
    }

    fn splay(&mut self, x: u32) {
        let mut path: SmallVec<[u32; 64]> = SmallVec::new();
        let mut y = x;
        path.push(y);
        while !self.is_splay_root(y) {
            y = self.nodes[y as usize].parent;
            path.push(y);
        }
        while let Some(z) = path.pop() {
            self.push(z);
        }

        while !self.is_splay_root(x) {
            let p = self.nodes[x as usize].parent;
            if !self.is_splay_root(p) {
                let g = self.nodes[p as usize].parent;
                let zig_zig = (self.nodes[g as usize].child[0] == p)
                    == (self.nodes[p as usize].child[0] == x);
                if zig_zig {
                    self.rotate(p);
                } else {
                    self.rotate(x);
                }
            }
            self.rotate(x);
        }
    }

    /// Makes the root path of `x` preferred; `x` ends as the root of a splay
    /// tree holding exactly that path.
    fn access(&mut self, x: u32) {
        let mut last = NIL;
        let mut y = x;
        while y != NIL {
            self.splay(y);
            self.nodes[y as usize].child[1] = last;
            self.pull(y);
            last = y;
            y = self.nodes[y as usize].parent;
        }
        self.splay(x);
    }

    fn make_root(&mut self, x: u32) {
        self.access(x);
        self.nodes[x as usize].flipped ^= true;
    }

    /// Predecessor of `x` on its root path.
    fn predecessor(&mut self, x: u32) -> Option<u32> {
        self.access(x);
        let mut y = self.nodes[x as usize].child[0];
        if y == NIL {
            return None;
        }
        loop {
            self.push(y);
            let right = self.nodes[y as usize].child[1];
            if right == NIL {
                break;
            }
            y = right;
        }
        self.splay(y);
        Some(y)
    }

    /// Detaches `x` from its parent without changing the root of the
    /// remaining tree.
    fn detach(&mut self, x: u32) {
        self.access(x);
        let left = self.nodes[x as usize].child[0];
        if left != NIL {
            self.nodes[left as usize].parent = NIL;
            self.nodes[x as usize].child[0] = NIL;
            self.pull(x);
        }
    }

    fn allocate_edge(&mut self, arc: EdgeId, tail: NodeId, head: NodeId, cost: f64) -> u32 {
        let slot = match self.free.pop() {
            Some(slot) => slot as usize,
            None => {
                self.edges.push(TreeEdge { arc, tail, head });
                let index = self.nodes.len() as u32;
                self.nodes.push(SplayNode::new(index, cost));
                self.edges.len() - 1
            }
        };
        self.edges[slot] = TreeEdge { arc, tail, head };
        let index = (self.vertex_count + slot) as u32;
        self.nodes[index as usize] = SplayNode::new(index, cost);
        index
    }

    fn edge_of(&self, index: u32) -> TreeEdge {
        self.edges[index as usize - self.vertex_count]
    }

    /// Links the tree of `child` below `parent` through arc `child → parent`.
    ///
    /// `child` becomes the root of its tree first; `child` and `parent` must
    /// be in different trees.
    pub fn link(&mut self, child: NodeId, parent: NodeId, arc: EdgeId, cost: f64) {
        debug_assert_ne!(self.root_of(child), self.root_of(parent));
        let edge = self.allocate_edge(arc, child, parent, cost);
        self.make_root(child as u32);
        self.nodes[child].parent = edge;
        self.nodes[edge as usize].parent = parent as u32;
    }

    /// Cuts `node` from its parent and returns the removed arc `node → parent`.
    ///
    /// The root of the remaining tree does not change; `node` becomes the
    /// root of its subtree.
    pub fn cut(&mut self, node: NodeId) -> Option<EdgeId> {
        let edge = self.predecessor(node as u32)?;
        let arc = self.oriented_arc(edge, node);
        self.detach(node as u32);
        self.detach(edge);
        self.free.push(edge - self.vertex_count as u32);
        Some(arc)
    }

    /// Cuts the edge joining the adjacent nodes `a` and `b`.
    pub fn cut_between(&mut self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        if self.parent(a) == Some(b) {
            self.cut(a)
        } else if self.parent(b) == Some(a) {
            self.cut(b)
        } else {
            None
        }
    }

    /// Re-roots the tree containing `node` at `node`.
    pub fn evert(&mut self, node: NodeId) {
        self.make_root(node as u32);
    }

    fn oriented_arc(&self, edge: u32, from: NodeId) -> EdgeId {
        let e = self.edge_of(edge);
        if e.tail == from {
            e.arc
        } else {
            flip(e.arc)
        }
    }

    /// Returns the parent of `node`.
    pub fn parent(&mut self, node: NodeId) -> Option<NodeId> {
        let edge = self.predecessor(node as u32)?;
        let e = self.edge_of(edge);
        Some(if e.tail == node { e.head } else { e.tail })
    }

    /// Returns the arc from `node` to its parent.
    pub fn parent_edge(&mut self, node: NodeId) -> Option<EdgeId> {
        let edge = self.predecessor(node as u32)?;
        Some(self.oriented_arc(edge, node))
    }

    /// Returns the root of the tree containing `node`.
    pub fn root_of(&mut self, node: NodeId) -> NodeId {
        let x = node as u32;
        self.access(x);
        let mut y = x;
        loop {
            self.push(y);
            let left = self.nodes[y as usize].child[0];
            if left == NIL {
                break;
            }
            y = left;
        }
        self.splay(y);
        y as usize
    }

    /// Returns `node`, its parent, and so on up to the root.
    pub fn path_to_root(&mut self, node: NodeId) -> Vec<NodeId> {
        self.access(node as u32);
        let mut path = Vec::new();
        let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
        let mut cur = node as u32;
        loop {
            while cur != NIL {
                self.push(cur);
                stack.push(cur);
                cur = self.nodes[cur as usize].child[0];
            }
            let Some(top) = stack.pop() else {
                break;
            };
            if (top as usize) < self.vertex_count {
                path.push(top as usize);
            }
            cur = self.nodes[top as usize].child[1];
        }
        path.reverse();
        path
    }

    /// Returns the child endpoint and the arc `child → parent` of the most
    /// expensive edge between `node` and the root.
    pub fn find_max_cost_on_path_to_root(&mut self, node: NodeId) -> Option<(NodeId, EdgeId)> {
        self.access(node as u32);
        let max = self.nodes[node].max;
        if (max as usize) < self.vertex_count {
            return None;
        }
        let e = self.edge_of(max);
        let child = if self.predecessor(e.tail as u32) == Some(max) {
            e.tail
        } else {
            e.head
        };
        Some((child, self.oriented_arc(max, child)))
    }

    /// Finds the lightest run of consecutive `eligible` nodes strictly
    /// between `node` and the root.
    pub fn find_min_prize_chain(
        &mut self,
        node: NodeId,
        weight: &[f64],
        eligible: impl Fn(NodeId) -> bool,
    ) -> Option<PrizeChain> {
        let path = self.path_to_root(node);
        let mut best: Option<PrizeChain> = None;
        let mut i = 1;
        while i + 1 < path.len() {
            if !eligible(path[i]) {
                i += 1;
                continue;
            }
            let first = i;
            let mut total = 0.0;
            while i + 1 < path.len() && eligible(path[i]) {
                total += weight[path[i]];
                i += 1;
            }
            if best.as_ref().map_or(true, |b| total < b.weight) {
                best = Some(PrizeChain {
                    below: path[first - 1],
                    top: path[i - 1],
                    above: path[i],
                    nodes: path[first..i].to_vec(),
                    weight: total,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests;
