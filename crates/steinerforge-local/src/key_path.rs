//! Key paths of the solution tree.
//!
//! A node is crucial if it is terminal-like or has tree degree at least
//! three. Key paths are the maximal tree paths whose interior nodes are
//! neither crucial nor pinned.

use std::collections::TryReserveError;

use steinerforge_core::{flip, EdgeId, EdgeState, Graph, NodeId, ProblemVariant};

use crate::active::ActiveSet;
use crate::error::StarPathsError;
use crate::heap::HeapForest;
use crate::scratch::try_with_capacity;
use crate::supergraph::SupernodeSet;
use crate::union_find::UnionFind;

/// Terminals, and potential terminals of prize-collecting instances.
#[inline]
pub fn is_terminal_like(graph: &Graph, node: NodeId) -> bool {
    graph.is_terminal(node)
        || (graph.variant() == ProblemVariant::PrizeCollecting
            && graph.is_potential_terminal(node))
}

/// Number of tree edges incident to `node`, in either orientation.
pub fn tree_degree(graph: &Graph, edges: &[EdgeState], node: NodeId) -> usize {
    graph
        .out_arcs(node)
        .iter()
        .filter(|&&e| edges[e] == EdgeState::Connect || edges[flip(e)] == EdgeState::Connect)
        .count()
}

pub fn is_crucial(graph: &Graph, edges: &[EdgeState], node: NodeId) -> bool {
    is_terminal_like(graph, node) || tree_degree(graph, edges, node) >= 3
}

/// Key paths collected for one node.
#[derive(Debug, Clone)]
pub struct KeyPaths {
    /// Interior nodes; for star paths the node itself comes last.
    pub nodes: Vec<NodeId>,
    /// Tree arcs of the paths, oriented away from the root.
    pub edges: Vec<EdgeId>,
    /// Total cost of `edges`.
    pub cost: f64,
    /// Upper endpoint of the path towards the root.
    pub tail: Option<NodeId>,
    /// Index in `nodes` where the path towards the root starts.
    pub root_path_start: usize,
}

impl KeyPaths {
    pub fn try_new(node_count: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            nodes: try_with_capacity(node_count)?,
            edges: try_with_capacity(node_count)?,
            cost: 0.0,
            tail: None,
            root_path_start: 0,
        })
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.cost = 0.0;
        self.tail = None;
        self.root_path_start = 0;
    }
}

/// Read-only view of the working tree during a pass.
#[derive(Clone, Copy)]
pub(crate) struct TreeView<'a> {
    pub graph: &'a Graph,
    pub edges: &'a [EdgeState],
    pub in_tree: &'a [bool],
    pub pinned: &'a [bool],
    pub active: &'a ActiveSet,
    /// Arc towards the root at the start of the pass.
    pub parent_edge: &'a [Option<EdgeId>],
}

impl TreeView<'_> {
    #[inline]
    pub fn is_crucial(&self, node: NodeId) -> bool {
        is_crucial(self.graph, self.edges, node)
    }

    #[inline]
    fn is_path_interior(&self, node: NodeId) -> bool {
        !self.pinned[node] && !self.is_crucial(node)
    }

    fn child_arc(&self, node: NodeId) -> Option<EdgeId> {
        self.graph
            .out_arcs(node)
            .iter()
            .copied()
            .find(|&e| self.edges[e] == EdgeState::Connect)
    }

    fn parent_arc(&self, node: NodeId) -> Option<EdgeId> {
        self.graph
            .out_arcs(node)
            .iter()
            .map(|&e| flip(e))
            .find(|&e| self.edges[e] == EdgeState::Connect)
    }

    /// Collects the key path from `node` towards the root.
    ///
    /// Returns `false` if `node` has no parent.
    pub fn upper_path(&self, node: NodeId, kp: &mut KeyPaths) -> bool {
        kp.clear();
        let Some(up) = self.parent_edge[node] else {
            return false;
        };
        kp.cost = self.graph.cost(up);
        kp.edges.push(flip(up));
        let mut tail = self.graph.head(up);
        while self.is_path_interior(tail) {
            let Some(e) = self.parent_edge[tail] else {
                break;
            };
            kp.nodes.push(tail);
            kp.cost += self.graph.cost(e);
            kp.edges.push(flip(e));
            tail = self.graph.head(e);
        }
        kp.tail = Some(tail);
        true
    }

    /// Collects all key paths incident to `node`.
    ///
    /// Interior nodes of the child paths are merged into `node`'s component.
    /// Child endpoints become super-nodes; the upper endpoint is registered
    /// as the root representative.
    pub fn star_paths(
        &self,
        node: NodeId,
        uf: &mut UnionFind,
        kp: &mut KeyPaths,
        supernodes: &mut SupernodeSet,
    ) -> Result<(), StarPathsError> {
        kp.clear();
        supernodes.clear();
        let graph = self.graph;
        let mut edge_to_root = None;

        for &e in graph.out_arcs(node) {
            let adj = graph.head(e);
            let down = self.edges[e] == EdgeState::Connect && self.in_tree[adj];
            let up = self.edges[flip(e)] == EdgeState::Connect;
            if !down && !up {
                continue;
            }
            kp.cost += graph.cost(e);
            if up {
                edge_to_root = Some(e);
                continue;
            }

            kp.edges.push(e);
            let mut last = e;
            let mut end = adj;
            while self.is_path_interior(end) && self.in_tree[end] {
                let Some(next) = self.child_arc(end) else {
                    return Err(StarPathsError::DanglingLeaf(end));
                };
                kp.nodes.push(end);
                uf.union_into(node, end);
                kp.cost += graph.cost(next);
                kp.edges.push(next);
                last = next;
                end = graph.head(next);
            }

            if self.in_tree[end] {
                supernodes.push_child(end);
            } else {
                // frozen endpoint: the path closes one arc earlier
                kp.edges.pop();
                kp.cost -= graph.cost(last);
                let closing = graph.tail(last);
                if closing != node {
                    supernodes.push_child(closing);
                }
            }
        }

        kp.root_path_start = kp.nodes.len();
        let Some(e) = edge_to_root else {
            return Err(StarPathsError::MissingParent(node));
        };
        kp.edges.push(flip(e));
        let mut tail = graph.head(e);
        while self.is_path_interior(tail) && self.in_tree[tail] {
            let Some(in_arc) = self.parent_arc(tail) else {
                break;
            };
            kp.nodes.push(tail);
            kp.cost += graph.cost(in_arc);
            kp.edges.push(in_arc);
            tail = graph.tail(in_arc);
        }
        supernodes.set_root(tail);
        kp.tail = Some(tail);
        kp.nodes.push(node);
        Ok(())
    }

    /// Merges the components and heaps of every child key path of `node`
    /// (interior nodes and lower endpoint) into `node`.
    pub fn absorb_child_paths(&self, node: NodeId, uf: &mut UnionFind, heaps: &mut HeapForest) {
        for &e in self.graph.out_arcs(node) {
            if self.edges[e] != EdgeState::Connect {
                continue;
            }
            let mut adj = self.graph.head(e);
            if !self.in_tree[adj] || !self.active.is_active(adj) || uf.same(node, adj) {
                continue;
            }
            heaps.meld(node, adj);
            uf.union_into(node, adj);
            while self.is_path_interior(adj) {
                let Some(next) = self.child_arc(adj) else {
                    break;
                };
                adj = self.graph.head(next);
                if !self.in_tree[adj] || !self.active.is_active(adj) {
                    break;
                }
                uf.union_into(node, adj);
                heaps.meld(node, adj);
            }
        }
    }
}
