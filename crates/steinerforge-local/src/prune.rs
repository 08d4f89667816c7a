//! Rebuilding a solution from its node set.
//!
//! The nodes are reconnected by a minimum spanning tree of the subgraph they
//! induce, grown from the root with Prim's algorithm. Leaves that cannot
//! improve the objective are then peeled off until none remain.

use std::collections::{BinaryHeap, TryReserveError};

use steinerforge_core::{EdgeId, EdgeState, Graph, NodeId, ProblemVariant};

use crate::error::{LocalSearchError, PruneError};
use crate::scratch::{try_filled, try_with_capacity};
use crate::voronoi::QueueEntry;

/// Scratch space for pruning solutions of one graph.
#[derive(Debug, Clone)]
pub struct Pruner {
    nodes: Vec<bool>,
    dist: Vec<f64>,
    pred: Vec<Option<EdgeId>>,
    done: Vec<bool>,
    children: Vec<u32>,
    leaves: Vec<NodeId>,
    queue: BinaryHeap<QueueEntry>,
}

impl Pruner {
    pub fn try_new(graph: &Graph) -> Result<Self, TryReserveError> {
        let n = graph.node_count();
        let mut queue = BinaryHeap::new();
        queue.try_reserve(graph.arc_count())?;
        Ok(Self {
            nodes: try_filled(false, n)?,
            dist: try_filled(f64::INFINITY, n)?,
            pred: try_filled(None, n)?,
            done: try_filled(false, n)?,
            children: try_filled(0, n)?,
            leaves: try_with_capacity(n)?,
            queue,
        })
    }

    /// Node set of the last successful prune.
    pub fn nodes(&self) -> &[bool] {
        &self.nodes
    }

    /// Prunes the solution in `edges` in place.
    pub fn prune(&mut self, graph: &Graph, edges: &mut [EdgeState]) -> Result<(), PruneError> {
        let root = graph.root().map_err(|_| PruneError::MissingRoot)?;
        self.nodes.fill(false);
        self.nodes[root] = true;
        for (e, state) in edges.iter().enumerate() {
            if *state == EdgeState::Connect {
                self.nodes[graph.tail(e)] = true;
                self.nodes[graph.head(e)] = true;
            }
        }
        self.rebuild(graph, root, edges)
    }

    /// Writes the pruned tree over `nodes` into `edges`.
    ///
    /// `edges` is left untouched on error.
    pub fn prune_node_set(
        &mut self,
        graph: &Graph,
        nodes: &[bool],
        edges: &mut [EdgeState],
    ) -> Result<(), PruneError> {
        let root = graph.root().map_err(|_| PruneError::MissingRoot)?;
        self.nodes.copy_from_slice(nodes);
        self.nodes[root] = true;
        self.rebuild(graph, root, edges)
    }

    fn rebuild(
        &mut self,
        graph: &Graph,
        root: NodeId,
        edges: &mut [EdgeState],
    ) -> Result<(), PruneError> {
        self.spanning_tree(graph, root);
        if let Some(node) = (0..graph.node_count()).find(|&v| self.nodes[v] && !self.done[v]) {
            return Err(PruneError::Disconnected(node));
        }
        self.peel_leaves(graph, root);

        edges.fill(EdgeState::Unknown);
        for node in 0..graph.node_count() {
            if let (true, Some(e)) = (self.nodes[node], self.pred[node]) {
                edges[e] = EdgeState::Connect;
            }
        }
        Ok(())
    }

    fn spanning_tree(&mut self, graph: &Graph, root: NodeId) {
        self.dist.fill(f64::INFINITY);
        self.pred.fill(None);
        self.done.fill(false);
        self.queue.clear();
        self.dist[root] = 0.0;
        self.queue.push(QueueEntry {
            dist: 0.0,
            node: root,
        });

        while let Some(QueueEntry { dist, node }) = self.queue.pop() {
            if self.done[node] || dist > self.dist[node] {
                continue;
            }
            self.done[node] = true;
            for &e in graph.out_arcs(node) {
                let head = graph.head(e);
                if !self.nodes[head] || self.done[head] {
                    continue;
                }
                let key = graph.cost(e);
                if key < self.dist[head] {
                    self.dist[head] = key;
                    self.pred[head] = Some(e);
                    self.queue.push(QueueEntry { dist: key, node: head });
                }
            }
        }
    }

    fn peel_leaves(&mut self, graph: &Graph, root: NodeId) {
        self.children.fill(0);
        for node in 0..graph.node_count() {
            if let (true, Some(e)) = (self.nodes[node], self.pred[node]) {
                self.children[graph.tail(e)] += 1;
            }
        }

        self.leaves.clear();
        for node in 0..graph.node_count() {
            if self.nodes[node] && node != root && self.children[node] == 0 {
                self.leaves.push(node);
            }
        }
        while let Some(leaf) = self.leaves.pop() {
            let Some(e) = self.pred[leaf] else {
                continue;
            };
            if !is_removable_leaf(graph, leaf, e) {
                continue;
            }
            self.nodes[leaf] = false;
            self.pred[leaf] = None;
            let parent = graph.tail(e);
            self.children[parent] -= 1;
            if parent != root && self.children[parent] == 0 {
                self.leaves.push(parent);
            }
        }
    }
}

/// Returns `true` if dropping `leaf` with its tree arc `e` does not worsen
/// the objective.
fn is_removable_leaf(graph: &Graph, leaf: NodeId, e: EdgeId) -> bool {
    if graph.is_terminal(leaf) {
        return false;
    }
    match graph.variant() {
        ProblemVariant::Steiner => true,
        ProblemVariant::PrizeCollecting => {
            !graph.is_potential_terminal(leaf) || graph.prize(leaf) < graph.cost(e)
        }
        ProblemVariant::MaximumWeight => graph.prize(leaf) <= 0.0,
    }
}

/// Prunes a solution in place.
///
/// # Example
///
/// ```
/// use steinerforge_core::{EdgeState, Graph, ProblemVariant};
/// use steinerforge_local::prune_solution;
///
/// // 0 - 1 - 2 with only 0 a terminal: the whole path is removable
/// let mut graph = Graph::new(3, ProblemVariant::Steiner);
/// graph.add_edge(0, 1, 1.0).unwrap();
/// graph.add_edge(1, 2, 1.0).unwrap();
/// graph.set_root(0).unwrap();
///
/// let mut edges = vec![EdgeState::Connect, EdgeState::Unknown, EdgeState::Connect, EdgeState::Unknown];
/// prune_solution(&graph, &mut edges).unwrap();
/// assert!(edges.iter().all(|&s| s == EdgeState::Unknown));
/// ```
pub fn prune_solution(graph: &Graph, edges: &mut [EdgeState]) -> Result<(), LocalSearchError> {
    let mut pruner = Pruner::try_new(graph)?;
    pruner.prune(graph, edges)?;
    Ok(())
}

#[cfg(test)]
mod tests;
