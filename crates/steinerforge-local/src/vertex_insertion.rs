//! Vertex insertion.
//!
//! A non-tree node adjacent to at least two tree nodes is linked into the
//! dynamic tree through its first tree arc. Every further tree arc closes a
//! cycle; the most expensive edge on that cycle is swapped out when it costs
//! more than the new arc. Maximum-weight instances instead drop the lightest
//! chain of degree-two nodes on the cycle. Insertions that do not pay off are
//! unwound in reverse order.

use std::collections::TryReserveError;

use smallvec::SmallVec;
use steinerforge_core::numerics::{is_less, is_negative};
use steinerforge_core::{flip, EdgeId, EdgeState, Graph, NodeId, ProblemVariant};
use tracing::{debug, trace};

use crate::dynamic_tree::DynamicTree;
use crate::phase::Phase;
use crate::scope::{mark_tree_nodes, SearchScope};
use crate::scratch::{try_filled, try_with_capacity};

/// A link-cut tree change recorded for unwinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeOp {
    /// `0` was linked below `1`.
    Linked(NodeId, NodeId),
    /// The arc `child → parent` was cut.
    Cut(EdgeId),
}

/// Inserts non-tree vertices that make the tree cheaper.
#[derive(Debug)]
pub struct VertexInsertionPhase {
    tree: DynamicTree,
    in_tree: Vec<bool>,
    degree: Vec<usize>,
    insert: SmallVec<[EdgeId; 8]>,
    log: Vec<TreeOp>,
    trial: Vec<EdgeState>,
}

impl VertexInsertionPhase {
    pub fn try_new(graph: &Graph) -> Result<Self, TryReserveError> {
        let n = graph.node_count();
        Ok(Self {
            tree: DynamicTree::try_new(n)?,
            in_tree: try_filled(false, n)?,
            degree: try_filled(0, n)?,
            insert: SmallVec::new(),
            log: try_with_capacity(n)?,
            trial: try_filled(EdgeState::Unknown, graph.arc_count())?,
        })
    }

    fn load(&mut self, graph: &Graph, root: NodeId, edges: &[EdgeState]) {
        self.tree.reset();
        self.degree.fill(0);
        mark_tree_nodes(graph, edges, root, &mut self.in_tree);
        for (e, state) in edges.iter().enumerate() {
            if *state == EdgeState::Connect {
                self.tree
                    .link(graph.head(e), graph.tail(e), flip(e), graph.cost(e));
                self.degree[graph.tail(e)] += 1;
                self.degree[graph.head(e)] += 1;
            }
        }
        self.tree.evert(root);
    }

    /// Tries to insert `node` and returns `true` if it was kept.
    fn try_insert(&mut self, graph: &Graph, root: NodeId, node: NodeId) -> bool {
        if self.in_tree[node] || graph.degree(node) < 2 {
            return false;
        }
        self.insert.clear();
        self.insert.extend(
            graph
                .out_arcs(node)
                .iter()
                .copied()
                .filter(|&e| self.in_tree[graph.head(e)]),
        );
        if self.insert.len() < 2 {
            return false;
        }

        if graph.variant() == ProblemVariant::MaximumWeight {
            self.try_insert_weighted(graph, root, node)
        } else {
            self.try_insert_cost(graph, node)
        }
    }

    fn try_insert_cost(&mut self, graph: &Graph, node: NodeId) -> bool {
        let first = self.insert[0];
        self.log.clear();
        self.tree.link(node, graph.head(first), first, graph.cost(first));
        self.log.push(TreeOp::Linked(node, graph.head(first)));
        let mut diff = graph.cost(first);

        for k in 1..self.insert.len() {
            let arc = self.insert[k];
            let neighbor = graph.head(arc);
            self.tree.evert(node);
            let Some((child, max_arc)) = self.tree.find_max_cost_on_path_to_root(neighbor) else {
                continue;
            };
            if !is_less(graph.cost(arc), graph.cost(max_arc)) {
                continue;
            }
            diff += graph.cost(arc) - graph.cost(max_arc);
            if let Some(cut) = self.tree.cut(child) {
                self.log.push(TreeOp::Cut(cut));
            }
            self.tree.link(node, neighbor, arc, graph.cost(arc));
            self.log.push(TreeOp::Linked(node, neighbor));
        }

        if graph.variant() == ProblemVariant::PrizeCollecting && graph.is_potential_terminal(node) {
            diff -= graph.prize(node);
        }

        if is_negative(diff) {
            self.in_tree[node] = true;
            trace!(event = "move", kind = "vertex_insertion", node, gain = -diff);
            return true;
        }

        for op in self.log.iter().rev() {
            match *op {
                TreeOp::Linked(a, b) => {
                    self.tree.cut_between(a, b);
                }
                TreeOp::Cut(arc) => {
                    self.tree
                        .link(graph.tail(arc), graph.head(arc), arc, graph.cost(arc));
                }
            }
        }
        false
    }

    fn try_insert_weighted(&mut self, graph: &Graph, root: NodeId, node: NodeId) -> bool {
        let first = self.insert[0];
        let anchor = graph.head(first);
        self.tree.link(node, anchor, first, graph.cost(first));
        self.degree[anchor] += 1;
        self.degree[node] = 1;

        for k in 1..self.insert.len() {
            let arc = self.insert[k];
            let neighbor = graph.head(arc);
            self.tree.evert(node);

            let (in_tree, degree) = (&self.in_tree, &self.degree);
            let eligible =
                |v: NodeId| in_tree[v] && degree[v] == 2 && v != root && !graph.is_terminal(v);
            let Some(chain) = self
                .tree
                .find_min_prize_chain(neighbor, graph.prizes(), eligible)
            else {
                continue;
            };
            if !is_less(chain.weight, graph.prize(node)) {
                continue;
            }

            self.tree.cut_between(chain.below, chain.nodes[0]);
            for pair in chain.nodes.windows(2) {
                self.tree.cut_between(pair[0], pair[1]);
            }
            self.tree.cut_between(chain.top, chain.above);
            for &v in &chain.nodes {
                self.in_tree[v] = false;
                self.degree[v] = 0;
            }
            // `above` is `node` itself when the chain ends at the anchor
            self.degree[chain.below] -= 1;
            self.degree[chain.above] -= 1;

            self.tree.link(node, neighbor, arc, graph.cost(arc));
            self.degree[neighbor] += 1;
            self.degree[node] += 1;
            self.in_tree[node] = true;
            trace!(
                event = "move",
                kind = "vertex_insertion",
                node,
                gain = graph.prize(node) - chain.weight,
                removed = chain.nodes.len(),
            );
            return true;
        }

        self.tree.evert(node);
        self.tree.cut_between(node, anchor);
        self.degree[anchor] -= 1;
        self.degree[node] = 0;
        false
    }
}

impl Phase for VertexInsertionPhase {
    fn solve(&mut self, scope: &mut SearchScope<'_>) {
        let graph = scope.graph();
        let root = scope.root();
        let n = graph.node_count();
        if n == 0 {
            return;
        }
        self.load(graph, root, scope.edges());
        scope.save();
        let before = scope.objective();

        let mut inserted = 0u64;
        let mut node = 0;
        let mut last = 0;
        loop {
            if self.try_insert(graph, root, node) {
                inserted += 1;
                last = node;
            }
            node = (node + 1) % n;
            if node == last {
                break;
            }
        }

        if inserted == 0 {
            debug!(event = "vertex_insertion_end", inserted, objective = before);
            return;
        }
        if scope.prune_into(&self.in_tree, &mut self.trial).is_err() {
            debug!(event = "vertex_insertion_end", inserted = 0u64, objective = before);
            return;
        }
        scope.replace(&self.trial);
        if scope.commit_if_improved() {
            scope.stats_mut().vertex_insertions += inserted;
        }
        debug!(
            event = "vertex_insertion_end",
            inserted,
            objective = scope.objective(),
            gain = before - scope.objective(),
        );
    }

    fn phase_type_name(&self) -> &'static str {
        "VertexInsertion"
    }
}
