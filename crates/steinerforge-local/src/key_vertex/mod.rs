//! Key-vertex elimination and key-path exchange.
//!
//! A pass computes the Voronoi regions of the tree nodes and the boundary
//! index, then visits the tree in post-order. At every node it may
//! eliminate a non-terminal key vertex or exchange the key path above it
//! for a cheaper boundary path. Moves applied during a pass freeze the
//! nodes whose labels they invalidate; the next pass starts from scratch.

mod elimination;
mod exchange;

use std::collections::TryReserveError;
use std::fmt;

use steinerforge_config::MoveConfig;
use steinerforge_core::{flip, EdgeId, EdgeState, Graph, NodeId, ProblemVariant};
use tracing::{debug, trace, warn};

use crate::active::ActiveSet;
use crate::boundary::BoundaryIndex;
use crate::error::StarPathsError;
use crate::key_path::{is_crucial, is_terminal_like, KeyPaths, TreeView};
use crate::phase::Phase;
use crate::prize::PrizeLedger;
use crate::scope::{mark_tree_nodes, SearchScope};
use crate::scratch::{try_filled, try_with_capacity};
use crate::stats::LocalSearchStats;
use crate::supergraph::{EdgeStamp, SupergraphMst, SupernodeSet};
use crate::traversal::PostOrder;
use crate::union_find::UnionFind;
use crate::voronoi::VoronoiDiagram;

/// Node state of the tree during a pass.
struct TreeState {
    active: ActiveSet,
    in_tree: Vec<bool>,
    pinned: Vec<bool>,
    scanned: Vec<bool>,
    parent_edge: Vec<Option<EdgeId>>,
}

impl TreeState {
    fn try_new(n: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            active: ActiveSet::try_new(n)?,
            in_tree: try_filled(false, n)?,
            pinned: try_filled(false, n)?,
            scanned: try_filled(false, n)?,
            parent_edge: try_filled(None, n)?,
        })
    }

    fn view<'a>(&'a self, graph: &'a Graph, edges: &'a [EdgeState]) -> TreeView<'a> {
        TreeView {
            graph,
            edges,
            in_tree: &self.in_tree,
            pinned: &self.pinned,
            active: &self.active,
            parent_edge: &self.parent_edge,
        }
    }

    /// Adds a node reached by a new boundary path to the tree and freezes it.
    fn enter(&mut self, node: NodeId) {
        if !self.in_tree[node] {
            self.in_tree[node] = true;
            self.active.deactivate(node);
        }
    }

    /// Removes a node from the tree and freezes it.
    fn leave(&mut self, node: NodeId) {
        self.in_tree[node] = false;
        self.active.deactivate(node);
    }
}

/// Moves applied by one key-vertex pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PassSummary {
    pub eliminations: u64,
    pub exchanges: u64,
    /// Sum of the gains claimed by the applied moves.
    pub gain: f64,
}

impl PassSummary {
    pub fn moves(&self) -> u64 {
        self.eliminations + self.exchanges
    }
}

/// Scratch state of the key-vertex passes over one graph.
pub(crate) struct KeyVertexSearch {
    voronoi: VoronoiDiagram,
    index: BoundaryIndex,
    uf: UnionFind,
    tree: TreeState,
    order: Vec<NodeId>,
    kp: KeyPaths,
    supernodes: SupernodeSet,
    ledger: PrizeLedger,
    stamp: EdgeStamp,
    mst: SupergraphMst,
    boundary: Vec<EdgeId>,
    walk: Vec<EdgeId>,
}

impl KeyVertexSearch {
    pub fn try_new(graph: &Graph) -> Result<Self, TryReserveError> {
        let n = graph.node_count();
        Ok(Self {
            voronoi: VoronoiDiagram::try_new(n)?,
            index: BoundaryIndex::try_new(graph)?,
            uf: UnionFind::try_new(n)?,
            tree: TreeState::try_new(n)?,
            order: try_with_capacity(n)?,
            kp: KeyPaths::try_new(n)?,
            supernodes: SupernodeSet::try_new(n)?,
            ledger: PrizeLedger::try_new(n)?,
            stamp: EdgeStamp::try_new(graph.edge_count())?,
            mst: SupergraphMst::try_new(n, graph.arc_count())?,
            boundary: try_with_capacity(graph.arc_count())?,
            walk: try_with_capacity(n)?,
        })
    }

    fn prepare(&mut self, graph: &Graph, root: NodeId, edges: &[EdgeState]) {
        let tree = &mut self.tree;
        tree.active.reset(graph, root);
        mark_tree_nodes(graph, edges, root, &mut tree.in_tree);
        tree.parent_edge.fill(None);
        for (e, state) in edges.iter().enumerate() {
            if *state == EdgeState::Connect {
                tree.parent_edge[graph.head(e)] = Some(flip(e));
            }
        }
        tree.pinned.fill(false);
        tree.scanned.fill(false);
        self.ledger.clear();

        self.voronoi
            .compute(graph, graph.costs(), &self.tree.in_tree, &self.tree.active);
        self.index.build(
            graph,
            &self.voronoi,
            &self.tree.active,
            edges,
            root,
            &mut self.uf,
        );
        self.order.clear();
        self.order
            .extend(PostOrder::new(graph, edges, root).map(|(node, _)| node));
    }

    /// Runs one pass and returns the moves it applied.
    ///
    /// Only evaluations are counted in `stats`; accepted moves are counted
    /// by the caller once the pass is kept. The edges may be left in an
    /// inconsistent orientation; callers must normalize them afterwards.
    pub fn run_pass(
        &mut self,
        graph: &Graph,
        root: NodeId,
        edges: &mut [EdgeState],
        moves: &MoveConfig,
        stats: &mut LocalSearchStats,
    ) -> Result<PassSummary, StarPathsError> {
        self.prepare(graph, root, edges);
        let mut summary = PassSummary::default();

        for i in 0..self.order.len() {
            let node = self.order[i];
            if node == root || !self.tree.active.is_active(node) {
                continue;
            }
            self.tree.scanned[node] = true;
            let crucial = is_crucial(graph, edges, node);

            if moves.key_vertex_elimination
                && crucial
                && !self.tree.pinned[node]
                && !is_terminal_like(graph, node)
            {
                stats.record_elimination();
                if let Some(gain) = self.try_eliminate(graph, edges, node)? {
                    trace!(event = "move", kind = "key_vertex_elimination", node, gain);
                    summary.eliminations += 1;
                    summary.gain += gain;
                    continue;
                }
            }
            if !crucial && !self.tree.pinned[node] {
                continue;
            }

            // child key paths end at crucial and pinned nodes
            self.tree
                .view(graph, edges)
                .absorb_child_paths(node, &mut self.uf, &mut self.index.heaps);

            if moves.key_path_exchange {
                stats.record_exchange();
                if let Some(gain) = self.try_exchange(graph, edges, node) {
                    trace!(event = "move", kind = "key_path_exchange", node, gain);
                    summary.exchanges += 1;
                    summary.gain += gain;
                }
            }
        }
        Ok(summary)
    }

    /// Reverses the tree arcs on the walk from `from` up to `to`.
    fn reroot(&mut self, graph: &Graph, edges: &mut [EdgeState], from: NodeId, to: NodeId) {
        self.walk.clear();
        let mut node = from;
        while node != to && self.walk.len() < graph.node_count() {
            let Some(arc) = incoming_arc(graph, edges, node) else {
                break;
            };
            self.walk.push(arc);
            node = graph.tail(arc);
        }
        for &arc in &self.walk {
            edges[arc] = EdgeState::Unknown;
            edges[flip(arc)] = EdgeState::Connect;
        }
    }

    /// Merges the child key paths of a root-side base into it and pins it.
    fn pin_base(&mut self, graph: &Graph, edges: &[EdgeState], base: NodeId) {
        if !is_terminal_like(graph, base)
            && self.tree.scanned[base]
            && !self.tree.pinned[base]
            && self.uf.find(base) == base
        {
            self.tree
                .view(graph, edges)
                .absorb_child_paths(base, &mut self.uf, &mut self.index.heaps);
        }
        self.tree.pinned[base] = true;
    }
}

impl fmt::Debug for KeyVertexSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyVertexSearch")
            .field("nodes", &self.tree.in_tree.len())
            .finish()
    }
}

fn incoming_arc(graph: &Graph, edges: &[EdgeState], node: NodeId) -> Option<EdgeId> {
    graph
        .out_arcs(node)
        .iter()
        .map(|&e| flip(e))
        .find(|&e| edges[e] == EdgeState::Connect)
}

/// Keeps or discards the result of one pass against the rollback point.
///
/// Returns `true` if the pass improved the solution and another may follow.
fn settle_pass(
    scope: &mut SearchScope<'_>,
    pass: usize,
    before: f64,
    result: Result<PassSummary, StarPathsError>,
) -> bool {
    let summary = match result {
        Err(err) => {
            scope.rollback();
            scope.stats_mut().aborted_passes += 1;
            warn!(event = "pass_aborted", pass, error = %err);
            return false;
        }
        Ok(summary) => summary,
    };
    let moves = summary.moves();
    if moves == 0 {
        debug!(event = "pass_end", pass, moves, objective = before);
        return false;
    }
    if !scope.commit_if_improved() {
        warn!(
            event = "pass_rollback",
            pass,
            moves,
            claimed = summary.gain,
            objective = before,
        );
        return false;
    }
    scope
        .stats_mut()
        .record_committed(summary.eliminations, summary.exchanges);
    debug!(
        event = "pass_end",
        pass,
        moves,
        objective = scope.objective(),
        gain = before - scope.objective(),
    );
    true
}

/// Repeated key-vertex passes until no move applies.
#[derive(Debug)]
pub struct KeyVertexPhase {
    max_restarts: usize,
    moves: MoveConfig,
    search: KeyVertexSearch,
}

impl KeyVertexPhase {
    /// Allocates the pass scratch space for `graph`.
    pub fn try_new(
        graph: &Graph,
        max_restarts: usize,
        moves: MoveConfig,
    ) -> Result<Self, TryReserveError> {
        Ok(Self {
            max_restarts,
            moves,
            search: KeyVertexSearch::try_new(graph)?,
        })
    }
}

impl Phase for KeyVertexPhase {
    fn solve(&mut self, scope: &mut SearchScope<'_>) {
        let graph = scope.graph();
        let root = scope.root();
        if graph.variant() == ProblemVariant::MaximumWeight || !self.moves.any_key_vertex_move() {
            return;
        }

        for pass in 0..self.max_restarts {
            scope.save();
            let before = scope.objective();
            debug!(event = "pass_start", pass, objective = before);

            let (edges, stats) = scope.parts_mut();
            stats.record_pass();
            let result = self.search.run_pass(graph, root, edges, &self.moves, stats);
            if !settle_pass(scope, pass, before, result) {
                break;
            }
        }
    }

    fn phase_type_name(&self) -> &'static str {
        "KeyVertex"
    }
}
