//! Undirected instance graphs stored as paired arcs.
//!
//! Every undirected edge `{u, v}` added with [`Graph::add_edge`] becomes two
//! arcs: `2k` (`u → v`) and `2k + 1` (`v → u`). The reverse of an arc is
//! obtained with [`flip`].
//!
//! # Example
//!
//! ```
//! use steinerforge_core::{flip, Graph, ProblemVariant};
//!
//! let mut graph = Graph::new(3, ProblemVariant::Steiner);
//! let e = graph.add_edge(0, 1, 2.0).unwrap();
//! graph.add_edge(1, 2, 3.0).unwrap();
//! graph.set_root(0).unwrap();
//! graph.set_terminal(2).unwrap();
//!
//! assert_eq!(graph.tail(e), 0);
//! assert_eq!(graph.head(flip(e)), 0);
//! assert_eq!(graph.degree(1), 2);
//! assert_eq!(graph.terminal_count(), 2);
//! ```

use std::fmt;

use thiserror::Error;

/// Index of a node.
pub type NodeId = usize;

/// Index of a directed arc. Paired arcs differ only in the lowest bit.
pub type EdgeId = usize;

/// Returns the reverse arc of `e`.
#[inline]
pub const fn flip(e: EdgeId) -> EdgeId {
    e ^ 1
}

/// The optimization problem an instance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProblemVariant {
    /// Classic Steiner tree problem in graphs.
    #[default]
    Steiner,
    /// Prize-collecting: unspanned potential terminals pay their prize.
    PrizeCollecting,
    /// Maximum-weight connected subgraph: maximize the spanned node weight.
    MaximumWeight,
}

impl ProblemVariant {
    /// Returns `true` for the variants that carry node prizes.
    pub fn has_prizes(self) -> bool {
        !matches!(self, ProblemVariant::Steiner)
    }
}

impl fmt::Display for ProblemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemVariant::Steiner => write!(f, "SPG"),
            ProblemVariant::PrizeCollecting => write!(f, "PCSPG"),
            ProblemVariant::MaximumWeight => write!(f, "MWCSP"),
        }
    }
}

/// Role of a node in the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    /// Optional node.
    #[default]
    Steiner,
    /// Required node; every feasible solution spans it.
    Terminal,
    /// Optional node carrying a prize (prize-collecting) or weight.
    PotentialTerminal,
}

/// Errors raised while building a [`Graph`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("node {node} out of range for a graph with {count} nodes")]
    NodeOutOfRange { node: NodeId, count: usize },

    #[error("self loop at node {0}")]
    SelfLoop(NodeId),

    #[error("edge {{{tail}, {head}}} has invalid cost {cost}")]
    InvalidCost { tail: NodeId, head: NodeId, cost: f64 },

    #[error("node {node} has invalid prize {prize}")]
    InvalidPrize { node: NodeId, prize: f64 },

    #[error("graph has no root")]
    MissingRoot,
}

/// An undirected graph with per-arc costs, per-node kinds and prizes.
#[derive(Debug, Clone)]
pub struct Graph {
    variant: ProblemVariant,
    root: Option<NodeId>,
    kinds: Vec<NodeKind>,
    prizes: Vec<f64>,
    tails: Vec<NodeId>,
    heads: Vec<NodeId>,
    costs: Vec<f64>,
    out_arcs: Vec<Vec<EdgeId>>,
}

impl Graph {
    /// Creates a graph with `node_count` Steiner nodes and no edges.
    pub fn new(node_count: usize, variant: ProblemVariant) -> Self {
        Self {
            variant,
            root: None,
            kinds: vec![NodeKind::Steiner; node_count],
            prizes: vec![0.0; node_count],
            tails: Vec::new(),
            heads: Vec::new(),
            costs: Vec::new(),
            out_arcs: vec![Vec::new(); node_count],
        }
    }

    fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node < self.kinds.len() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                node,
                count: self.kinds.len(),
            })
        }
    }

    /// Adds the undirected edge `{tail, head}` and returns the arc `tail → head`.
    pub fn add_edge(&mut self, tail: NodeId, head: NodeId, cost: f64) -> Result<EdgeId, GraphError> {
        self.check_node(tail)?;
        self.check_node(head)?;
        if tail == head {
            return Err(GraphError::SelfLoop(tail));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(GraphError::InvalidCost { tail, head, cost });
        }
        let e = self.tails.len();
        self.tails.extend([tail, head]);
        self.heads.extend([head, tail]);
        self.costs.extend([cost, cost]);
        self.out_arcs[tail].push(e);
        self.out_arcs[head].push(flip(e));
        Ok(e)
    }

    /// Marks `node` as a terminal.
    pub fn set_terminal(&mut self, node: NodeId) -> Result<(), GraphError> {
        self.check_node(node)?;
        self.kinds[node] = NodeKind::Terminal;
        Ok(())
    }

    /// Marks `node` as a terminal and makes it the root.
    pub fn set_root(&mut self, node: NodeId) -> Result<(), GraphError> {
        self.set_terminal(node)?;
        self.root = Some(node);
        Ok(())
    }

    /// Marks `node` as a potential terminal with the given non-negative prize.
    pub fn set_potential_terminal(&mut self, node: NodeId, prize: f64) -> Result<(), GraphError> {
        self.check_node(node)?;
        if !prize.is_finite() || prize < 0.0 {
            return Err(GraphError::InvalidPrize { node, prize });
        }
        self.kinds[node] = NodeKind::PotentialTerminal;
        self.prizes[node] = prize;
        Ok(())
    }

    /// Sets the weight of `node` for maximum-weight instances.
    ///
    /// Positively weighted non-terminals become potential terminals.
    pub fn set_weight(&mut self, node: NodeId, weight: f64) -> Result<(), GraphError> {
        self.check_node(node)?;
        if !weight.is_finite() {
            return Err(GraphError::InvalidPrize { node, prize: weight });
        }
        self.prizes[node] = weight;
        if self.kinds[node] != NodeKind::Terminal {
            self.kinds[node] = if weight > 0.0 {
                NodeKind::PotentialTerminal
            } else {
                NodeKind::Steiner
            };
        }
        Ok(())
    }

    pub fn variant(&self) -> ProblemVariant {
        self.variant
    }

    /// Returns the root, or an error if none was set.
    pub fn root(&self) -> Result<NodeId, GraphError> {
        self.root.ok_or(GraphError::MissingRoot)
    }

    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of arcs (twice the number of undirected edges).
    pub fn arc_count(&self) -> usize {
        self.tails.len()
    }

    pub fn edge_count(&self) -> usize {
        self.tails.len() / 2
    }

    #[inline]
    pub fn tail(&self, e: EdgeId) -> NodeId {
        self.tails[e]
    }

    #[inline]
    pub fn head(&self, e: EdgeId) -> NodeId {
        self.heads[e]
    }

    #[inline]
    pub fn cost(&self, e: EdgeId) -> f64 {
        self.costs[e]
    }

    /// Arc costs indexed by arc.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Outgoing arcs of `node`. The incoming arcs are their flips.
    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> &[EdgeId] {
        &self.out_arcs[node]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.out_arcs[node].len()
    }

    #[inline]
    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.kinds[node]
    }

    #[inline]
    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.kinds[node] == NodeKind::Terminal
    }

    #[inline]
    pub fn is_potential_terminal(&self, node: NodeId) -> bool {
        self.kinds[node] == NodeKind::PotentialTerminal
    }

    /// Prize (prize-collecting) or weight (maximum-weight) of `node`.
    #[inline]
    pub fn prize(&self, node: NodeId) -> f64 {
        self.prizes[node]
    }

    pub fn prizes(&self) -> &[f64] {
        &self.prizes
    }

    pub fn terminals(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == NodeKind::Terminal)
            .map(|(node, _)| node)
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals().count()
    }

    /// Returns the arc `tail → head` if the nodes are adjacent.
    pub fn find_arc(&self, tail: NodeId, head: NodeId) -> Option<EdgeId> {
        self.out_arcs
            .get(tail)?
            .iter()
            .copied()
            .find(|&e| self.heads[e] == head)
    }
}
