//! Iterative post-order over the arcs of a rooted solution.

use steinerforge_core::{EdgeId, EdgeState, Graph, NodeId};

/// Post-order walk over `Connect` arcs from `root`.
///
/// Yields every tree node together with its parent; children come before
/// their parent and the root comes last. Uses an explicit stack.
pub struct PostOrder<'a> {
    graph: &'a Graph,
    edges: &'a [EdgeState],
    stack: Vec<(NodeId, usize)>,
}

impl<'a> PostOrder<'a> {
    pub fn new(graph: &'a Graph, edges: &'a [EdgeState], root: NodeId) -> Self {
        let mut stack = Vec::with_capacity(graph.node_count());
        stack.push((root, 0));
        Self {
            graph,
            edges,
            stack,
        }
    }

    fn next_child(&self, node: NodeId, from: usize) -> Option<(usize, EdgeId)> {
        let arcs = self.graph.out_arcs(node);
        arcs[from..]
            .iter()
            .position(|&e| self.edges[e] == EdgeState::Connect)
            .map(|offset| (from + offset, arcs[from + offset]))
    }
}

impl Iterator for PostOrder<'_> {
    type Item = (NodeId, Option<NodeId>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &(node, from) = self.stack.last()?;
            match self.next_child(node, from) {
                Some((pos, arc)) => {
                    if let Some(top) = self.stack.last_mut() {
                        top.1 = pos + 1;
                    }
                    self.stack.push((self.graph.head(arc), 0));
                }
                None => {
                    self.stack.pop();
                    let parent = self.stack.last().map(|&(p, _)| p);
                    return Some((node, parent));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use steinerforge_core::ProblemVariant;

    use super::*;

    #[test]
    fn test_children_before_parent() {
        // 0 -> 1 -> {2, 3}, 0 -> 4
        let mut graph = Graph::new(5, ProblemVariant::Steiner);
        let arcs = [
            graph.add_edge(0, 1, 1.0).unwrap(),
            graph.add_edge(1, 2, 1.0).unwrap(),
            graph.add_edge(1, 3, 1.0).unwrap(),
            graph.add_edge(0, 4, 1.0).unwrap(),
        ];
        graph.add_edge(2, 4, 1.0).unwrap();
        let mut edges = vec![EdgeState::Unknown; graph.arc_count()];
        for e in arcs {
            edges[e] = EdgeState::Connect;
        }

        let order: Vec<_> = PostOrder::new(&graph, &edges, 0).collect();
        assert_eq!(
            order,
            vec![
                (2, Some(1)),
                (3, Some(1)),
                (1, Some(0)),
                (4, Some(0)),
                (0, None)
            ]
        );
    }
}
